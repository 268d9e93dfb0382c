use futures::future::{BoxFuture, FutureExt};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::Db;
use crate::errors::ListensError;
use crate::listen::{Listen, ListenInput, ListensQuery, SortOrder};

/// Keeps listens in insertion order in memory.
#[derive(Default)]
pub struct MemoryDb {
    listens: RwLock<Vec<Listen>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.listens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.listens.read().await.is_empty()
    }
}

impl Db for MemoryDb {
    fn add_listen(&self, input: ListenInput) -> BoxFuture<Result<Listen, ListensError>> {
        async move {
            let listen = Listen::from_input(Uuid::new_v4().to_string(), input);
            self.listens.write().await.push(listen.clone());

            Ok(listen)
        }
        .boxed()
    }

    fn fetch_listen(&self, id: &str) -> BoxFuture<Result<Listen, ListensError>> {
        let id = id.to_owned();

        async move {
            let listens = self.listens.read().await;

            listens
                .iter()
                .find(|listen| listen.id == id)
                .cloned()
                .ok_or(ListensError::ListenDoesntExist(id))
        }
        .boxed()
    }

    fn fetch_listens(&self, query: ListensQuery) -> BoxFuture<Result<Vec<Listen>, ListensError>> {
        async move {
            let listens = self.listens.read().await;

            let mut matching: Vec<Listen> = listens
                .iter()
                .filter(|listen| query.admits(listen.listen_time_utc))
                .cloned()
                .collect();

            // stable, so ties keep insertion order; reversing flips them
            // for descending listings
            matching.sort_by_key(|listen| listen.listen_time_utc);

            if query.sort_order == SortOrder::Descending {
                matching.reverse();
            }

            matching.truncate(query.limit as usize);

            Ok(matching)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::listen::MusicProvider;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 12, 2, h, 0, 0).unwrap()
    }

    fn listen_input(listen_time_utc: DateTime<Utc>) -> ListenInput {
        ListenInput {
            song_id: "3DnZfpfe8wLeJgzc00gKeW".to_owned(),
            song_provider: MusicProvider::Spotify,
            listener_name: "geez".to_owned(),
            listen_time_utc,
            note: Some("this album isnt bad".to_owned()),
            iana_timezone: "Europe/Moscow".to_owned(),
        }
    }

    async fn db_with_listens_at(hours: &[u32]) -> MemoryDb {
        let db = MemoryDb::new();

        for h in hours {
            db.add_listen(listen_input(at(*h))).await.unwrap();
        }

        db
    }

    fn hours(listens: &[Listen]) -> Vec<u32> {
        use chrono::Timelike;

        listens.iter().map(|l| l.listen_time_utc.hour()).collect()
    }

    #[tokio::test]
    async fn added_listens_can_be_fetched() {
        let db = MemoryDb::new();

        let added = db.add_listen(listen_input(at(10))).await.unwrap();
        let fetched = db.fetch_listen(&added.id).await.unwrap();

        assert_eq!(added, fetched);
        assert_eq!(fetched.listen_time_utc, at(10));
        assert_eq!(fetched.note.as_deref(), Some("this album isnt bad"));
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let db = MemoryDb::new();

        let first = db.add_listen(listen_input(at(10))).await.unwrap();
        let second = db.add_listen(listen_input(at(10))).await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn missing_listens_are_reported() {
        let db = MemoryDb::new();

        match db.fetch_listen("does-not-exist").await {
            Err(ListensError::ListenDoesntExist(id)) => assert_eq!(id, "does-not-exist"),
            other => panic!("expected ListenDoesntExist, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn limit_applies_after_ordering() {
        let db = db_with_listens_at(&[9, 11, 10]).await;

        let latest = db
            .fetch_listens(ListensQuery::new(1, SortOrder::Descending))
            .await
            .unwrap();
        let earliest = db
            .fetch_listens(ListensQuery::new(1, SortOrder::Ascending))
            .await
            .unwrap();

        assert_eq!(hours(&latest), vec![11]);
        assert_eq!(hours(&earliest), vec![9]);
    }

    #[tokio::test]
    async fn bounds_are_strict() {
        let db = db_with_listens_at(&[8, 9, 10, 11, 12]).await;

        let query = ListensQuery {
            after_utc: Some(at(9)),
            before_utc: Some(at(12)),
            ..ListensQuery::new(20, SortOrder::Ascending)
        };
        let listens = db.fetch_listens(query).await.unwrap();

        assert_eq!(hours(&listens), vec![10, 11]);
    }

    #[tokio::test]
    async fn descending_lists_newest_first() {
        let db = db_with_listens_at(&[10, 12, 11]).await;

        let listens = db
            .fetch_listens(ListensQuery::new(20, SortOrder::Descending))
            .await
            .unwrap();

        assert_eq!(hours(&listens), vec![12, 11, 10]);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order_and_flip_when_descending() {
        let db = MemoryDb::new();
        let first = db.add_listen(listen_input(at(10))).await.unwrap();
        let second = db.add_listen(listen_input(at(10))).await.unwrap();

        let ids = |listens: Vec<Listen>| listens.into_iter().map(|l| l.id).collect::<Vec<_>>();

        let ascending = db
            .fetch_listens(ListensQuery::new(20, SortOrder::Ascending))
            .await
            .unwrap();
        let descending = db
            .fetch_listens(ListensQuery::new(20, SortOrder::Descending))
            .await
            .unwrap();

        assert_eq!(ids(ascending), vec![first.id.clone(), second.id.clone()]);
        assert_eq!(ids(descending), vec![second.id, first.id]);
    }
}
