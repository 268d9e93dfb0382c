use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgPool;

use listens::config::get_optional_variable;
use listens::db::{Db, PgDb};
use listens::iso8601;
use listens::listen::{Listen, ListenInput, ListensQuery, MusicProvider, SortOrder};

/// Connects to the database named by `LISTENS_TEST_DB_CONNECTION_STRING`,
/// or returns `None` so the test can be skipped.
async fn connect() -> Option<PgDb> {
    let connection_string = get_optional_variable("LISTENS_TEST_DB_CONNECTION_STRING")?;
    let pool = PgPool::connect(&connection_string)
        .await
        .expect("connect to LISTENS_TEST_DB_CONNECTION_STRING");

    let db = PgDb::new(pool);
    db.persist_schema().await.expect("persist schema");

    Some(db)
}

fn input(listener_name: &str, listen_time_utc: DateTime<Utc>) -> ListenInput {
    ListenInput {
        song_id: "4rNGLh1y5Kkvr4bT28yfHU".to_owned(),
        song_provider: MusicProvider::Spotify,
        listener_name: listener_name.to_owned(),
        listen_time_utc,
        note: None,
        iana_timezone: "America/New_York".to_owned(),
    }
}

fn names(listens: &[Listen]) -> Vec<&str> {
    listens.iter().map(|l| l.listener_name.as_str()).collect()
}

#[tokio::test]
async fn postgres_listens_round_trip() {
    let db = match connect().await {
        Some(db) => db,
        None => return,
    };

    // a window far enough in the past that earlier runs don't overlap it
    let base = iso8601::now() - Duration::days(365 * 100);
    let at = |seconds: i64| base + Duration::seconds(seconds);

    let mut stored = vec![];
    for (name, seconds) in &[("first", 1), ("tie-a", 2), ("tie-b", 2), ("last", 3)] {
        stored.push(db.add_listen(input(name, at(*seconds))).await.unwrap());
    }

    let fetched = db.fetch_listen(&stored[1].id).await.unwrap();
    assert_eq!(fetched, stored[1]);

    let inside = |sort_order: SortOrder| ListensQuery {
        limit: 10,
        sort_order,
        after_utc: Some(at(1)),
        before_utc: Some(at(3)),
    };

    let ascending = db.fetch_listens(inside(SortOrder::Ascending)).await.unwrap();
    assert_eq!(names(&ascending), vec!["tie-a", "tie-b"]);

    let descending = db.fetch_listens(inside(SortOrder::Descending)).await.unwrap();
    assert_eq!(names(&descending), vec!["tie-b", "tie-a"]);

    let everything = ListensQuery {
        limit: 3,
        sort_order: SortOrder::Ascending,
        after_utc: Some(at(0)),
        before_utc: Some(at(4)),
    };
    let limited = db.fetch_listens(everything).await.unwrap();
    assert_eq!(names(&limited), vec!["first", "tie-a", "tie-b"]);
}

#[tokio::test]
async fn postgres_rejects_unknown_ids() {
    let db = match connect().await {
        Some(db) => db,
        None => return,
    };

    for id in &["does-not-exist", "3f2c9a1e-5b7d-4c1a-9e0f-8a6b2d4c6e8f"] {
        assert!(matches!(
            db.fetch_listen(id).await,
            Err(listens::errors::ListensError::ListenDoesntExist(..))
        ));
    }
}
