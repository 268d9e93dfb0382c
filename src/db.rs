use futures::future::BoxFuture;

use crate::errors::ListensError;
use crate::listen::{Listen, ListenInput, ListensQuery};

pub mod memory;

pub trait Db {
    /// Stores a new listen under a fresh ID.
    fn add_listen(&self, input: ListenInput) -> BoxFuture<Result<Listen, ListensError>>;

    /// Fails with [`ListensError::ListenDoesntExist`] if there's no such listen.
    fn fetch_listen(&self, id: &str) -> BoxFuture<Result<Listen, ListensError>>;

    /// Filters, then orders, then truncates to `query.limit`.
    fn fetch_listens(&self, query: ListensQuery) -> BoxFuture<Result<Vec<Listen>, ListensError>>;
}

pub use self::postgres::*;

mod postgres {
    use chrono::{DateTime, Utc};
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::postgres::{PgPool, PgRow};
    use uuid::Uuid;

    use crate::errors::ListensError;
    use crate::listen::{Listen, ListenInput, ListensQuery, MusicProvider, SortOrder};

    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }

        /// Creates the listens table and its index if they're missing.
        pub async fn persist_schema(&self) -> Result<(), ListensError> {
            use sqlx::Executor;

            self.pool
                .execute(include_str!("queries/create_schema.sql"))
                .await
                .map_err(map_sqlx_error)?;

            Ok(())
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn add_listen(&self, input: ListenInput) -> BoxFuture<Result<Listen, ListensError>> {
            async move {
                let query = sqlx::query(include_str!("queries/insert_listen.sql"));
                let id = Uuid::new_v4();

                query
                    .bind(id)
                    .bind(&input.song_id)
                    .bind(input.song_provider.as_str())
                    .bind(&input.listener_name)
                    .bind(input.listen_time_utc)
                    .bind(&input.note)
                    .bind(&input.iana_timezone)
                    .execute(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(Listen::from_input(id.to_string(), input))
            }
            .boxed()
        }

        fn fetch_listen(&self, id: &str) -> BoxFuture<Result<Listen, ListensError>> {
            let raw_id = id.to_owned();

            async move {
                // anything that isn't a UUID can't be in the table
                let id = match Uuid::parse_str(&raw_id) {
                    Ok(id) => id,
                    Err(_) => return Err(ListensError::ListenDoesntExist(raw_id)),
                };

                let query = sqlx::query(include_str!("queries/retrieve_listen.sql"));

                let listen: Option<Listen> = query
                    .bind(id)
                    .try_map(|row: PgRow| new_listen(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                listen.ok_or(ListensError::ListenDoesntExist(raw_id))
            }
            .boxed()
        }

        fn fetch_listens(&self, query: ListensQuery) -> BoxFuture<Result<Vec<Listen>, ListensError>> {
            async move {
                let sql = match query.sort_order {
                    SortOrder::Ascending => include_str!("queries/retrieve_listens_ascending.sql"),
                    SortOrder::Descending => include_str!("queries/retrieve_listens_descending.sql"),
                };

                let listens = sqlx::query(sql)
                    .bind(query.after_utc)
                    .bind(query.before_utc)
                    .bind(i64::from(query.limit))
                    .try_map(|row: PgRow| new_listen(&row))
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(listens)
            }
            .boxed()
        }
    }

    fn new_listen(row: &PgRow) -> Result<Listen, sqlx::Error> {
        let id: Uuid = try_get(row, "id")?;
        let song_provider: String = try_get(row, "song_provider")?;
        let song_provider: MusicProvider = song_provider
            .parse()
            // only this service writes to the table, but just in case...
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let listen_time_utc: DateTime<Utc> = try_get(row, "listen_time_utc")?;

        Ok(Listen {
            id: id.to_string(),
            song_id: try_get(row, "song_id")?,
            song_provider,
            listener_name: try_get(row, "listener_name")?,
            listen_time_utc,
            note: try_get(row, "note")?,
            iana_timezone: try_get(row, "iana_timezone")?,
        })
    }

    fn try_get<'a, T: sqlx::Type<sqlx::Postgres> + sqlx::decode::Decode<'a, sqlx::Postgres>>(
        row: &'a PgRow,
        column: &str,
    ) -> Result<T, sqlx::Error> {
        use sqlx::prelude::*;

        row.try_get(column)
    }

    fn map_sqlx_error(error: sqlx::Error) -> ListensError {
        ListensError::Sqlx { source: error }
    }
}
