use crate::entities::{MessageRecord, NewMessage, SqliteStore};
use chrono::{DateTime, SecondsFormat, Utc};
use std::future::Future;

pub trait MessageStore: Send + Sync + 'static {
    /// Persist a new message and return it with its assigned `id`.
    fn insert(&self, message: NewMessage) -> impl Future<Output = Result<MessageRecord, sqlx::Error>> + Send;

    /// Every stored message, most recent first. Rows sharing a timestamp come
    /// back in descending `id` order.
    fn list_ordered_by_created_desc(&self) -> impl Future<Output = Result<Vec<MessageRecord>, sqlx::Error>> + Send;

    /// Case-sensitive exact match on `name`.
    fn exists_by_name(&self, name: &str) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}

/// Fixed-width RFC 3339 so that lexical order on the column is chronological.
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Rows whose `created_at` does not parse fail the read with `Decode`.
fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    raw.parse().map_err(|e: chrono::ParseError| {
        tracing::warn!(raw = %raw, error = %e, "unparsable message created_at");
        sqlx::Error::Decode(Box::new(e))
    })
}

impl MessageStore for SqliteStore {
    async fn insert(&self, message: NewMessage) -> Result<MessageRecord, sqlx::Error> {
        let created_at = encode_timestamp(&message.created_at);
        let result = sqlx::query(
            "INSERT INTO message (name, text, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(&message.name)
        .bind(&message.text)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(MessageRecord {
            id: result.last_insert_rowid(),
            name: message.name,
            text: message.text,
            created_at: message.created_at,
        })
    }

    async fn list_ordered_by_created_desc(&self) -> Result<Vec<MessageRecord>, sqlx::Error> {
        let rows: Vec<(i64, String, String, String)> = sqlx::query_as(
            "SELECT id, name, text, created_at \
                 FROM message ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|(id, name, text, created_at)| {
                Ok(MessageRecord {
                    id,
                    name,
                    text,
                    created_at: decode_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM message WHERE name = ?1 LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::memory_store;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn message(name: &str, created_at: DateTime<Utc>) -> NewMessage {
        NewMessage {
            name: name.into(),
            text: "hello there".into(),
            created_at,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = memory_store().await;
        let a = store.insert(message("a", at(0))).await.unwrap();
        let b = store.insert(message("b", at(1))).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(a.name, "a");
        assert_eq!(a.created_at, at(0));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = memory_store().await;
        store.insert(message("old", at(0))).await.unwrap();
        store.insert(message("new", at(60))).await.unwrap();
        store.insert(message("mid", at(30))).await.unwrap();

        let names: Vec<_> = store
            .list_ordered_by_created_desc()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_id_order() {
        let store = memory_store().await;
        for name in ["first", "second", "third"] {
            store.insert(message(name, at(0))).await.unwrap();
        }
        let names: Vec<_> = store
            .list_ordered_by_created_desc()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn sub_second_timestamps_survive_a_round_trip() {
        let store = memory_store().await;
        let ts = at(0) + Duration::microseconds(123_456);
        store.insert(message("precise", ts)).await.unwrap();
        let listed = store.list_ordered_by_created_desc().await.unwrap();
        assert_eq!(listed[0].created_at, ts);
    }

    #[tokio::test]
    async fn exists_by_name_is_case_sensitive() {
        let store = memory_store().await;
        store.insert(message("Ann", at(0))).await.unwrap();
        assert!(store.exists_by_name("Ann").await.unwrap());
        assert!(!store.exists_by_name("ann").await.unwrap());
        assert!(!store.exists_by_name("Bob").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_name_violates_unique_index() {
        let store = memory_store().await;
        store.insert(message("Ann", at(0))).await.unwrap();
        let err = store.insert(message("Ann", at(1))).await.unwrap_err();
        match err {
            sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
            other => panic!("expected unique violation, got {other:?}"),
        }
        assert_eq!(store.list_ordered_by_created_desc().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_timestamp_fails_the_listing() {
        let store = memory_store().await;
        store.insert(message("good", at(0))).await.unwrap();
        sqlx::query("INSERT INTO message (name, text, created_at) VALUES ('bad', 'hello there', 'not-a-date')")
            .execute(&store.pool)
            .await
            .unwrap();

        let err = store.list_ordered_by_created_desc().await.unwrap_err();
        assert!(matches!(err, sqlx::Error::Decode(_)), "got {err:?}");
    }
}
