use std::path::PathBuf;

use async_trait::async_trait;
use protocol::{normalize_topics, Topic};
use serde_json::{json, Value};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("cannot read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog is not an array")]
    NotArray,
}

#[async_trait]
pub trait Query {
    type Reply;
    async fn query(&self, pool: &SqlitePool) -> Result<Self::Reply, ErrorKind>;
}

/// Every row of `topics(topic TEXT, hints TEXT)`, `hints` holding a JSON
/// array. Rows that do not make a valid topic are skipped.
pub struct AllTopics;

const ALL_TOPICS_QUERY: &str = "select topic, hints from topics order by rowid;";

#[async_trait]
impl Query for AllTopics {
    type Reply = Vec<Topic>;
    async fn query(&self, pool: &SqlitePool) -> Result<Self::Reply, ErrorKind> {
        let rows = sqlx::query(ALL_TOPICS_QUERY).fetch_all(pool).await?;
        let mut topics = Vec::with_capacity(rows.len());
        for row in rows {
            let topic: Option<String> = row.try_get("topic")?;
            let hints: Option<String> = row.try_get("hints")?;
            let hints = hints
                .and_then(|h| serde_json::from_str::<Value>(&h).ok())
                .unwrap_or(Value::Null);
            if let Some(topic) = Topic::from_value(&json!({"topic": topic, "hints": hints})) {
                topics.push(topic);
            }
        }
        Ok(topics)
    }
}

/// Where the served catalog lives.
#[derive(Debug, Clone)]
pub enum Catalog {
    Db(SqlitePool),
    /// Re-read on every request so edits show up without a restart.
    File(PathBuf),
}

impl Catalog {
    pub async fn topics(&self) -> Result<Vec<Topic>, ErrorKind> {
        match self {
            Catalog::Db(pool) => AllTopics.query(pool).await,
            Catalog::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                let raw: Value = serde_json::from_slice(&bytes)?;
                normalize_topics(&raw).ok_or(ErrorKind::NotArray)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::io::Write;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("create table topics (topic TEXT, hints TEXT);")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn reads_topics_from_the_table() {
        let pool = memory_pool().await;
        for (topic, hints) in [
            (Some("Beach"), Some(r#"["Sand","Waves"]"#)),
            (Some("Library"), None),
            (Some("  "), Some(r#"["lost"]"#)),
            (None, None),
            (Some("Zoo"), Some("not json")),
        ] {
            sqlx::query("insert into topics (topic, hints) values (?, ?);")
                .bind(topic)
                .bind(hints)
                .execute(&pool)
                .await
                .unwrap();
        }

        let topics = Catalog::Db(pool).topics().await.unwrap();
        assert_eq!(topics, vec![
            Topic::new("Beach", &["Sand", "Waves"]),
            Topic::new("Library", &[]),
            Topic::new("Zoo", &[]),
        ]);
    }

    #[tokio::test]
    async fn missing_table_is_an_error() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        assert!(matches!(AllTopics.query(&pool).await, Err(ErrorKind::Sqlx(_))));
    }

    #[tokio::test]
    async fn reads_topics_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"topic":"Beach","hints":["Sand"]},{"name":"Zoo"},7]"#).unwrap();
        let topics = Catalog::File(file.path().to_path_buf()).topics().await.unwrap();
        assert_eq!(topics, vec![Topic::new("Beach", &["Sand"]), Topic::new("Zoo", &[])]);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"topic":"Beach"}"#).unwrap();
        let err = Catalog::File(file.path().to_path_buf()).topics().await.unwrap_err();
        assert!(matches!(err, ErrorKind::NotArray));
    }
}
