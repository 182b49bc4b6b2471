//! Accelerated text-search index
//!
//! Optional FTS5 virtual table over the entities table for fast licensee
//! name searches. Never authoritative: it can be dropped and rebuilt from
//! the entities table at any time, and the pipeline does not maintain it.

use serde::Serialize;
use sqlx::SqlitePool;
use uls_common::Result;

const INDEX_TABLE: &str = "entities_fts";

/// One full-text search hit, best match first
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TextMatch {
    pub unique_system_identifier: String,
    pub entity_name: Option<String>,
    pub entity_type: Option<String>,
    pub state: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Builder and reader for the text index
pub struct TextIndex {
    db: SqlitePool,
}

impl TextIndex {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Whether the index table currently exists
    pub async fn exists(&self) -> Result<bool> {
        let found: Option<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(INDEX_TABLE)
        .fetch_optional(&self.db)
        .await?;
        Ok(found.is_some())
    }

    /// Drop and rebuild the index from the entities table.
    ///
    /// Returns the number of rows indexed.
    pub async fn rebuild(&self) -> Result<u64> {
        tracing::info!("Rebuilding text index over entities");

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", INDEX_TABLE))
            .execute(&self.db)
            .await?;

        sqlx::query(&format!(
            r#"
            CREATE VIRTUAL TABLE {} USING fts5(
                unique_system_identifier,
                entity_name,
                entity_type,
                state,
                first_name,
                last_name
            )
            "#,
            INDEX_TABLE
        ))
        .execute(&self.db)
        .await?;

        let result = sqlx::query(&format!(
            r#"
            INSERT INTO {} (
                unique_system_identifier, entity_name, entity_type,
                state, first_name, last_name
            )
            SELECT
                unique_system_identifier,
                COALESCE(entity_name, ''),
                COALESCE(entity_type, ''),
                COALESCE(state, ''),
                COALESCE(first_name, ''),
                COALESCE(last_name, '')
            FROM entities
            "#,
            INDEX_TABLE
        ))
        .execute(&self.db)
        .await?;

        sqlx::query(&format!(
            "INSERT INTO {table} ({table}) VALUES ('optimize')",
            table = INDEX_TABLE
        ))
        .execute(&self.db)
        .await?;

        let indexed = result.rows_affected();
        tracing::info!("Text index rebuilt with {} rows", indexed);
        Ok(indexed)
    }

    /// Remove the index table entirely
    pub async fn drop_index(&self) -> Result<()> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", INDEX_TABLE))
            .execute(&self.db)
            .await?;
        tracing::info!("Text index dropped");
        Ok(())
    }

    /// Full-text query ranked by bm25
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<TextMatch>> {
        let matches = sqlx::query_as::<_, TextMatch>(&format!(
            r#"
            SELECT unique_system_identifier, entity_name, entity_type,
                   state, first_name, last_name
            FROM {table}
            WHERE {table} MATCH ?
            ORDER BY bm25({table})
            LIMIT ?
            "#,
            table = INDEX_TABLE
        ))
        .bind(query)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entities;
    use crate::models::EntityRecord;

    async fn seed() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        uls_common::db::create_schema(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let names = [
            ("1001", "ABC123", "Grandview Hotel Group"),
            ("1002", "DEF456", "City Police Department"),
            ("1003", "GHI789", "Grandview Fire District"),
        ];
        for (usi, cs, name) in names {
            let entity = EntityRecord {
                unique_system_identifier: usi.to_string(),
                call_sign: Some(cs.to_string()),
                entity_name: Some(name.to_string()),
                ..Default::default()
            };
            entities::upsert(&mut conn, &entity).await.unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn rebuild_indexes_every_entity_row() {
        let pool = seed().await;
        let index = TextIndex::new(pool);

        assert!(!index.exists().await.unwrap());
        let indexed = index.rebuild().await.unwrap();
        assert_eq!(indexed, 3);
        assert!(index.exists().await.unwrap());

        // Rebuild is idempotent
        let indexed = index.rebuild().await.unwrap();
        assert_eq!(indexed, 3);
    }

    #[tokio::test]
    async fn search_ranks_matches() {
        let pool = seed().await;
        let index = TextIndex::new(pool);
        index.rebuild().await.unwrap();

        let matches = index.search("grandview", 10).await.unwrap();
        assert_eq!(matches.len(), 2);

        let matches = index.search("police", 10).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].unique_system_identifier, "1002");
    }

    #[tokio::test]
    async fn drop_index_removes_table() {
        let pool = seed().await;
        let index = TextIndex::new(pool);
        index.rebuild().await.unwrap();
        index.drop_index().await.unwrap();
        assert!(!index.exists().await.unwrap());
    }
}
