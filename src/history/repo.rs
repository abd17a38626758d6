use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::history::repo_types::{NewVisit, Visit};

/// Most visits returned for one user.
pub const HISTORY_LIMIT: i64 = 50;

/// Append-only store of visited pages.
#[async_trait]
pub trait HistoryRepo: Send + Sync {
    async fn append(&self, visit: &NewVisit) -> anyhow::Result<()>;

    /// Newest first, at most `limit` rows.
    async fn recent_for_user(&self, user_id: i64, limit: i64) -> anyhow::Result<Vec<Visit>>;
}

#[derive(Clone)]
pub struct PgHistoryRepo {
    db: PgPool,
}

impl PgHistoryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryRepo for PgHistoryRepo {
    async fn append(&self, visit: &NewVisit) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO search_history (user_id, url, title, search_query)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(visit.user_id)
        .bind(&visit.url)
        .bind(&visit.title)
        .bind(&visit.search_query)
        .execute(&self.db)
        .await
        .context("insert search history")?;
        Ok(())
    }

    async fn recent_for_user(&self, user_id: i64, limit: i64) -> anyhow::Result<Vec<Visit>> {
        let rows = sqlx::query_as::<_, Visit>(
            r#"
            SELECT url, title, search_query, visited_at
            FROM search_history
            WHERE user_id = $1
            ORDER BY visited_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("list search history")?;
        Ok(rows)
    }
}
