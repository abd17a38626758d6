use sqlx::FromRow;
use time::OffsetDateTime;

/// Row of the `search_history` table as read back for a user.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Visit {
    pub url: String,
    pub title: String,
    pub search_query: String,
    pub visited_at: OffsetDateTime,
}

/// A visit to append; `visited_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub user_id: i64,
    pub url: String,
    pub title: String,
    pub search_query: String,
}
