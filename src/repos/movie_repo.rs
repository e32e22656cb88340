/*
 * Responsibility
 * - movies rows and the storage seam handlers talk to
 */
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MovieRow {
    pub id: i64,
    pub title: String,
    pub release_date: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub release_date: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub release_date: Option<NaiveDateTime>,
}

impl MovieChanges {
    pub fn apply(self, row: &mut MovieRow) {
        if let Some(title) = self.title {
            row.title = title;
        }
        if let Some(release_date) = self.release_date {
            row.release_date = release_date;
        }
    }
}

#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<MovieRow>, RepoError>;

    async fn create(&self, movie: NewMovie) -> Result<MovieRow, RepoError>;

    async fn update(&self, id: i64, changes: MovieChanges) -> Result<Option<MovieRow>, RepoError>;

    async fn delete(&self, id: i64) -> Result<Option<MovieRow>, RepoError>;
}
