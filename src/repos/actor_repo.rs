/*
 * Responsibility
 * - actors rows and the storage seam handlers talk to
 */
use async_trait::async_trait;
use serde::Serialize;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ActorRow {
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewActor {
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

/// Partial update. `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct ActorChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl ActorChanges {
    pub fn apply(self, row: &mut ActorRow) {
        if let Some(name) = self.name {
            row.name = name;
        }
        if let Some(age) = self.age {
            row.age = Some(age);
        }
        if let Some(gender) = self.gender {
            row.gender = Some(gender);
        }
    }
}

#[async_trait]
pub trait ActorRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<ActorRow>, RepoError>;

    async fn create(&self, actor: NewActor) -> Result<ActorRow, RepoError>;

    /// `Ok(None)` when no actor has `id`.
    async fn update(&self, id: i64, changes: ActorChanges) -> Result<Option<ActorRow>, RepoError>;

    /// Returns the deleted row, `Ok(None)` when no actor has `id`.
    async fn delete(&self, id: i64) -> Result<Option<ActorRow>, RepoError>;
}
