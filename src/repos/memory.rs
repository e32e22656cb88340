//! In-process catalog used when no database is configured (and by tests).

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::actor_repo::{ActorChanges, ActorRepo, ActorRow, NewActor};
use crate::repos::error::RepoError;
use crate::repos::movie_repo::{MovieChanges, MovieRepo, MovieRow, NewMovie};

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    actors: RwLock<Table<ActorRow>>,
    movies: RwLock<Table<MovieRow>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActorRepo for MemoryCatalog {
    async fn list(&self) -> Result<Vec<ActorRow>, RepoError> {
        Ok(self.actors.read().await.rows.values().cloned().collect())
    }

    async fn create(&self, actor: NewActor) -> Result<ActorRow, RepoError> {
        let mut table = self.actors.write().await;
        let row = ActorRow {
            id: table.allocate_id(),
            name: actor.name,
            age: actor.age,
            gender: actor.gender,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, changes: ActorChanges) -> Result<Option<ActorRow>, RepoError> {
        let mut table = self.actors.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            changes.apply(row);
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<Option<ActorRow>, RepoError> {
        Ok(self.actors.write().await.rows.remove(&id))
    }
}

#[async_trait]
impl MovieRepo for MemoryCatalog {
    async fn list(&self) -> Result<Vec<MovieRow>, RepoError> {
        Ok(self.movies.read().await.rows.values().cloned().collect())
    }

    async fn create(&self, movie: NewMovie) -> Result<MovieRow, RepoError> {
        let mut table = self.movies.write().await;
        let row = MovieRow {
            id: table.allocate_id(),
            title: movie.title,
            release_date: movie.release_date,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, changes: MovieChanges) -> Result<Option<MovieRow>, RepoError> {
        let mut table = self.movies.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            changes.apply(row);
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<Option<MovieRow>, RepoError> {
        Ok(self.movies.write().await.rows.remove(&id))
    }
}
