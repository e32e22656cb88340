/*
 * Responsibility
 * - actors / movies SQLx operations against Postgres
 * - schema lives in ./migrations and is applied by `PgCatalog::migrate`
 */
use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::actor_repo::{ActorChanges, ActorRepo, ActorRow, NewActor};
use crate::repos::error::RepoError;
use crate::repos::movie_repo::{MovieChanges, MovieRepo, MovieRow, NewMovie};

#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), RepoError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ActorRepo for PgCatalog {
    async fn list(&self) -> Result<Vec<ActorRow>, RepoError> {
        let rows = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, name, age, gender
            FROM actors
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, actor: NewActor) -> Result<ActorRow, RepoError> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            INSERT INTO actors (name, age, gender)
            VALUES ($1, $2, $3)
            RETURNING id, name, age, gender
            "#,
        )
        .bind(actor.name)
        .bind(actor.age)
        .bind(actor.gender)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, changes: ActorChanges) -> Result<Option<ActorRow>, RepoError> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            UPDATE actors
            SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender)
            WHERE id = $1
            RETURNING id, name, age, gender
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.age)
        .bind(changes.gender)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<Option<ActorRow>, RepoError> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            DELETE FROM actors
            WHERE id = $1
            RETURNING id, name, age, gender
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl MovieRepo for PgCatalog {
    async fn list(&self) -> Result<Vec<MovieRow>, RepoError> {
        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, title, release_date
            FROM movies
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, movie: NewMovie) -> Result<MovieRow, RepoError> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            INSERT INTO movies (title, release_date)
            VALUES ($1, $2)
            RETURNING id, title, release_date
            "#,
        )
        .bind(movie.title)
        .bind(movie.release_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, changes: MovieChanges) -> Result<Option<MovieRow>, RepoError> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            UPDATE movies
            SET
                title = COALESCE($2, title),
                release_date = COALESCE($3, release_date)
            WHERE id = $1
            RETURNING id, title, release_date
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.release_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<Option<MovieRow>, RepoError> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            DELETE FROM movies
            WHERE id = $1
            RETURNING id, title, release_date
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
