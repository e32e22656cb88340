pub mod actor_repo;
pub mod error;
pub mod memory;
pub mod movie_repo;
pub mod postgres;

pub use actor_repo::{ActorChanges, ActorRepo, ActorRow, NewActor};
pub use error::RepoError;
pub use memory::MemoryCatalog;
pub use movie_repo::{MovieChanges, MovieRepo, MovieRow, NewMovie};
pub use postgres::PgCatalog;
