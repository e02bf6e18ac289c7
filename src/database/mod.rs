pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use models::{
    Beer, Brewery, Director, Genre, Movie, NewBeer, NewBrewery, NewMovie, NewUser, User, UserList,
};
pub use postgres::PgStore;

/// Errors surfaced by a [`Store`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key (username, email) is already taken
    #[error("{0}")]
    Conflict(String),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Repository over the movie, user, beer and brewery collections.
///
/// Every mutation is a single atomic operation on one document: implementations
/// must never let concurrent list updates on the same record overwrite each
/// other. Lookups that miss return `Ok(None)` / `Ok(false)` rather than an error.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    // Movies
    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError>;
    async fn find_movie(&self, id: Uuid) -> Result<Option<Movie>, StoreError>;
    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError>;
    async fn find_genre(&self, name: &str) -> Result<Option<Genre>, StoreError>;
    async fn find_director(&self, name: &str) -> Result<Option<Director>, StoreError>;
    async fn find_movies_by_actor(&self, actor: &str) -> Result<Vec<Movie>, StoreError>;
    async fn insert_movie(&self, movie: NewMovie) -> Result<Movie, StoreError>;

    // Users
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when the username or email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Replaces the profile fields of `username`; lists are untouched.
    async fn update_user(&self, username: &str, user: NewUser) -> Result<Option<User>, StoreError>;
    async fn delete_user(&self, username: &str) -> Result<bool, StoreError>;

    /// Adds `movie_id` to the list unless already present.
    async fn add_to_user_list(
        &self,
        username: &str,
        list: UserList,
        movie_id: Uuid,
    ) -> Result<Option<User>, StoreError>;

    /// Removes `movie_id` from the list; absent ids leave the user unchanged.
    async fn remove_from_user_list(
        &self,
        username: &str,
        list: UserList,
        movie_id: Uuid,
    ) -> Result<Option<User>, StoreError>;

    // Beers
    async fn list_beers(&self) -> Result<Vec<Beer>, StoreError>;
    async fn find_beer(&self, id: Uuid) -> Result<Option<Beer>, StoreError>;
    async fn insert_beer(&self, beer: NewBeer) -> Result<Beer, StoreError>;
    async fn delete_beer(&self, id: Uuid) -> Result<bool, StoreError>;

    // Breweries
    async fn list_breweries(&self) -> Result<Vec<Brewery>, StoreError>;
    async fn find_brewery(&self, id: Uuid) -> Result<Option<Brewery>, StoreError>;
    async fn insert_brewery(&self, brewery: NewBrewery) -> Result<Brewery, StoreError>;
    async fn add_brewery_beer(&self, id: Uuid, beer_id: Uuid) -> Result<Option<Brewery>, StoreError>;
    async fn remove_brewery_beer(
        &self,
        id: Uuid,
        beer_id: Uuid,
    ) -> Result<Option<Brewery>, StoreError>;
}
