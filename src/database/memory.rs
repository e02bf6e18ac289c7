use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Beer, Brewery, Director, Genre, Movie, NewBeer, NewBrewery, NewMovie, NewUser, Store,
    StoreError, User, UserList,
};

/// Process-local store used for development and tests.
///
/// Each collection sits behind its own lock; a list update takes the write lock
/// for the whole read-modify-write so it behaves like a per-document atomic
/// operator.
#[derive(Default)]
pub struct MemoryStore {
    movies: RwLock<Vec<Movie>>,
    users: RwLock<Vec<User>>,
    beers: RwLock<Vec<Beer>>,
    breweries: RwLock<Vec<Brewery>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert_unique(ids: &mut Vec<Uuid>, id: Uuid) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

fn ensure_unique(users: &[User], candidate: &NewUser, skip: Option<Uuid>) -> Result<(), StoreError> {
    for user in users.iter().filter(|u| Some(u.id) != skip) {
        if user.username == candidate.username {
            return Err(StoreError::Conflict(format!("{} already exists", candidate.username)));
        }
        if user.email == candidate.email {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                candidate.email
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        Ok(self.movies.read().await.clone())
    }

    async fn find_movie(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        Ok(self.movies.read().await.iter().find(|m| m.id == id).cloned())
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        Ok(self.movies.read().await.iter().find(|m| m.title == title).cloned())
    }

    async fn find_genre(&self, name: &str) -> Result<Option<Genre>, StoreError> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.genre.name == name).map(|m| m.genre.clone()))
    }

    async fn find_director(&self, name: &str) -> Result<Option<Director>, StoreError> {
        let movies = self.movies.read().await;
        Ok(movies
            .iter()
            .find(|m| m.director.name == name)
            .map(|m| m.director.clone()))
    }

    async fn find_movies_by_actor(&self, actor: &str) -> Result<Vec<Movie>, StoreError> {
        let movies = self.movies.read().await;
        Ok(movies
            .iter()
            .filter(|m| m.actors.iter().any(|a| a == actor))
            .cloned()
            .collect())
    }

    async fn insert_movie(&self, movie: NewMovie) -> Result<Movie, StoreError> {
        let movie = movie.into_movie(Uuid::new_v4());
        self.movies.write().await.push(movie.clone());
        Ok(movie)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        ensure_unique(&users, &user, None)?;

        let user = user.into_user(Uuid::new_v4());
        users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, username: &str, changes: NewUser) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        let Some(index) = users.iter().position(|u| u.username == username) else {
            return Ok(None);
        };
        ensure_unique(&users, &changes, Some(users[index].id))?;

        let user = &mut users[index];
        user.username = changes.username;
        user.password = changes.password_hash;
        user.email = changes.email;
        user.birthday = changes.birthday;
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, username: &str) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.username != username);
        Ok(users.len() != before)
    }

    async fn add_to_user_list(
        &self,
        username: &str,
        list: UserList,
        movie_id: Uuid,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.username == username).map(|user| {
            insert_unique(list.ids_mut(user), movie_id);
            user.clone()
        }))
    }

    async fn remove_from_user_list(
        &self,
        username: &str,
        list: UserList,
        movie_id: Uuid,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.username == username).map(|user| {
            list.ids_mut(user).retain(|id| *id != movie_id);
            user.clone()
        }))
    }

    async fn list_beers(&self) -> Result<Vec<Beer>, StoreError> {
        Ok(self.beers.read().await.clone())
    }

    async fn find_beer(&self, id: Uuid) -> Result<Option<Beer>, StoreError> {
        Ok(self.beers.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_beer(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        let beer = beer.into_beer(Uuid::new_v4());
        self.beers.write().await.push(beer.clone());
        Ok(beer)
    }

    async fn delete_beer(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut beers = self.beers.write().await;
        let before = beers.len();
        beers.retain(|b| b.id != id);
        Ok(beers.len() != before)
    }

    async fn list_breweries(&self) -> Result<Vec<Brewery>, StoreError> {
        Ok(self.breweries.read().await.clone())
    }

    async fn find_brewery(&self, id: Uuid) -> Result<Option<Brewery>, StoreError> {
        Ok(self.breweries.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_brewery(&self, brewery: NewBrewery) -> Result<Brewery, StoreError> {
        let brewery = brewery.into_brewery(Uuid::new_v4());
        self.breweries.write().await.push(brewery.clone());
        Ok(brewery)
    }

    async fn add_brewery_beer(&self, id: Uuid, beer_id: Uuid) -> Result<Option<Brewery>, StoreError> {
        let mut breweries = self.breweries.write().await;
        Ok(breweries.iter_mut().find(|b| b.id == id).map(|brewery| {
            insert_unique(&mut brewery.beers, beer_id);
            brewery.clone()
        }))
    }

    async fn remove_brewery_beer(
        &self,
        id: Uuid,
        beer_id: Uuid,
    ) -> Result<Option<Brewery>, StoreError> {
        let mut breweries = self.breweries.write().await;
        Ok(breweries.iter_mut().find(|b| b.id == id).map(|brewery| {
            brewery.beers.retain(|b| *b != beer_id);
            brewery.clone()
        }))
    }
}
