use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// bcrypt hash; never part of a response body
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub favorite_movies: Vec<Uuid>,
    pub to_watch: Vec<Uuid>,
}

/// Validated user fields with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

/// Movie id lists held on a user document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserList {
    Favorites,
    ToWatch,
}

impl UserList {
    pub fn column(self) -> &'static str {
        match self {
            UserList::Favorites => "favorite_movies",
            UserList::ToWatch => "to_watch",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UserList::Favorites => "favorites",
            UserList::ToWatch => "to-watch list",
        }
    }

    pub fn ids_mut(self, user: &mut User) -> &mut Vec<Uuid> {
        match self {
            UserList::Favorites => &mut user.favorite_movies,
            UserList::ToWatch => &mut user.to_watch,
        }
    }
}

impl NewUser {
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            username: self.username,
            password: self.password_hash,
            email: self.email,
            birthday: self.birthday,
            favorite_movies: Vec::new(),
            to_watch: Vec::new(),
        }
    }
}
