pub mod beer;
pub mod movie;
pub mod user;

pub use beer::{Beer, Brewery, NewBeer, NewBrewery};
pub use movie::{Director, Genre, Movie, NewMovie};
pub use user::{NewUser, User, UserList};
