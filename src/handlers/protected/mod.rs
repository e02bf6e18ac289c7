// handlers/protected/mod.rs - Handlers behind the bearer-token middleware
//
// Every route here sees an `AuthUser` extension inserted by `jwt_auth_middleware`.

pub mod beers;
pub mod breweries;
pub mod lists;
pub mod movies;
pub mod users;
