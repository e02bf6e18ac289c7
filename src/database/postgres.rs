use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::movie::MovieRow;
use super::{
    Beer, Brewery, Director, Genre, Movie, NewBeer, NewBrewery, NewMovie, NewUser, Store,
    StoreError, User, UserList,
};

const MOVIE_COLUMNS: &str = "id, title, description, genre_name, genre_description, \
    director_name, director_bio, director_birth, director_death, image_url, release, \
    featured, actors";

const USER_COLUMNS: &str = "id, username, password, email, birthday, favorite_movies, to_watch";

const BEER_COLUMNS: &str = "id, name, style, abv, categories, malts, hops, flavor_notes";

const BREWERY_COLUMNS: &str = "id, company_name, owner, admins, staff, beers, categories";

/// Postgres-backed store. Each operation is one statement, so list updates rely
/// on the row lock Postgres takes for a single `UPDATE`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate unique-constraint violations on `users` into conflicts.
fn user_write_error(err: sqlx::Error, user: &NewUser) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => {
                    StoreError::Conflict(format!("email {} is already registered", user.email))
                }
                _ => StoreError::Conflict(format!("{} already exists", user.username)),
            };
        }
    }
    StoreError::Sqlx(err)
}

/// `SET col = col + id` with set semantics. `column` is always one of our own
/// column names, never client input.
fn add_to_array_sql(table: &str, key: &str, column: &str, returning: &str) -> String {
    format!(
        "UPDATE {table} SET {column} = CASE WHEN $2 = ANY({column}) THEN {column} \
         ELSE array_append({column}, $2) END WHERE {key} = $1 RETURNING {returning}"
    )
}

fn remove_from_array_sql(table: &str, key: &str, column: &str, returning: &str) -> String {
    format!(
        "UPDATE {table} SET {column} = array_remove({column}, $2) WHERE {key} = $1 RETURNING {returning}"
    )
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY title");
        let rows = sqlx::query_as::<_, MovieRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn find_movie(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1");
        let row = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Movie::from))
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE title = $1 LIMIT 1");
        let row = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Movie::from))
    }

    async fn find_genre(&self, name: &str) -> Result<Option<Genre>, StoreError> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT genre_name, genre_description FROM movies WHERE genre_name = $1 LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(name, description)| Genre { name, description }))
    }

    async fn find_director(&self, name: &str) -> Result<Option<Director>, StoreError> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE director_name = $1 LIMIT 1");
        let row = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| Movie::from(row).director))
    }

    async fn find_movies_by_actor(&self, actor: &str) -> Result<Vec<Movie>, StoreError> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE $1 = ANY(actors) ORDER BY title");
        let rows = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(actor)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn insert_movie(&self, movie: NewMovie) -> Result<Movie, StoreError> {
        let sql = format!(
            "INSERT INTO movies ({MOVIE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {MOVIE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&movie.title)
            .bind(&movie.description)
            .bind(&movie.genre.name)
            .bind(&movie.genre.description)
            .bind(&movie.director.name)
            .bind(&movie.director.bio)
            .bind(movie.director.birth)
            .bind(movie.director.death)
            .bind(&movie.image_url)
            .bind(&movie.release)
            .bind(movie.featured)
            .bind(&movie.actors)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY username");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, username, password, email, birthday) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .bind(user.birthday)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| user_write_error(e, &user))
    }

    async fn update_user(&self, username: &str, user: NewUser) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE users SET username = $2, password = $3, email = $4, birthday = $5 \
             WHERE username = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .bind(user.birthday)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| user_write_error(e, &user))
    }

    async fn delete_user(&self, username: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_to_user_list(
        &self,
        username: &str,
        list: UserList,
        movie_id: Uuid,
    ) -> Result<Option<User>, StoreError> {
        let sql = add_to_array_sql("users", "username", list.column(), USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn remove_from_user_list(
        &self,
        username: &str,
        list: UserList,
        movie_id: Uuid,
    ) -> Result<Option<User>, StoreError> {
        let sql = remove_from_array_sql("users", "username", list.column(), USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_beers(&self) -> Result<Vec<Beer>, StoreError> {
        let sql = format!("SELECT {BEER_COLUMNS} FROM beers ORDER BY name");
        Ok(sqlx::query_as::<_, Beer>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_beer(&self, id: Uuid) -> Result<Option<Beer>, StoreError> {
        let sql = format!("SELECT {BEER_COLUMNS} FROM beers WHERE id = $1");
        Ok(sqlx::query_as::<_, Beer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_beer(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        let sql = format!(
            "INSERT INTO beers ({BEER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {BEER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Beer>(&sql)
            .bind(Uuid::new_v4())
            .bind(&beer.name)
            .bind(&beer.style)
            .bind(beer.abv)
            .bind(&beer.categories)
            .bind(&beer.malts)
            .bind(&beer.hops)
            .bind(&beer.flavor_notes)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_beer(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_breweries(&self) -> Result<Vec<Brewery>, StoreError> {
        let sql = format!("SELECT {BREWERY_COLUMNS} FROM breweries ORDER BY company_name");
        Ok(sqlx::query_as::<_, Brewery>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_brewery(&self, id: Uuid) -> Result<Option<Brewery>, StoreError> {
        let sql = format!("SELECT {BREWERY_COLUMNS} FROM breweries WHERE id = $1");
        Ok(sqlx::query_as::<_, Brewery>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_brewery(&self, brewery: NewBrewery) -> Result<Brewery, StoreError> {
        let brewery = brewery.into_brewery(Uuid::new_v4());
        let sql = format!(
            "INSERT INTO breweries ({BREWERY_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {BREWERY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Brewery>(&sql)
            .bind(brewery.id)
            .bind(&brewery.company_name)
            .bind(&brewery.owner)
            .bind(&brewery.admins)
            .bind(&brewery.staff)
            .bind(&brewery.beers)
            .bind(&brewery.categories)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn add_brewery_beer(&self, id: Uuid, beer_id: Uuid) -> Result<Option<Brewery>, StoreError> {
        let sql = add_to_array_sql("breweries", "id", "beers", BREWERY_COLUMNS);
        Ok(sqlx::query_as::<_, Brewery>(&sql)
            .bind(id)
            .bind(beer_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn remove_brewery_beer(
        &self,
        id: Uuid,
        beer_id: Uuid,
    ) -> Result<Option<Brewery>, StoreError> {
        let sql = remove_from_array_sql("breweries", "id", "beers", BREWERY_COLUMNS);
        Ok(sqlx::query_as::<_, Brewery>(&sql)
            .bind(id)
            .bind(beer_id)
            .fetch_optional(&self.pool)
            .await?)
    }
}
