use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    pub name: String,
    pub bio: String,
    #[serde(default)]
    pub birth: Option<NaiveDate>,
    #[serde(default)]
    pub death: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    pub image_url: Option<String>,
    pub release: Option<String>,
    pub featured: bool,
    pub actors: Vec<String>,
}

/// Movie as accepted by the seed command; the id is assigned on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub actors: Vec<String>,
}

impl NewMovie {
    pub fn into_movie(self, id: Uuid) -> Movie {
        Movie {
            id,
            title: self.title,
            description: self.description,
            genre: self.genre,
            director: self.director,
            image_url: self.image_url,
            release: self.release,
            featured: self.featured,
            actors: self.actors,
        }
    }
}

/// Flat row shape of the `movies` table
#[derive(Debug, FromRow)]
pub(crate) struct MovieRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genre_name: String,
    pub genre_description: String,
    pub director_name: String,
    pub director_bio: String,
    pub director_birth: Option<NaiveDate>,
    pub director_death: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub release: Option<String>,
    pub featured: bool,
    pub actors: Vec<String>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            genre: Genre {
                name: row.genre_name,
                description: row.genre_description,
            },
            director: Director {
                name: row.director_name,
                bio: row.director_bio,
                birth: row.director_birth,
                death: row.director_death,
            },
            image_url: row.image_url,
            release: row.release,
            featured: row.featured,
            actors: row.actors,
        }
    }
}
