use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, NewMovie, Store};

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[arg(long, short, help = "JSON file holding an array of movies")]
    pub file: PathBuf,

    #[arg(long, help = "Apply the schema before inserting")]
    pub migrate: bool,
}

pub async fn handle(args: SeedArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let movies = read_movies(&args.file)?;

    let manager = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if args.migrate {
        manager.migrate().await.context("failed to apply schema")?;
    }

    let store = manager.store();
    let inserted = insert_movies(&store, movies).await?;
    manager.close().await;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "inserted": inserted })),
        OutputFormat::Text => println!("Inserted {} movies from {}", inserted, args.file.display()),
    }
    Ok(())
}

fn read_movies(path: &Path) -> anyhow::Result<Vec<NewMovie>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a JSON array of movies", path.display()))
}

/// Insert concurrently; the first failure aborts the command.
pub async fn insert_movies(store: &dyn Store, movies: Vec<NewMovie>) -> anyhow::Result<usize> {
    let inserts = movies.into_iter().map(|movie| store.insert_movie(movie));
    let inserted = futures::future::try_join_all(inserts)
        .await
        .context("failed to insert movies")?;

    tracing::info!(count = inserted.len(), "Seeded movies");
    Ok(inserted.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    const MOVIES: &str = r#"[
        {
            "title": "Alien",
            "description": "A crew answers a distress call.",
            "genre": { "name": "Horror", "description": "Meant to frighten." },
            "director": { "name": "Ridley Scott", "bio": "English director.", "birth": "1937-11-30" },
            "actors": ["Sigourney Weaver", "Tom Skerritt"]
        },
        {
            "title": "Heat",
            "description": "A thief and a detective.",
            "genre": { "name": "Crime", "description": "Crooks and cops." },
            "director": { "name": "Michael Mann", "bio": "American director." },
            "featured": true
        }
    ]"#;

    #[tokio::test]
    async fn seeds_every_movie_in_the_file() {
        let movies: Vec<NewMovie> = serde_json::from_str(MOVIES).unwrap();
        let store = MemoryStore::new();

        assert_eq!(insert_movies(&store, movies).await.unwrap(), 2);

        let alien = store.find_movie_by_title("Alien").await.unwrap().unwrap();
        assert_eq!(alien.actors.len(), 2);
        assert!(alien.director.birth.is_some());
        assert!(!alien.featured);
        assert!(store.find_movie_by_title("Heat").await.unwrap().unwrap().featured);
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let err = read_movies(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
