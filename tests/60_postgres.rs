//! Runs the `Store` contract against a live Postgres.
//!
//! Skipped unless `DATABASE_URL` is set. Every test uses fresh usernames, so the
//! suite can share a database with other runs.

use std::sync::Arc;

use anyhow::Result;
use myflix_api::config::AppConfig;
use myflix_api::database::{DatabaseManager, NewUser, PgStore, Store, StoreError, UserList};
use tokio::sync::Mutex;
use uuid::Uuid;

// Concurrent CREATE TABLE IF NOT EXISTS can race on the catalog
static MIGRATE: Mutex<()> = Mutex::const_new(());

async fn pg_store() -> Result<Option<PgStore>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping Postgres store test");
        return Ok(None);
    };

    let mut config = AppConfig::development().database;
    config.url = Some(url);

    let manager = DatabaseManager::connect(&config).await?;
    {
        let _guard = MIGRATE.lock().await;
        manager.migrate().await?;
    }
    Ok(Some(manager.store()))
}

fn unique_name() -> String {
    format!("pg{}", &Uuid::new_v4().simple().to_string()[..12])
}

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: "$2b$04$not-a-real-hash".to_string(),
        email: email.to_string(),
        birthday: None,
    }
}

#[tokio::test]
async fn duplicate_username_and_email_are_conflicts() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let name = unique_name();
    let email = format!("{}@example.com", name);
    store.insert_user(new_user(&name, &email)).await?;

    let other_email = format!("{}-other@example.com", name);
    let err = store.insert_user(new_user(&name, &other_email)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(ref msg) if msg.contains(&name)), "{err:?}");

    let other_name = unique_name();
    let err = store.insert_user(new_user(&other_name, &email)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(ref msg) if msg.contains("email")), "{err:?}");
    assert!(store.find_user(&other_name).await?.is_none());

    store.delete_user(&name).await?;
    Ok(())
}

#[tokio::test]
async fn adding_twice_keeps_one_entry_and_removing_absent_is_a_no_op() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let name = unique_name();
    store.insert_user(new_user(&name, &format!("{}@example.com", name))).await?;
    let movie = Uuid::new_v4();

    store.add_to_user_list(&name, UserList::Favorites, movie).await?;
    let user = store
        .add_to_user_list(&name, UserList::Favorites, movie)
        .await?
        .expect("user exists");
    assert_eq!(user.favorite_movies, vec![movie]);
    assert!(user.to_watch.is_empty());

    let user = store
        .remove_from_user_list(&name, UserList::Favorites, Uuid::new_v4())
        .await?
        .expect("user exists");
    assert_eq!(user.favorite_movies, vec![movie]);

    let user = store
        .remove_from_user_list(&name, UserList::Favorites, movie)
        .await?
        .expect("user exists");
    assert!(user.favorite_movies.is_empty());

    store.delete_user(&name).await?;
    Ok(())
}

#[tokio::test]
async fn list_update_on_unknown_user_is_none() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let name = unique_name();

    assert!(store
        .add_to_user_list(&name, UserList::ToWatch, Uuid::new_v4())
        .await?
        .is_none());
    assert!(store
        .remove_from_user_list(&name, UserList::ToWatch, Uuid::new_v4())
        .await?
        .is_none());
    assert!(!store.delete_user(&name).await?);
    Ok(())
}

#[tokio::test]
async fn concurrent_adds_all_land() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let store = Arc::new(store);
    let name = unique_name();
    store.insert_user(new_user(&name, &format!("{}@example.com", name))).await?;

    let ids: Vec<Uuid> = (0..32).map(|_| Uuid::new_v4()).collect();
    let tasks = ids.iter().copied().map(|id| {
        let store = Arc::clone(&store);
        let name = name.clone();
        tokio::spawn(async move { store.add_to_user_list(&name, UserList::ToWatch, id).await })
    });
    for result in futures::future::join_all(tasks).await {
        result??;
    }

    let user = store.find_user(&name).await?.expect("user exists");
    assert_eq!(user.to_watch.len(), ids.len());
    for id in &ids {
        assert!(user.to_watch.contains(id));
    }

    store.delete_user(&name).await?;
    Ok(())
}
