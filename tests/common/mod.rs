#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};

use myflix_api::config::AppConfig;
use myflix_api::database::{Director, Genre, MemoryStore, Movie, NewMovie, Store};
use myflix_api::state::AppState;

pub const PASSWORD: &str = "popcorn123";

/// In-process server over a fresh in-memory store, one per test.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with test defaults, then let the caller adjust the config.
    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "integration-test-secret".to_string();
        config.security.bcrypt_cost = 4;
        config.api.enable_request_logging = false;
        configure(&mut config);

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config);

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, myflix_api::app(state)).await;
        });

        let server = Self {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
            store,
            client: Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, email: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/users"))
            .json(&json!({
                "username": username,
                "password": PASSWORD,
                "email": email,
                "birthday": "1994-06-15"
            }))
            .send()
            .await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?)
    }

    /// Register `username` and return a bearer token for it.
    pub async fn user_with_token(&self, username: &str) -> Result<String> {
        let res = self.register(username, &format!("{}@example.com", username)).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let body: Value = self.login(username, PASSWORD).await?.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.post(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post_json(&self, path: &str, token: &str, body: &Value) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn put_json(&self, path: &str, token: &str, body: &Value) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn seed_movie(&self, title: &str, genre: &str, director: &str, actors: &[&str]) -> Result<Movie> {
        let movie = NewMovie {
            title: title.to_string(),
            description: format!("{} description", title),
            genre: Genre {
                name: genre.to_string(),
                description: format!("All about {}", genre),
            },
            director: Director {
                name: director.to_string(),
                bio: format!("{} bio", director),
                birth: None,
                death: None,
            },
            image_url: None,
            release: Some("1999".to_string()),
            featured: false,
            actors: actors.iter().map(|a| a.to_string()).collect(),
        };
        Ok(self.store.insert_movie(movie).await?)
    }
}
