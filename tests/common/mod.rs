#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;
use uuid::Uuid;

use job_board_api::config::AppConfig;
use job_board_api::database::{MemoryEmailStore, MemoryJobPostStore, MemorySessionStore};
use job_board_api::{app, AppState};

pub const TOKEN: &str = "integration-token-a";
pub const OTHER_TOKEN: &str = "integration-token-b";

/// In-process server backed by memory stores, one per test
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub user: Uuid,
    pub other_user: Uuid,
    client: reqwest::Client,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(AppConfig::development()).await
    }

    pub async fn spawn_with(mut config: AppConfig) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        config.api.enable_request_logging = false;

        let user = Uuid::new_v4();
        let other_user = Uuid::new_v4();
        let sessions = Arc::new(MemorySessionStore::new());
        sessions.insert(TOKEN, user).await;
        sessions.insert(OTHER_TOKEN, other_user).await;

        let state = AppState::new(
            config,
            Arc::new(MemoryJobPostStore::new()),
            Arc::new(MemoryEmailStore::new()),
            sessions,
        );

        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state))
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        let server = Self {
            port,
            base_url,
            user,
            other_user,
            client: reqwest::Client::new(),
            _shutdown_tx: Some(shutdown_tx),
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
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Create a post as `TOKEN`'s user and return the stored record
    pub async fn create_post(&self, body: Value) -> Result<Value> {
        let res = self
            .post("/jobposts")
            .header("Authorization", TOKEN)
            .json(&body)
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create returned {}", res.status());
        Ok(res.json().await?)
    }

    pub async fn list(&self, query: &str) -> Result<Vec<Value>> {
        let res = self.get(&format!("/jobposts{}", query)).send().await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "list returned {}", res.status());
        Ok(res.json().await?)
    }
}

pub fn titles(posts: &[Value]) -> Vec<&str> {
    posts.iter().filter_map(|p| p["title"].as_str()).collect()
}
