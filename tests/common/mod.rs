#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use gastos_api::auth::{generate_jwt, Claims};

pub const JWT_SECRET: &str = "integration-test-secret";

/// The compiled server running on a free port with in-memory storage.
/// The process is killed when the value is dropped.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_gastos-api"))
            .arg("serve")
            .env("GASTOS_API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("STORAGE", "memory")
            .env("JWT_SECRET", JWT_SECRET)
            .env("RUST_LOG", "gastos_api=warn")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Token for `tenant`, signed like the external issuer would
pub fn token_for(tenant: &str) -> String {
    let claims = Claims::new(tenant, Some(format!("{}@example.com", tenant)), 3600);
    generate_jwt(JWT_SECRET, &claims).expect("failed to sign test token")
}

/// Client that sends `Authorization: Bearer <token>` for `tenant`
pub fn client_for(tenant: &str) -> Result<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::AUTHORIZATION,
        format!("Bearer {}", token_for(tenant)).parse()?,
    );
    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

pub async fn json_body(resp: reqwest::Response) -> Result<Value> {
    Ok(resp.json::<Value>().await?)
}
