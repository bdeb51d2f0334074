use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;

pub fn handle(id: String, login: Option<String>, ttl: Option<i64>, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config().security;
    if security.jwt_secret.trim().is_empty() {
        anyhow::bail!("JWT_SECRET must be set to sign tokens");
    }

    let ttl = ttl.unwrap_or(security.jwt_expiration_secs as i64);
    let claims = Claims::new(id, login, ttl);
    let token = generate_jwt(&security.jwt_secret, &claims)?;

    match output_format {
        OutputFormat::Json => output_success(
            output_format,
            "Token generated",
            Some(json!({
                "token": token,
                "expires_at": claims.expires_at(),
            })),
        ),
        // Bare token so it can be captured by a shell
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
