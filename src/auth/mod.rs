use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::types::TenantId;

/// Claim set issued by the external auth service: `{ id, login, iat, exp }`.
/// Unknown claims are kept so nothing is lost on decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "numeric_date", skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, deserialize_with = "numeric_date", skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn new(id: impl Into<String>, login: Option<String>, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Some(Value::String(id.into())),
            login,
            iat: Some(now.timestamp()),
            exp: Some((now + Duration::seconds(ttl_secs)).timestamp()),
            extra: Map::new(),
        }
    }

    /// The `id` claim rendered as a string; `None` when absent or null
    pub fn tenant_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }
}

/// NumericDate claims may be integers or fractional seconds; fractions are
/// truncated toward the past.
fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
            .map(Some)
            .ok_or_else(|| de::Error::custom("NumericDate out of range")),
        Some(other) => Err(de::Error::custom(format!(
            "NumericDate must be a number, got {}",
            other
        ))),
    }
}

/// Token validation failures. Malformed, badly signed and expired tokens
/// all collapse into `Invalid`.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("invalid token: missing id claim")]
    MissingId,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Verifies tokens signed with the secret shared with the auth service
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &str, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = leeway_secs;
        // exp is checked whenever present, but tokens without it are accepted
        validation.required_spec_claims.clear();
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(&security.jwt_secret, security.jwt_leeway_secs)
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                tracing::debug!("Token validated for id claim {:?}", data.claims.id);
                Ok(data.claims)
            }
            Err(e) => {
                tracing::error!("Token validation failed: {}", e);
                Err(TokenError::Invalid(e.to_string()))
            }
        }
    }

    /// Validate and read the required `id` claim
    pub fn extract_tenant_id(&self, token: &str) -> Result<TenantId, TokenError> {
        let claims = self.validate(token)?;
        match claims.tenant_id() {
            Some(id) => Ok(TenantId::new(id)),
            None => {
                tracing::error!("Token has no 'id' claim");
                Err(TokenError::MissingId)
            }
        }
    }

    /// Validate and read the optional `login` claim
    pub fn extract_login(&self, token: &str) -> Result<Option<String>, TokenError> {
        Ok(self.validate(token)?.login)
    }

    /// Validate and read the `exp` claim
    pub fn expiration(&self, token: &str) -> Result<Option<DateTime<Utc>>, TokenError> {
        Ok(self.validate(token)?.expires_at())
    }

    /// True when the token fails validation for any reason or its expiry has passed
    pub fn is_expired(&self, token: &str) -> bool {
        match self.validate(token) {
            Ok(claims) => claims.expires_at().map_or(false, |exp| exp < Utc::now()),
            Err(_) => true,
        }
    }
}

/// Sign a token in the same shape the auth service issues. Used by the CLI
/// and tests; production tokens come from the auth service.
pub fn generate_jwt(secret: &str, claims: &Claims) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}
