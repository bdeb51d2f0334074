use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::error::ApiError;
use crate::types::TenantId;

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("User not authenticated")]
    Unauthenticated,
}

/// Per-request slot for the authenticated tenant.
///
/// The gate creates one context per request, so a value written while
/// serving one request is never visible to another. Clones share the slot.
#[derive(Clone, Debug, Default)]
pub struct TenantContext {
    slot: Arc<Mutex<Option<TenantId>>>,
}

impl TenantContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the tenant id; blank ids are ignored with a warning
    pub fn set(&self, id: impl Into<String>) {
        let id = id.into();
        if id.trim().is_empty() {
            tracing::warn!("Ignoring attempt to set an empty tenant id");
            return;
        }
        tracing::debug!("Tenant set in request context: {}", id);
        *self.lock() = Some(TenantId::new(id));
    }

    pub fn get(&self) -> Result<TenantId, TenantError> {
        self.get_or_none().ok_or_else(|| {
            tracing::error!("Tenant requested from a request context with no authenticated user");
            TenantError::Unauthenticated
        })
    }

    pub fn get_or_none(&self) -> Option<TenantId> {
        self.lock().clone()
    }

    pub fn has_tenant(&self) -> bool {
        self.lock().is_some()
    }

    pub fn clear(&self) {
        if let Some(id) = self.lock().take() {
            tracing::debug!("Tenant cleared from request context: {}", id);
        }
    }

    /// Guard that clears the slot when dropped, covering early returns and panics
    pub fn scope(&self) -> TenantScope {
        TenantScope(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Option<TenantId>> {
        // A poisoned slot still holds a plain Option, safe to keep using
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct TenantScope(TenantContext);

impl Drop for TenantScope {
    fn drop(&mut self) {
        self.0.clear();
    }
}

/// Extractor yielding the tenant the gate authenticated for this request
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub TenantId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<TenantContext>()
            .ok_or(TenantError::Unauthenticated)?;

        Ok(CurrentTenant(context.get()?))
    }
}
