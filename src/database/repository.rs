use async_trait::async_trait;
use std::sync::Arc;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, Expense};
use crate::types::TenantId;

/// Tenant-scoped access to categories. Every lookup takes the owning tenant,
/// so a category id from another tenant behaves as if it did not exist.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_tenant(&self, tenant: &TenantId) -> Result<Vec<Category>, DatabaseError>;

    async fn find_by_id_and_tenant(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<Option<Category>, DatabaseError>;

    async fn exists_by_name_and_tenant(
        &self,
        name: &str,
        tenant: &TenantId,
    ) -> Result<bool, DatabaseError>;

    async fn insert(&self, category: &Category) -> Result<(), DatabaseError>;

    /// Overwrite an existing category (last write wins)
    async fn update(&self, category: &Category) -> Result<(), DatabaseError>;

    async fn delete(&self, id: &str, tenant: &TenantId) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn find_by_tenant(&self, tenant: &TenantId) -> Result<Vec<Expense>, DatabaseError>;

    async fn find_by_id_and_tenant(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<Option<Expense>, DatabaseError>;

    async fn find_by_category_and_tenant(
        &self,
        category_id: &str,
        tenant: &TenantId,
    ) -> Result<Vec<Expense>, DatabaseError>;

    /// Same as `find_by_category_and_tenant`, ordered by creation time descending
    async fn find_by_category_and_tenant_newest_first(
        &self,
        category_id: &str,
        tenant: &TenantId,
    ) -> Result<Vec<Expense>, DatabaseError>;

    async fn exists_by_category_and_tenant(
        &self,
        category_id: &str,
        tenant: &TenantId,
    ) -> Result<bool, DatabaseError>;

    async fn insert(&self, expense: &Expense) -> Result<(), DatabaseError>;

    async fn update(&self, expense: &Expense) -> Result<(), DatabaseError>;

    async fn delete(&self, id: &str, tenant: &TenantId) -> Result<(), DatabaseError>;
}

/// Liveness probe for whichever backend is configured
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Short backend name reported by the health endpoint
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// The repositories the services work against. One backend usually
/// implements all of them; each is held as its own trait object.
#[derive(Clone)]
pub struct Repositories {
    pub categories: Arc<dyn CategoryRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CategoryRepository + ExpenseRepository + HealthCheck + 'static,
    {
        Self {
            categories: store.clone(),
            expenses: store.clone(),
            health: store,
        }
    }
}
