use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, Expense};
use crate::database::repository::{CategoryRepository, ExpenseRepository, HealthCheck};
use crate::types::TenantId;

/// Process-local store for development and tests. Lists come back in
/// creation order, like a document store's natural order.
#[derive(Default)]
pub struct MemoryStore {
    categories: RwLock<HashMap<String, Category>>,
    expenses: RwLock<HashMap<String, Expense>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn oldest_first<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_by_tenant(&self, tenant: &TenantId) -> Result<Vec<Category>, DatabaseError> {
        let categories = self.categories.read().await;
        let found = categories
            .values()
            .filter(|c| c.tenant_id == tenant.as_str())
            .cloned()
            .collect();
        Ok(oldest_first(found, |c: &Category| (c.created_at, c.id.clone())))
    }

    async fn find_by_id_and_tenant(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<Option<Category>, DatabaseError> {
        let categories = self.categories.read().await;
        Ok(categories
            .get(id)
            .filter(|c| c.tenant_id == tenant.as_str())
            .cloned())
    }

    async fn exists_by_name_and_tenant(
        &self,
        name: &str,
        tenant: &TenantId,
    ) -> Result<bool, DatabaseError> {
        let categories = self.categories.read().await;
        Ok(categories
            .values()
            .any(|c| c.tenant_id == tenant.as_str() && c.name == name))
    }

    async fn insert(&self, category: &Category) -> Result<(), DatabaseError> {
        let mut categories = self.categories.write().await;
        let taken = categories
            .values()
            .any(|c| c.tenant_id == category.tenant_id && c.name == category.name);
        if taken {
            return Err(DatabaseError::UniqueViolation(format!(
                "category name '{}' already used by tenant",
                category.name
            )));
        }
        categories.insert(category.id.clone(), category.clone());
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<(), DatabaseError> {
        let mut categories = self.categories.write().await;
        let taken = categories.values().any(|c| {
            c.id != category.id && c.tenant_id == category.tenant_id && c.name == category.name
        });
        if taken {
            return Err(DatabaseError::UniqueViolation(format!(
                "category name '{}' already used by tenant",
                category.name
            )));
        }
        match categories.get_mut(&category.id) {
            Some(existing) if existing.tenant_id == category.tenant_id => {
                *existing = category.clone();
                Ok(())
            }
            _ => Err(DatabaseError::NotFound(format!("category {}", category.id))),
        }
    }

    async fn delete(&self, id: &str, tenant: &TenantId) -> Result<(), DatabaseError> {
        let mut categories = self.categories.write().await;
        if categories.get(id).is_some_and(|c| c.tenant_id == tenant.as_str()) {
            categories.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl ExpenseRepository for MemoryStore {
    async fn find_by_tenant(&self, tenant: &TenantId) -> Result<Vec<Expense>, DatabaseError> {
        let expenses = self.expenses.read().await;
        let found = expenses
            .values()
            .filter(|e| e.tenant_id == tenant.as_str())
            .cloned()
            .collect();
        Ok(oldest_first(found, |e: &Expense| (e.created_at, e.id.clone())))
    }

    async fn find_by_id_and_tenant(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<Option<Expense>, DatabaseError> {
        let expenses = self.expenses.read().await;
        Ok(expenses
            .get(id)
            .filter(|e| e.tenant_id == tenant.as_str())
            .cloned())
    }

    async fn find_by_category_and_tenant(
        &self,
        category_id: &str,
        tenant: &TenantId,
    ) -> Result<Vec<Expense>, DatabaseError> {
        let expenses = self.expenses.read().await;
        let found = expenses
            .values()
            .filter(|e| e.tenant_id == tenant.as_str() && e.category_id == category_id)
            .cloned()
            .collect();
        Ok(oldest_first(found, |e: &Expense| (e.created_at, e.id.clone())))
    }

    async fn find_by_category_and_tenant_newest_first(
        &self,
        category_id: &str,
        tenant: &TenantId,
    ) -> Result<Vec<Expense>, DatabaseError> {
        let mut found =
            ExpenseRepository::find_by_category_and_tenant(self, category_id, tenant).await?;
        found.reverse();
        Ok(found)
    }

    async fn exists_by_category_and_tenant(
        &self,
        category_id: &str,
        tenant: &TenantId,
    ) -> Result<bool, DatabaseError> {
        let expenses = self.expenses.read().await;
        Ok(expenses
            .values()
            .any(|e| e.tenant_id == tenant.as_str() && e.category_id == category_id))
    }

    async fn insert(&self, expense: &Expense) -> Result<(), DatabaseError> {
        self.expenses
            .write()
            .await
            .insert(expense.id.clone(), expense.clone());
        Ok(())
    }

    async fn update(&self, expense: &Expense) -> Result<(), DatabaseError> {
        let mut expenses = self.expenses.write().await;
        match expenses.get_mut(&expense.id) {
            Some(existing) if existing.tenant_id == expense.tenant_id => {
                *existing = expense.clone();
                Ok(())
            }
            _ => Err(DatabaseError::NotFound(format!("expense {}", expense.id))),
        }
    }

    async fn delete(&self, id: &str, tenant: &TenantId) -> Result<(), DatabaseError> {
        let mut expenses = self.expenses.write().await;
        if expenses.get(id).is_some_and(|e| e.tenant_id == tenant.as_str()) {
            expenses.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
