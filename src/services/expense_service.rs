use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::ServiceError;
use crate::api::format::{expense_response, ExpenseResponse};
use crate::api::request::ExpenseInput;
use crate::database::models::{Category, Expense};
use crate::database::{CategoryRepository, ExpenseRepository, Repositories};
use crate::types::TenantId;

/// Expense lifecycle. The referenced category must belong to the same tenant.
#[derive(Clone)]
pub struct ExpenseService {
    categories: Arc<dyn CategoryRepository>,
    expenses: Arc<dyn ExpenseRepository>,
}

impl ExpenseService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            categories: repos.categories.clone(),
            expenses: repos.expenses.clone(),
        }
    }

    pub async fn create(
        &self,
        tenant: &TenantId,
        input: ExpenseInput,
    ) -> Result<ExpenseResponse, ServiceError> {
        info!("Creating expense '{}' for tenant {}", input.name, tenant);

        let category = self.category(tenant, &input.category_id).await?;
        let expense = Expense::new(tenant, input, Utc::now());
        self.expenses.insert(&expense).await?;

        info!("Created expense {} in category {}", expense.id, category.id);
        Ok(expense_response(&expense, Some(category.name.as_str())))
    }

    pub async fn list(&self, tenant: &TenantId) -> Result<Vec<ExpenseResponse>, ServiceError> {
        info!("Listing expenses for tenant {}", tenant);

        let expenses = self.expenses.find_by_tenant(tenant).await?;
        let names: HashMap<String, String> = self
            .categories
            .find_by_tenant(tenant)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(expenses
            .iter()
            .map(|e| expense_response(e, names.get(&e.category_id).map(String::as_str)))
            .collect())
    }

    /// Expenses of one category, newest first
    pub async fn list_by_category(
        &self,
        tenant: &TenantId,
        category_id: &str,
    ) -> Result<Vec<ExpenseResponse>, ServiceError> {
        info!("Listing expenses of category {} for tenant {}", category_id, tenant);

        let category = self.category(tenant, category_id).await?;
        let expenses = self
            .expenses
            .find_by_category_and_tenant_newest_first(category_id, tenant)
            .await?;

        Ok(expenses
            .iter()
            .map(|e| expense_response(e, Some(category.name.as_str())))
            .collect())
    }

    pub async fn get(&self, tenant: &TenantId, id: &str) -> Result<ExpenseResponse, ServiceError> {
        info!("Fetching expense {} for tenant {}", id, tenant);

        let expense = self.find(tenant, id).await?;
        let category = self
            .categories
            .find_by_id_and_tenant(&expense.category_id, tenant)
            .await?;
        Ok(expense_response(&expense, category.as_ref().map(|c| c.name.as_str())))
    }

    /// Full replacement; the target category is checked again
    pub async fn update(
        &self,
        tenant: &TenantId,
        id: &str,
        input: ExpenseInput,
    ) -> Result<ExpenseResponse, ServiceError> {
        info!("Updating expense {} for tenant {}", id, tenant);

        let mut expense = self.find(tenant, id).await?;
        let category = self.category(tenant, &input.category_id).await?;

        expense.apply(input, Utc::now());
        self.expenses.update(&expense).await?;
        Ok(expense_response(&expense, Some(category.name.as_str())))
    }

    pub async fn delete(&self, tenant: &TenantId, id: &str) -> Result<(), ServiceError> {
        info!("Deleting expense {} for tenant {}", id, tenant);

        self.find(tenant, id).await?;
        self.expenses.delete(id, tenant).await?;
        Ok(())
    }

    async fn find(&self, tenant: &TenantId, id: &str) -> Result<Expense, ServiceError> {
        self.expenses
            .find_by_id_and_tenant(id, tenant)
            .await?
            .ok_or_else(|| ServiceError::ExpenseNotFound(id.to_string()))
    }

    async fn category(&self, tenant: &TenantId, id: &str) -> Result<Category, ServiceError> {
        self.categories
            .find_by_id_and_tenant(id, tenant)
            .await?
            .ok_or_else(|| ServiceError::CategoryNotFound(id.to_string()))
    }
}
