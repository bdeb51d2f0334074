use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{ServiceError, SpendSummary};
use crate::api::format::{category_detail, category_response, CategoryResponse};
use crate::api::request::CategoryInput;
use crate::database::models::{Category, Expense};
use crate::database::{CategoryRepository, DatabaseError, ExpenseRepository, Repositories};
use crate::types::TenantId;

/// Category lifecycle for one tenant at a time. Every operation takes the
/// tenant explicitly; nothing is read from ambient request state.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    expenses: Arc<dyn ExpenseRepository>,
}

impl CategoryService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            categories: repos.categories.clone(),
            expenses: repos.expenses.clone(),
        }
    }

    pub async fn create(
        &self,
        tenant: &TenantId,
        input: CategoryInput,
    ) -> Result<CategoryResponse, ServiceError> {
        info!("Creating category '{}' for tenant {}", input.name, tenant);

        if self.exists_by_name(tenant, &input.name).await? {
            return Err(ServiceError::DuplicateName(input.name));
        }

        let category = Category::new(tenant, input, Utc::now());
        self.categories
            .insert(&category)
            .await
            .map_err(|err| duplicate_or(err, &category.name))?;

        info!("Created category {} for tenant {}", category.id, tenant);
        Ok(category_response(&category, SpendSummary::default()))
    }

    pub async fn list(&self, tenant: &TenantId) -> Result<Vec<CategoryResponse>, ServiceError> {
        info!("Listing categories for tenant {}", tenant);

        let categories = self.categories.find_by_tenant(tenant).await?;
        let mut responses = Vec::with_capacity(categories.len());
        for category in &categories {
            let summary = self.summarize(tenant, &category.id).await?;
            responses.push(category_response(category, summary));
        }
        Ok(responses)
    }

    /// Category with its expenses embedded
    pub async fn get(&self, tenant: &TenantId, id: &str) -> Result<CategoryResponse, ServiceError> {
        info!("Fetching category {} for tenant {}", id, tenant);

        let category = self.find(tenant, id).await?;
        let expenses = self.expenses.find_by_category_and_tenant(id, tenant).await?;
        let summary = spend_of(id, &expenses)?;
        Ok(category_detail(&category, &expenses, summary))
    }

    pub async fn update(
        &self,
        tenant: &TenantId,
        id: &str,
        input: CategoryInput,
    ) -> Result<CategoryResponse, ServiceError> {
        info!("Updating category {} for tenant {}", id, tenant);

        let mut category = self.find(tenant, id).await?;
        if category.name != input.name && self.exists_by_name(tenant, &input.name).await? {
            return Err(ServiceError::DuplicateName(input.name));
        }

        category.apply(input, Utc::now());
        self.categories
            .update(&category)
            .await
            .map_err(|err| duplicate_or(err, &category.name))?;

        let summary = self.summarize(tenant, id).await?;
        Ok(category_response(&category, summary))
    }

    pub async fn delete(&self, tenant: &TenantId, id: &str) -> Result<(), ServiceError> {
        info!("Deleting category {} for tenant {}", id, tenant);

        self.find(tenant, id).await?;
        if self.expenses.exists_by_category_and_tenant(id, tenant).await? {
            warn!("Category {} still has expenses for tenant {}", id, tenant);
            return Err(ServiceError::CategoryInUse(id.to_string()));
        }

        self.categories.delete(id, tenant).await?;
        info!("Deleted category {} for tenant {}", id, tenant);
        Ok(())
    }

    pub async fn exists_by_name(&self, tenant: &TenantId, name: &str) -> Result<bool, ServiceError> {
        Ok(self.categories.exists_by_name_and_tenant(name, tenant).await?)
    }

    async fn find(&self, tenant: &TenantId, id: &str) -> Result<Category, ServiceError> {
        self.categories
            .find_by_id_and_tenant(id, tenant)
            .await?
            .ok_or_else(|| ServiceError::CategoryNotFound(id.to_string()))
    }

    async fn summarize(&self, tenant: &TenantId, id: &str) -> Result<SpendSummary, ServiceError> {
        let expenses = self.expenses.find_by_category_and_tenant(id, tenant).await?;
        spend_of(id, &expenses)
    }
}

fn spend_of(id: &str, expenses: &[Expense]) -> Result<SpendSummary, ServiceError> {
    SpendSummary::of(expenses).ok_or_else(|| {
        error!("Spend total overflowed for category {}", id);
        ServiceError::SpendOverflow(id.to_string())
    })
}

/// A unique violation on write means another request took the name first
fn duplicate_or(err: DatabaseError, name: &str) -> ServiceError {
    match err {
        DatabaseError::UniqueViolation(_) => ServiceError::DuplicateName(name.to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::ExpenseInput;
    use crate::database::MemoryStore;
    use crate::services::ExpenseService;
    use rust_decimal::Decimal;

    fn services() -> (CategoryService, ExpenseService) {
        let repos = Repositories::from_store(Arc::new(MemoryStore::new()));
        (CategoryService::new(&repos), ExpenseService::new(&repos))
    }

    fn food() -> CategoryInput {
        CategoryInput {
            name: "Food".to_string(),
            icon: None,
            description: None,
            monthly_budget: Some(Decimal::new(50000, 2)),
        }
    }

    fn lunch(category_id: &str, cents: i64) -> ExpenseInput {
        ExpenseInput {
            name: "Lunch".to_string(),
            description: None,
            value: Decimal::new(cents, 2),
            category_id: category_id.to_string(),
        }
    }

    #[tokio::test]
    async fn name_exists_after_create_and_not_after_delete() {
        let (categories, _) = services();
        let tenant = TenantId::new("alice");

        let created = categories.create(&tenant, food()).await.unwrap();
        assert!(categories.exists_by_name(&tenant, "Food").await.unwrap());

        categories.delete(&tenant, &created.id).await.unwrap();
        assert!(!categories.exists_by_name(&tenant, "Food").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_names_are_per_tenant() {
        let (categories, _) = services();
        let alice = TenantId::new("alice");
        let bob = TenantId::new("bob");

        categories.create(&alice, food()).await.unwrap();
        let err = categories.create(&alice, food()).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName(name) if name == "Food"));

        assert!(categories.create(&bob, food()).await.is_ok());
    }

    #[tokio::test]
    async fn budget_defaults_to_zero_on_create() {
        let (categories, _) = services();
        let tenant = TenantId::new("alice");
        let input = CategoryInput {
            monthly_budget: None,
            ..food()
        };

        let created = categories.create(&tenant, input).await.unwrap();
        assert_eq!(created.monthly_budget, Decimal::ZERO);
        assert_eq!(created.current_spend, Decimal::ZERO);
        assert_eq!(created.expense_count, 0);
    }

    #[tokio::test]
    async fn rename_to_taken_name_fails_but_same_name_is_fine() {
        let (categories, _) = services();
        let tenant = TenantId::new("alice");
        let food = categories.create(&tenant, food()).await.unwrap();
        let rent = CategoryInput {
            name: "Rent".to_string(),
            ..self::food()
        };
        categories.create(&tenant, rent).await.unwrap();

        let rename = CategoryInput {
            name: "Rent".to_string(),
            ..self::food()
        };
        let err = categories.update(&tenant, &food.id, rename).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName(_)));

        let same = CategoryInput {
            description: Some("meals".to_string()),
            monthly_budget: None,
            ..self::food()
        };
        let updated = categories.update(&tenant, &food.id, same).await.unwrap();
        assert_eq!(updated.description.as_deref(), Some("meals"));
        // omitted budget keeps the stored one
        assert_eq!(updated.monthly_budget, Decimal::new(50000, 2));
        assert_eq!(updated.created_at, food.created_at);
        assert!(updated.updated_at >= food.updated_at);
    }

    #[tokio::test]
    async fn delete_is_blocked_while_expenses_exist() {
        let (categories, expenses) = services();
        let tenant = TenantId::new("alice");
        let food = categories.create(&tenant, food()).await.unwrap();
        let expense = expenses.create(&tenant, lunch(&food.id, 1250)).await.unwrap();

        let err = categories.delete(&tenant, &food.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::CategoryInUse(_)));

        expenses.delete(&tenant, &expense.id).await.unwrap();
        categories.delete(&tenant, &food.id).await.unwrap();
        let err = categories.get(&tenant, &food.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::CategoryNotFound(_)));
    }

    #[tokio::test]
    async fn current_spend_is_computed_live_and_scoped() {
        let (categories, expenses) = services();
        let alice = TenantId::new("alice");
        let bob = TenantId::new("bob");
        let food = categories.create(&alice, food()).await.unwrap();

        expenses.create(&alice, lunch(&food.id, 1250)).await.unwrap();
        expenses.create(&alice, lunch(&food.id, 730)).await.unwrap();

        let detail = categories.get(&alice, &food.id).await.unwrap();
        assert_eq!(detail.current_spend, Decimal::new(1980, 2));
        assert_eq!(detail.expense_count, 2);
        assert_eq!(detail.expenses.as_ref().map(Vec::len), Some(2));

        let listed = categories.list(&alice).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].current_spend, Decimal::new(1980, 2));
        assert!(listed[0].expenses.is_none());

        let err = categories.get(&bob, &food.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::CategoryNotFound(_)));
        assert!(categories.list(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_category_operations_are_not_found() {
        let (categories, _) = services();
        let tenant = TenantId::new("alice");

        let err = categories.update(&tenant, "missing", food()).await.unwrap_err();
        assert!(matches!(err, ServiceError::CategoryNotFound(_)));
        let err = categories.delete(&tenant, "missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::CategoryNotFound(_)));
    }

    #[tokio::test]
    async fn spend_beyond_decimal_range_is_an_error_not_a_panic() {
        let store = Arc::new(MemoryStore::new());
        let repos = Repositories::from_store(store.clone());
        let categories = CategoryService::new(&repos);
        let tenant = TenantId::new("alice");
        let food = categories.create(&tenant, food()).await.unwrap();

        // Rows that never went through request validation
        let huge = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
        for _ in 0..2 {
            let expense = Expense::new(&tenant, ExpenseInput { value: huge, ..lunch(&food.id, 1) }, Utc::now());
            ExpenseRepository::insert(store.as_ref(), &expense).await.unwrap();
        }

        let err = categories.get(&tenant, &food.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::SpendOverflow(id) if id == food.id));
        let err = categories.list(&tenant).await.unwrap_err();
        assert!(matches!(err, ServiceError::SpendOverflow(_)));
    }

    #[test]
    fn unique_violation_on_write_becomes_duplicate_name() {
        let err = duplicate_or(DatabaseError::UniqueViolation("categorias_tenant_name".to_string()), "Food");
        assert!(matches!(err, ServiceError::DuplicateName(name) if name == "Food"));

        let err = duplicate_or(DatabaseError::NotFound("category c1".to_string()), "Food");
        assert!(matches!(err, ServiceError::Database(DatabaseError::NotFound(_))));
    }
}
