use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, Expense};
use crate::database::repository::{CategoryRepository, ExpenseRepository, HealthCheck};
use crate::types::TenantId;

const CATEGORY_COLUMNS: &str =
    "id, tenant_id, name, icon, description, monthly_budget, created_at, updated_at";
const EXPENSE_COLUMNS: &str =
    "id, tenant_id, name, description, value, category_id, created_at, updated_at";

/// Postgres-backed repositories over the `categorias` and `gastos` tables
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgStore {
    async fn find_by_tenant(&self, tenant: &TenantId) -> Result<Vec<Category>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM categorias WHERE tenant_id = $1 ORDER BY created_at, id",
            CATEGORY_COLUMNS
        );
        let rows = sqlx::query_as::<_, Category>(&sql)
            .bind(tenant.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id_and_tenant(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<Option<Category>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM categorias WHERE id = $1 AND tenant_id = $2",
            CATEGORY_COLUMNS
        );
        let row = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(tenant.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn exists_by_name_and_tenant(
        &self,
        name: &str,
        tenant: &TenantId,
    ) -> Result<bool, DatabaseError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM categorias WHERE name = $1 AND tenant_id = $2)",
        )
        .bind(name)
        .bind(tenant.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    async fn insert(&self, category: &Category) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO categorias (id, tenant_id, name, icon, description, monthly_budget, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&category.id)
        .bind(&category.tenant_id)
        .bind(&category.name)
        .bind(&category.icon)
        .bind(&category.description)
        .bind(category.monthly_budget)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE categorias
             SET name = $3, icon = $4, description = $5, monthly_budget = $6, updated_at = $7
             WHERE id = $1 AND tenant_id = $2",
        )
        .bind(&category.id)
        .bind(&category.tenant_id)
        .bind(&category.name)
        .bind(&category.icon)
        .bind(&category.description)
        .bind(category.monthly_budget)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("category {}", category.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &str, tenant: &TenantId) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM categorias WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ExpenseRepository for PgStore {
    async fn find_by_tenant(&self, tenant: &TenantId) -> Result<Vec<Expense>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM gastos WHERE tenant_id = $1 ORDER BY created_at, id",
            EXPENSE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Expense>(&sql)
            .bind(tenant.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id_and_tenant(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<Option<Expense>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM gastos WHERE id = $1 AND tenant_id = $2",
            EXPENSE_COLUMNS
        );
        let row = sqlx::query_as::<_, Expense>(&sql)
            .bind(id)
            .bind(tenant.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_category_and_tenant(
        &self,
        category_id: &str,
        tenant: &TenantId,
    ) -> Result<Vec<Expense>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM gastos WHERE category_id = $1 AND tenant_id = $2 ORDER BY created_at, id",
            EXPENSE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Expense>(&sql)
            .bind(category_id)
            .bind(tenant.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_category_and_tenant_newest_first(
        &self,
        category_id: &str,
        tenant: &TenantId,
    ) -> Result<Vec<Expense>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM gastos WHERE category_id = $1 AND tenant_id = $2 ORDER BY created_at DESC, id DESC",
            EXPENSE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Expense>(&sql)
            .bind(category_id)
            .bind(tenant.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn exists_by_category_and_tenant(
        &self,
        category_id: &str,
        tenant: &TenantId,
    ) -> Result<bool, DatabaseError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM gastos WHERE category_id = $1 AND tenant_id = $2)",
        )
        .bind(category_id)
        .bind(tenant.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    async fn insert(&self, expense: &Expense) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO gastos (id, tenant_id, name, description, value, category_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&expense.id)
        .bind(&expense.tenant_id)
        .bind(&expense.name)
        .bind(&expense.description)
        .bind(expense.value)
        .bind(&expense.category_id)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, expense: &Expense) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE gastos
             SET name = $3, description = $4, value = $5, category_id = $6, updated_at = $7
             WHERE id = $1 AND tenant_id = $2",
        )
        .bind(&expense.id)
        .bind(&expense.tenant_id)
        .bind(&expense.name)
        .bind(&expense.description)
        .bind(expense.value)
        .bind(&expense.category_id)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("expense {}", expense.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &str, tenant: &TenantId) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM gastos WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
