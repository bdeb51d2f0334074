use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::request::CategoryInput;
use crate::types::TenantId;

/// Spending category owned by one tenant, with a monthly budget target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub monthly_budget: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// New category with a generated id; budget defaults to zero
    pub fn new(tenant: &TenantId, input: CategoryInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant.as_str().to_string(),
            name: input.name,
            icon: input.icon,
            description: input.description,
            monthly_budget: input.monthly_budget.unwrap_or(Decimal::ZERO),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields. An omitted budget keeps the current one.
    pub fn apply(&mut self, input: CategoryInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.icon = input.icon;
        self.description = input.description;
        if let Some(budget) = input.monthly_budget {
            self.monthly_budget = budget;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, budget: Option<Decimal>) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            icon: Some("🍔".to_string()),
            description: None,
            monthly_budget: budget,
        }
    }

    #[test]
    fn budget_defaults_to_zero() {
        let category = Category::new(&TenantId::new("t1"), input("Food", None), Utc::now());
        assert_eq!(category.monthly_budget, Decimal::ZERO);
        assert_eq!(category.tenant_id, "t1");
        assert_eq!(category.created_at, category.updated_at);
    }

    #[test]
    fn apply_replaces_fields_and_keeps_identity() {
        let created = Utc::now();
        let mut category = Category::new(&TenantId::new("t1"), input("Food", Some(Decimal::new(500, 0))), created);
        let id = category.id.clone();

        let later = created + chrono::Duration::seconds(5);
        category.apply(
            CategoryInput {
                name: "Groceries".to_string(),
                icon: None,
                description: Some("weekly".to_string()),
                monthly_budget: None,
            },
            later,
        );

        assert_eq!(category.id, id);
        assert_eq!(category.tenant_id, "t1");
        assert_eq!(category.name, "Groceries");
        assert_eq!(category.icon, None);
        assert_eq!(category.monthly_budget, Decimal::new(500, 0));
        assert_eq!(category.created_at, created);
        assert_eq!(category.updated_at, later);
    }
}
