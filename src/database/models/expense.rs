use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::request::ExpenseInput;
use crate::types::TenantId;

/// A single spend, linked to a category of the same tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub description: Option<String>,
    pub value: Decimal,
    pub category_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(tenant: &TenantId, input: ExpenseInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant.as_str().to_string(),
            name: input.name,
            description: input.description,
            value: input.value,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replacement of the editable fields, category included
    pub fn apply(&mut self, input: ExpenseInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.description = input.description;
        self.value = input.value;
        self.category_id = input.category_id;
        self.updated_at = now;
    }
}
