use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::database::models::{Category, Expense};
use crate::services::aggregate::SpendSummary;

/// Placeholder name when an expense points at a category that cannot be resolved
pub const UNKNOWN_CATEGORY_NAME: &str = "Category not found";

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "icone")]
    pub icon: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "gastoMensal", with = "rust_decimal::serde::float")]
    pub monthly_budget: Decimal,
    #[serde(rename = "gastoAtual", with = "rust_decimal::serde::float")]
    pub current_spend: Decimal,
    #[serde(rename = "totalGastos")]
    pub expense_count: usize,
    #[serde(rename = "criadoEm")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizadoEm")]
    pub updated_at: DateTime<Utc>,
    /// Only filled on the detail view
    #[serde(rename = "gastos", skip_serializing_if = "Option::is_none")]
    pub expenses: Option<Vec<ExpenseResponse>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseResponse {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub value: Decimal,
    #[serde(rename = "categoriaId")]
    pub category_id: String,
    #[serde(rename = "categoriaNome")]
    pub category_name: String,
    #[serde(rename = "criadoEm")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizadoEm")]
    pub updated_at: DateTime<Utc>,
}

/// Category summary as returned by create, list and update
pub fn category_response(category: &Category, summary: SpendSummary) -> CategoryResponse {
    CategoryResponse {
        id: category.id.clone(),
        name: category.name.clone(),
        icon: category.icon.clone(),
        description: category.description.clone(),
        monthly_budget: category.monthly_budget,
        current_spend: summary.current_spend,
        expense_count: summary.expense_count,
        created_at: category.created_at,
        updated_at: category.updated_at,
        expenses: None,
    }
}

/// Category detail: the summary plus the expenses it was computed from
pub fn category_detail(category: &Category, expenses: &[Expense], summary: SpendSummary) -> CategoryResponse {
    let items = expenses
        .iter()
        .map(|expense| expense_response(expense, Some(category.name.as_str())))
        .collect();

    CategoryResponse {
        expenses: Some(items),
        ..category_response(category, summary)
    }
}

pub fn expense_response(expense: &Expense, category_name: Option<&str>) -> ExpenseResponse {
    ExpenseResponse {
        id: expense.id.clone(),
        name: expense.name.clone(),
        description: expense.description.clone(),
        value: expense.value,
        category_id: expense.category_id.clone(),
        category_name: category_name.unwrap_or(UNKNOWN_CATEGORY_NAME).to_string(),
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category() -> Category {
        let now = Utc::now();
        Category {
            id: "c1".to_string(),
            tenant_id: "alice".to_string(),
            name: "Food".to_string(),
            icon: None,
            description: None,
            monthly_budget: Decimal::new(50000, 2),
            created_at: now,
            updated_at: now,
        }
    }

    fn expense(id: &str, cents: i64) -> Expense {
        let now = Utc::now();
        Expense {
            id: id.to_string(),
            tenant_id: "alice".to_string(),
            name: "Lunch".to_string(),
            description: None,
            value: Decimal::new(cents, 2),
            category_id: "c1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn category_uses_wire_names_and_numeric_amounts() {
        let value = serde_json::to_value(category_response(&category(), SpendSummary::default())).unwrap();

        assert_eq!(value["nome"], "Food");
        assert_eq!(value["gastoMensal"], json!(500.0));
        assert_eq!(value["gastoAtual"], json!(0.0));
        assert_eq!(value["totalGastos"], 0);
        assert!(value.get("gastos").is_none());
        assert!(value.get("criadoEm").is_some());
    }

    #[test]
    fn detail_embeds_expenses_with_category_name() {
        let expenses = [expense("g1", 1250), expense("g2", 750)];
        let summary = SpendSummary::of(&expenses).unwrap();
        let detail = category_detail(&category(), &expenses, summary);
        let value = serde_json::to_value(&detail).unwrap();

        assert_eq!(value["gastoAtual"], json!(20.0));
        assert_eq!(value["totalGastos"], 2);
        assert_eq!(value["gastos"][0]["categoriaNome"], "Food");
        assert_eq!(value["gastos"][1]["valor"], json!(7.5));
    }

    #[test]
    fn unresolved_category_gets_placeholder_name() {
        let response = expense_response(&expense("g1", 100), None);
        assert_eq!(response.category_name, UNKNOWN_CATEGORY_NAME);
    }
}
