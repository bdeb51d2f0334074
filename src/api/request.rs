use rust_decimal::Decimal;
use serde::Deserialize;

use super::validation::{FieldErrors, Validator};

pub const NAME_MAX: usize = 100;
pub const ICON_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 500;

/// Largest accepted `valor` or `gastoMensal`: 999,999,999,999.99
pub const AMOUNT_MAX: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Body of `POST/PUT /api/categorias`. Every field is optional at the
/// serde level so missing fields surface as field errors, not as a
/// deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryRequest {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "icone")]
    pub icon: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "gastoMensal", default, with = "rust_decimal::serde::float_option")]
    pub monthly_budget: Option<Decimal>,
}

/// Validated category fields
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryInput {
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub monthly_budget: Option<Decimal>,
}

impl CategoryRequest {
    pub fn validate(self) -> Result<CategoryInput, FieldErrors> {
        let mut v = Validator::new();
        let name = v.required_text("nome", self.name, NAME_MAX);
        let icon = v.optional_text("icone", self.icon, ICON_MAX);
        let description = v.optional_text("descricao", self.description, DESCRIPTION_MAX);
        let monthly_budget = self
            .monthly_budget
            .and_then(|budget| v.min_decimal("gastoMensal", budget, Decimal::ZERO))
            .and_then(|budget| v.max_decimal("gastoMensal", budget, AMOUNT_MAX));

        match name {
            Some(name) if v.is_valid() => Ok(CategoryInput {
                name,
                icon,
                description,
                monthly_budget,
            }),
            _ => Err(v.into_errors()),
        }
    }
}

/// Body of `POST/PUT /api/gastos`
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseRequest {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "valor", default, with = "rust_decimal::serde::float_option")]
    pub value: Option<Decimal>,
    #[serde(rename = "categoriaId")]
    pub category_id: Option<String>,
}

/// Validated expense fields
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    pub name: String,
    pub description: Option<String>,
    pub value: Decimal,
    pub category_id: String,
}

impl ExpenseRequest {
    pub fn validate(self) -> Result<ExpenseInput, FieldErrors> {
        let mut v = Validator::new();
        let name = v.required_text("nome", self.name, NAME_MAX);
        let description = v.optional_text("descricao", self.description, DESCRIPTION_MAX);
        let value = v
            .required("valor", self.value)
            .and_then(|value| v.min_decimal("valor", value, Decimal::new(1, 2)))
            .and_then(|value| v.max_decimal("valor", value, AMOUNT_MAX));
        let category_id = v.required("categoriaId", self.category_id);

        match (name, value, category_id) {
            (Some(name), Some(value), Some(category_id)) if v.is_valid() => Ok(ExpenseInput {
                name,
                description,
                value,
                category_id,
            }),
            _ => Err(v.into_errors()),
        }
    }
}
