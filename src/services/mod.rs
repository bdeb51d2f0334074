pub mod aggregate;
pub mod category_service;
pub mod expense_service;

pub use aggregate::SpendSummary;
pub use category_service::CategoryService;
pub use expense_service::ExpenseService;

use thiserror::Error;

use crate::api::validation::FieldErrors;
use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid request data")]
    Validation(FieldErrors),

    #[error("A category named '{0}' already exists")]
    DuplicateName(String),

    #[error("Category {0} has linked expenses and cannot be deleted")]
    CategoryInUse(String),

    #[error("Category not found with id: {0}")]
    CategoryNotFound(String),

    #[error("Total spend of category {0} exceeds the supported range")]
    SpendOverflow(String),

    #[error("Expense not found with id: {0}")]
    ExpenseNotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}
