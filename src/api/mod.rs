pub mod format;
pub mod request;
pub mod validation;

pub use request::{CategoryInput, CategoryRequest, ExpenseInput, ExpenseRequest};
pub use validation::FieldErrors;
