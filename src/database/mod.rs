pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{connect, DatabaseError};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{CategoryRepository, ExpenseRepository, HealthCheck, Repositories};
