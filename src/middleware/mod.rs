pub mod auth;
pub mod response;
pub mod tenant;

pub use auth::{tenant_gate, AuthState};
pub use response::{ApiResponse, ApiResult};
pub use tenant::{CurrentTenant, TenantContext, TenantError};
