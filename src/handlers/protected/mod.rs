// handlers/protected/mod.rs - tenant-scoped endpoints under /api
//
// The gate has already authenticated the request; handlers take the tenant
// through `CurrentTenant` and hand it to the services explicitly.
pub mod categories;
pub mod expenses;
