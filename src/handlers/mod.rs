// handlers/mod.rs - HTTP handlers by access tier
//
// Public (no token) → Protected (tenant resolved by the gate)
pub mod public;
pub mod protected;
