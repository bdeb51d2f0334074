// handlers/public/mod.rs - endpoints on the gate's allow-list
mod health;
mod root;

pub use health::health;
pub use root::root;
