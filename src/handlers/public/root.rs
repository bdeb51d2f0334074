use axum::Json;
use serde_json::{json, Value};

/// GET / - service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Gastos API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Spending categories and expenses, scoped per authenticated user",
        "endpoints": {
            "health": "/health (public)",
            "categorias": "/api/categorias[/:id] (protected)",
            "gastos": "/api/gastos[/:id], /api/gastos/categoria/:categoriaId (protected)",
        }
    }))
}
