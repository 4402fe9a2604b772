//! Product Model

use serde::{Deserialize, Serialize};

/// Catalog product
///
/// Owned by the catalog; everything else references it by `id`. The core
/// only ever mutates `stock` (and `cost` on purchases).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Barcode / internal code
    pub code: String,
    pub name: String,
    pub category: String,
    /// Catalog sale price
    pub price: f64,
    /// Last purchase cost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub stock: u32,
    /// Shelf / warehouse location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        stock: u32,
    ) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            name: name.into(),
            category: String::new(),
            price,
            cost: None,
            stock,
            location: None,
            brand: None,
        }
    }
}
