//! Catalog product rows listed by the reference backend.

use serde::{Deserialize, Serialize};

use crate::domain::types::{ProductId, ProductName, Sku};
use crate::grid::columns::GridRow;

/// Domain representation of a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub sku: Sku,
    pub category: String,
    pub price: f64,
    pub stock: i64,
}

/// A product attribute as seen by filters and sorting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl Product {
    /// Looks up the value behind a grid column field.
    pub fn field(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "id" => Some(FieldValue::Number(self.id.get() as f64)),
            "name" => Some(FieldValue::Text(self.name.as_str())),
            "sku" => Some(FieldValue::Text(self.sku.as_str())),
            "category" => Some(FieldValue::Text(&self.category)),
            "price" => Some(FieldValue::Number(self.price)),
            "stock" => Some(FieldValue::Number(self.stock as f64)),
            _ => None,
        }
    }
}

impl GridRow for Product {
    type Id = ProductId;

    fn row_id(&self) -> ProductId {
        self.id
    }
}
