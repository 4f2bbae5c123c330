//! Product catalog kept in memory and queried with grid semantics.

use std::cmp::Ordering;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::grid::{FilterItem, SortDirection};
use crate::domain::product::{FieldValue, Product};
use crate::domain::types::ProductId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ProductListQuery, ProductReader};

/// Filter operators understood by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FilterOperator {
    Contains,
    Equals,
    StartsWith,
    EndsWith,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl FromStr for FilterOperator {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "contains" => FilterOperator::Contains,
            "equals" | "is" => FilterOperator::Equals,
            "startsWith" => FilterOperator::StartsWith,
            "endsWith" => FilterOperator::EndsWith,
            "=" => FilterOperator::Eq,
            "!=" => FilterOperator::Ne,
            ">" => FilterOperator::Gt,
            ">=" => FilterOperator::Ge,
            "<" => FilterOperator::Lt,
            "<=" => FilterOperator::Le,
            other => {
                return Err(RepositoryError::ValidationError(format!(
                    "Unsupported filter operator: {other}"
                )));
            }
        })
    }
}

fn parse_number(raw: &str) -> RepositoryResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| RepositoryError::ValidationError(format!("Not a number: {raw}")))
}

fn unknown_field(field: &str) -> RepositoryError {
    RepositoryError::ValidationError(format!("Unknown field: {field}"))
}

fn matches_filter(product: &Product, item: &FilterItem) -> RepositoryResult<bool> {
    let operator = item.operator.parse::<FilterOperator>()?;
    let value = product
        .field(&item.field)
        .ok_or_else(|| unknown_field(&item.field))?;

    match value {
        FieldValue::Text(text) => {
            let text = text.to_lowercase();
            let needle = item.value.to_lowercase();
            match operator {
                FilterOperator::Contains => Ok(text.contains(&needle)),
                FilterOperator::Equals | FilterOperator::Eq => Ok(text == needle),
                FilterOperator::Ne => Ok(text != needle),
                FilterOperator::StartsWith => Ok(text.starts_with(&needle)),
                FilterOperator::EndsWith => Ok(text.ends_with(&needle)),
                _ => Err(RepositoryError::ValidationError(format!(
                    "Operator {} does not apply to text field {}",
                    item.operator, item.field
                ))),
            }
        }
        FieldValue::Number(number) => {
            let rendered = number.to_string();
            match operator {
                FilterOperator::Contains => Ok(rendered.contains(item.value.trim())),
                FilterOperator::StartsWith => Ok(rendered.starts_with(item.value.trim())),
                FilterOperator::EndsWith => Ok(rendered.ends_with(item.value.trim())),
                FilterOperator::Equals | FilterOperator::Eq => {
                    Ok(number == parse_number(&item.value)?)
                }
                FilterOperator::Ne => Ok(number != parse_number(&item.value)?),
                FilterOperator::Gt => Ok(number > parse_number(&item.value)?),
                FilterOperator::Ge => Ok(number >= parse_number(&item.value)?),
                FilterOperator::Lt => Ok(number < parse_number(&item.value)?),
                FilterOperator::Le => Ok(number <= parse_number(&item.value)?),
            }
        }
    }
}

fn compare(a: FieldValue<'_>, b: FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Text(a), FieldValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(&b),
        (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
        (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
    }
}

fn matches_search(product: &Product, term: &str) -> bool {
    let term = term.to_lowercase();
    product.name.to_lowercase().contains(&term) || product.sku.to_lowercase().contains(&term)
}

/// Read-only catalog shared across request handlers.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProductRepository {
    products: Arc<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products),
        }
    }

    /// Loads the catalog from a JSON array of products.
    pub fn from_json_file(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        log::info!(
            "Loaded {} products from {}",
            products.len(),
            path.as_ref().display()
        );
        Ok(Self::new(products))
    }
}

impl ProductReader for InMemoryProductRepository {
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let mut matching = Vec::new();
        for product in self.products.iter() {
            if let Some(term) = &query.search {
                if !matches_search(product, term) {
                    continue;
                }
            }
            let mut keep = true;
            for item in &query.filters {
                if !matches_filter(product, item)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                matching.push(product);
            }
        }

        if let Some(sort) = &query.sort {
            if self
                .products
                .first()
                .is_some_and(|p| p.field(&sort.field).is_none())
            {
                return Err(unknown_field(&sort.field));
            }
            matching.sort_by(|a, b| {
                let ordering = match (a.field(&sort.field), b.field(&sort.field)) {
                    (Some(a), Some(b)) => compare(a, b),
                    _ => Ordering::Equal,
                };
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let total = matching.len();
        let rows = match &query.pagination {
            Some(pagination) => matching
                .into_iter()
                .skip(pagination.offset())
                .take(pagination.page_size.get())
                .cloned()
                .collect(),
            None => matching.into_iter().cloned().collect(),
        };

        Ok((total, rows))
    }
}
