//! Query intent of a tabular view: pagination, filters, sort and search.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{PageSize, TypeConstraintError};

/// Zero-based page index plus the number of rows per page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationModel {
    pub page: usize,
    pub page_size: PageSize,
}

impl PaginationModel {
    #[must_use]
    pub fn new(page: usize, page_size: PageSize) -> Self {
        Self { page, page_size }
    }

    /// Number of rows preceding the first row of this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size.get())
    }
}

/// A single column filter as edited in the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterItem {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl FilterItem {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// An item without a value does not restrict the result set.
    pub fn is_active(&self) -> bool {
        !self.value.is_empty()
    }
}

/// Ordered filter items; the position of an item is its index on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterModel(Vec<FilterItem>);

impl FilterModel {
    #[must_use]
    pub fn new(items: Vec<FilterItem>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[FilterItem] {
        &self.0
    }

    /// Items that carry a value, in display order.
    pub fn active(&self) -> impl Iterator<Item = &FilterItem> {
        self.0.iter().filter(|item| item.is_active())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy without value-less items.
    #[must_use]
    pub fn without_inactive(&self) -> Self {
        Self(self.active().cloned().collect())
    }
}

impl From<Vec<FilterItem>> for FilterModel {
    fn from(items: Vec<FilterItem>) -> Self {
        Self(items)
    }
}

impl FromIterator<FilterItem> for FilterModel {
    fn from_iter<I: IntoIterator<Item = FilterItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// The single active sort key of a grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortModel {
    pub field: String,
    pub direction: SortDirection,
}

impl SortModel {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Everything a grid asks the backend for. The URL is its only durable form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridQueryState {
    pub pagination: PaginationModel,
    pub filters: FilterModel,
    pub sort: Option<SortModel>,
    pub search: String,
}

impl GridQueryState {
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationModel) -> Self {
        self.pagination = pagination;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Option<SortModel>) -> Self {
        self.sort = sort;
        self
    }

    /// Replaces the filters and returns to the first page.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterModel) -> Self {
        self.filters = filters;
        self.pagination.page = 0;
        self
    }

    /// Replaces the search term and returns to the first page.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into().trim().to_string();
        self.pagination.page = 0;
        self
    }

    /// The form this state takes after a trip through the URL.
    #[must_use]
    pub fn canonical(&self) -> Self {
        Self {
            pagination: self.pagination,
            filters: self.filters.without_inactive(),
            sort: self.sort.clone().filter(|sort| !sort.field.trim().is_empty()),
            search: self.search.trim().to_string(),
        }
    }
}
