use crate::domain::grid::{FilterItem, GridQueryState, PaginationModel, SortModel};
use crate::domain::product::Product;
use crate::domain::types::ProductId;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use memory::InMemoryProductRepository;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub filters: Vec<FilterItem>,
    pub sort: Option<SortModel>,
    pub pagination: Option<PaginationModel>,
}

impl ProductListQuery {
    pub fn new() -> Self {
        Self {
            search: None,
            filters: Vec::new(),
            sort: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_string();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    pub fn filter(mut self, item: FilterItem) -> Self {
        if item.is_active() {
            self.filters.push(item);
        }
        self
    }

    pub fn sort(mut self, sort: SortModel) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paginate(mut self, pagination: PaginationModel) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&GridQueryState> for ProductListQuery {
    fn from(state: &GridQueryState) -> Self {
        let mut query = state
            .filters
            .active()
            .cloned()
            .fold(ProductListQuery::new(), ProductListQuery::filter)
            .search(state.search.as_str())
            .paginate(state.pagination);
        query.sort = state.sort.clone();
        query
    }
}

pub trait ProductReader {
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}
