//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::product::Product;
use crate::domain::types::ProductId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ProductListQuery, ProductReader};

mock! {
    pub ProductRepository {}

    impl ProductReader for ProductRepository {
        fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
        fn list_products(
            &self,
            query: &ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<Product>)>;
    }
}
