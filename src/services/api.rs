use crate::domain::grid::GridQueryState;
use crate::domain::product::Product;
use crate::grid::permissions::PermissionChecker;
use crate::pagination::Page;
use crate::repository::{ProductListQuery, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Permission required to list the catalog.
pub const PRODUCTS_VIEW_PERMISSION: &str = "products.view";

/// Returns the page of products described by the grid state.
pub fn list_products<R, P>(
    repo: &R,
    permissions: &P,
    state: &GridQueryState,
) -> ServiceResult<Page<Product>>
where
    R: ProductReader + ?Sized,
    P: PermissionChecker + ?Sized,
{
    if !permissions.has_permission(&[PRODUCTS_VIEW_PERMISSION.to_string()]) {
        return Err(ServiceError::Unauthorized);
    }

    let query = ProductListQuery::from(state);
    let (total, products) = repo.list_products(&query).map_err(|err| {
        log::error!("Failed to list products: {err}");
        ServiceError::from(err)
    })?;

    Ok(Page::new(products, total, &state.pagination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{FilterItem, FilterModel, PaginationModel, SortModel};
    use crate::domain::types::PageSize;
    use crate::grid::permissions::PermissionSet;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockProductRepository;

    fn viewer() -> PermissionSet {
        PermissionSet::new([PRODUCTS_VIEW_PERMISSION])
    }

    #[test]
    fn listing_requires_view_permission() {
        let repo = MockProductRepository::new();

        let result = list_products(&repo, &PermissionSet::default(), &GridQueryState::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn grid_state_is_forwarded_to_repository() {
        let mut repo = MockProductRepository::new();
        repo.expect_list_products()
            .withf(|query| {
                query.search.as_deref() == Some("soap")
                    && query.filters == vec![FilterItem::new("stock", ">", "0")]
                    && query.sort == Some(SortModel::asc("name"))
                    && query.pagination.map(|p| p.page) == Some(1)
            })
            .times(1)
            .returning(|_| Ok((12, Vec::new())));
        let state = GridQueryState {
            pagination: PaginationModel::new(1, PageSize::new(10).unwrap()),
            filters: FilterModel::new(vec![
                FilterItem::new("stock", ">", "0"),
                FilterItem::new("name", "contains", ""),
            ]),
            sort: Some(SortModel::asc("name")),
            search: "soap".to_string(),
        };

        let page = list_products(&repo, &viewer(), &state).unwrap();

        assert_eq!(page.total, 12);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.last_page, 2);
    }

    #[test]
    fn repository_validation_errors_are_preserved() {
        let mut repo = MockProductRepository::new();
        repo.expect_list_products()
            .returning(|_| Err(RepositoryError::ValidationError("Unknown field: x".into())));

        let result = list_products(&repo, &viewer(), &GridQueryState::default());

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
