use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;

use gridsync::domain::grid::{FilterItem, FilterModel, PaginationModel, SortModel};
use gridsync::domain::product::Product;
use gridsync::domain::types::{PageSize, ProductId};
use gridsync::grid::codec::QueryStateCodec;
use gridsync::grid::columns::{ActionColumnBuilder, GridColumn, RowAction};
use gridsync::grid::controller::{ControllerPhase, GridStateController};
use gridsync::grid::navigation::{FinishCallback, NavigationError, Navigator, VisitOptions};
use gridsync::grid::permissions::PermissionSet;
use gridsync::grid::search::SearchBoxController;
use gridsync::models::config::GridConfig;
use gridsync::pagination::Page;
use gridsync::repository::{InMemoryProductRepository, ProductListQuery, ProductReader};
use gridsync::services::api::list_products;

/// Serves navigations straight from the in-memory catalog.
#[derive(Clone)]
struct CatalogNavigator {
    repo: InMemoryProductRepository,
    permissions: PermissionSet,
    pages: Arc<Mutex<Vec<(String, Page<Product>)>>>,
}

impl CatalogNavigator {
    fn new(permissions: PermissionSet) -> Self {
        let products: Vec<Product> = serde_json::from_str(include_str!("../assets/catalog.json"))
            .expect("catalog fixture should parse");
        Self {
            repo: InMemoryProductRepository::new(products),
            permissions,
            pages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn last_page(&self) -> (String, Page<Product>) {
        self.pages.lock().unwrap().last().cloned().expect("a page was served")
    }

    fn served(&self) -> usize {
        self.pages.lock().unwrap().len()
    }

    fn first_product(&self) -> Product {
        let (_, mut products) = self.repo.list_products(&ProductListQuery::new()).unwrap();
        products.remove(0)
    }
}

impl Navigator for CatalogNavigator {
    fn navigate(&self, url: &str, _options: VisitOptions, on_finish: FinishCallback) {
        let state = QueryStateCodec::default().decode(url);
        match list_products(&self.repo, &self.permissions, &state) {
            Ok(page) => {
                self.pages.lock().unwrap().push((url.to_string(), page));
                on_finish(Ok(()));
            }
            Err(err) => on_finish(Err(NavigationError::Transport(err.to_string()))),
        }
    }
}

fn names(page: &Page<Product>) -> Vec<String> {
    page.data.iter().map(|p| p.name.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn grid_edits_reach_the_backend_through_the_url() {
    let navigator = CatalogNavigator::new(PermissionSet::new(["products.view"]));
    let grid = Arc::new(GridStateController::mount(
        "products",
        "/admin/products?tab=all&perPage=5",
        navigator.clone(),
        GridConfig::default(),
    ));

    assert!(grid.set_sort(Some(SortModel::desc("price"))));
    let (url, page) = navigator.last_page();
    assert!(url.starts_with("/admin/products?tab=all&page=1&perPage=5"));
    assert_eq!(page.last_page, 2);
    assert_eq!(names(&page)[0], "Beeswax Candle");

    assert!(grid.set_pagination(PaginationModel::new(1, PageSize::new(5).unwrap())));
    let (_, page) = navigator.last_page();
    assert_eq!(page.current_page, 2);
    assert_eq!(names(&page), vec!["Olive Oil Soap"]);

    let mut search = SearchBoxController::mount(Arc::clone(&grid));
    for text in ["s", "so", "soa", "soap"] {
        search.on_input(text);
        sleep(Duration::from_millis(50)).await;
    }
    grid.set_filter(FilterModel::new(vec![FilterItem::new("stock", ">", "0")]));
    assert_eq!(grid.phase(), ControllerPhase::Debouncing);
    assert_eq!(navigator.served(), 2);

    sleep(Duration::from_millis(600)).await;

    // The search timer fires first and already carries the filter.
    assert_eq!(navigator.served(), 3);
    let (url, page) = navigator.last_page();
    assert!(url.contains("search=soap"));
    assert_eq!(page.current_page, 1);
    assert_eq!(names(&page), vec!["Soap Dish", "Lavender Soap"]);
    assert!(!grid.is_loading());
    assert_eq!(grid.phase(), ControllerPhase::Idle);

    search.clear();
    sleep(Duration::from_millis(600)).await;
    let (url, _) = navigator.last_page();
    assert!(!url.contains("search"));
    assert!(url.contains("tab=all"));
}

#[tokio::test(start_paused = true)]
async fn backend_failure_reaches_the_error_hook() {
    let navigator = CatalogNavigator::new(PermissionSet::default());
    let grid = GridStateController::mount("products", "/products", navigator, GridConfig::default());
    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&failures);
    grid.on_navigation_error(move |err| sink.lock().unwrap().push(err.to_string()));

    grid.set_sort(Some(SortModel::asc("name")));

    assert!(!grid.is_loading());
    assert_eq!(failures.lock().unwrap().len(), 1);
}

#[test]
fn product_grid_actions_follow_permissions() {
    let columns = ActionColumnBuilder::<Product>::new(vec![
        GridColumn::text("name", "Name"),
        GridColumn::text("sku", "SKU"),
        GridColumn::number("price", "Price"),
    ])
    .sortable(true)
    .on_show(RowAction::new(["products.view"], |_: &ProductId| {}))
    .on_edit(RowAction::new(["products.edit"], |_: &ProductId| {}))
    .on_delete(RowAction::new(["products.delete"], |_: &ProductId| {}))
    .build();
    let navigator = CatalogNavigator::new(PermissionSet::default());
    let product = navigator.first_product();

    let editor = PermissionSet::new(["products.view", "products.edit"]);
    let buttons = columns.row_actions(&product, &editor);

    assert!(columns.has_actions_column());
    assert_eq!(buttons.len(), 2);
    assert!(buttons.iter().all(|button| button.row_id == product.id));
}
