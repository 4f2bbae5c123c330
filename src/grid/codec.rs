//! Conversion between a grid's URL query string and [`GridQueryState`].
//!
//! Wire format:
//!
//! - `page`: 1-based page number (0-based in memory)
//! - `perPage`: rows per page
//! - `filters[<i>][field]`, `filters[<i>][operator]`, `filters[<i>][value]`
//! - `sort[field]`, `sort[order]` with `order` being `asc` or `desc`
//! - `search`: free-text term
//!
//! Decoding never fails. Anything malformed falls back to its default.

use std::collections::BTreeMap;

use crate::domain::grid::{
    FilterItem, FilterModel, GridQueryState, PaginationModel, SortDirection, SortModel,
};
use crate::domain::types::PageSize;

pub const PAGE_KEY: &str = "page";
pub const PER_PAGE_KEY: &str = "perPage";
pub const SEARCH_KEY: &str = "search";
pub const SORT_FIELD_KEY: &str = "sort[field]";
pub const SORT_ORDER_KEY: &str = "sort[order]";
const FILTERS_PREFIX: &str = "filters[";
const SORT_PREFIX: &str = "sort[";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FilterPart {
    Field,
    Operator,
    Value,
}

#[derive(Debug, Default)]
struct FilterDraft {
    field: Option<String>,
    operator: Option<String>,
    value: Option<String>,
}

struct SplitUrl<'a> {
    path: &'a str,
    query: &'a str,
    fragment: Option<&'a str>,
}

fn split_url(url: &str) -> SplitUrl<'_> {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    SplitUrl {
        path,
        query,
        fragment,
    }
}

fn parse_pairs(query: &str) -> Vec<(String, String)> {
    if query.is_empty() {
        return Vec::new();
    }
    serde_html_form::from_str(query).unwrap_or_else(|err| {
        log::warn!("Ignoring unparseable query string {query:?}: {err}");
        Vec::new()
    })
}

/// Splits `filters[3][value]` into `(3, Value)`.
fn parse_filter_key(key: &str) -> Option<(usize, FilterPart)> {
    let rest = key.strip_prefix(FILTERS_PREFIX)?;
    let (index, rest) = rest.split_once(']')?;
    let index = index.parse::<usize>().ok()?;
    let part = match rest.strip_prefix('[')?.strip_suffix(']')? {
        "field" => FilterPart::Field,
        "operator" => FilterPart::Operator,
        "value" => FilterPart::Value,
        _ => return None,
    };
    Some((index, part))
}

/// Converts the 1-based wire page into a 0-based index.
fn parse_page(value: &str) -> usize {
    match value.trim().parse::<usize>() {
        Ok(page) => page.saturating_sub(1),
        Err(_) => {
            log::debug!("Non-numeric page {value:?}, using first page");
            0
        }
    }
}

fn is_managed_key(key: &str) -> bool {
    key == PAGE_KEY
        || key == PER_PAGE_KEY
        || key == SEARCH_KEY
        || key.starts_with(FILTERS_PREFIX)
        || key.starts_with(SORT_PREFIX)
}

/// Encodes and decodes grid state to and from URLs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryStateCodec {
    default_page_size: PageSize,
}

impl QueryStateCodec {
    #[must_use]
    pub fn new(default_page_size: PageSize) -> Self {
        Self { default_page_size }
    }

    pub fn default_page_size(&self) -> PageSize {
        self.default_page_size
    }

    /// Reads the grid state out of a full or relative URL.
    pub fn decode(&self, url: &str) -> GridQueryState {
        self.decode_query(split_url(url).query)
    }

    /// Reads the grid state out of a bare query string (no leading `?`).
    pub fn decode_query(&self, query: &str) -> GridQueryState {
        let mut page = 0;
        let mut page_size = self.default_page_size;
        let mut drafts: BTreeMap<usize, FilterDraft> = BTreeMap::new();
        let mut sort_field = None;
        let mut sort_order = None;
        let mut search = String::new();

        for (key, value) in parse_pairs(query) {
            match key.as_str() {
                PAGE_KEY => page = parse_page(&value),
                PER_PAGE_KEY => {
                    page_size = value.parse().unwrap_or_else(|err| {
                        log::debug!("Invalid perPage {value:?} ({err}), using default");
                        self.default_page_size
                    })
                }
                SEARCH_KEY => search = value.trim().to_string(),
                SORT_FIELD_KEY => sort_field = Some(value),
                SORT_ORDER_KEY => sort_order = Some(value),
                _ => {
                    if let Some((index, part)) = parse_filter_key(&key) {
                        let draft = drafts.entry(index).or_default();
                        match part {
                            FilterPart::Field => draft.field = Some(value),
                            FilterPart::Operator => draft.operator = Some(value),
                            FilterPart::Value => draft.value = Some(value),
                        }
                    }
                }
            }
        }

        let filters = drafts
            .into_values()
            .filter_map(|draft| {
                let item = FilterItem {
                    field: draft.field.filter(|field| !field.is_empty())?,
                    operator: draft.operator.filter(|operator| !operator.is_empty())?,
                    value: draft.value.unwrap_or_default(),
                };
                item.is_active().then_some(item)
            })
            .collect::<FilterModel>();

        let sort = sort_field
            .map(|field| field.trim().to_string())
            .filter(|field| !field.is_empty())
            .map(|field| {
                let direction = sort_order
                    .as_deref()
                    .and_then(|order| order.parse::<SortDirection>().ok())
                    .unwrap_or_default();
                SortModel { field, direction }
            });

        GridQueryState {
            pagination: PaginationModel::new(page, page_size),
            filters,
            sort,
            search,
        }
    }

    /// Writes `state` into `base_url`, keeping its path, fragment and any
    /// query keys the grid does not own.
    pub fn encode(&self, state: &GridQueryState, base_url: &str) -> String {
        let base = split_url(base_url);
        let mut pairs: Vec<(String, String)> = parse_pairs(base.query)
            .into_iter()
            .filter(|(key, _)| !is_managed_key(key))
            .collect();

        pairs.push((PAGE_KEY.to_string(), (state.pagination.page + 1).to_string()));
        pairs.push((
            PER_PAGE_KEY.to_string(),
            state.pagination.page_size.to_string(),
        ));

        for (index, item) in state.filters.active().enumerate() {
            pairs.push((format!("filters[{index}][field]"), item.field.clone()));
            pairs.push((format!("filters[{index}][operator]"), item.operator.clone()));
            pairs.push((format!("filters[{index}][value]"), item.value.clone()));
        }

        if let Some(sort) = state.sort.as_ref().filter(|sort| !sort.field.is_empty()) {
            pairs.push((SORT_FIELD_KEY.to_string(), sort.field.clone()));
            pairs.push((
                SORT_ORDER_KEY.to_string(),
                sort.direction.as_str().to_string(),
            ));
        }

        let search = state.search.trim();
        if !search.is_empty() {
            pairs.push((SEARCH_KEY.to_string(), search.to_string()));
        }

        let query = serde_html_form::to_string(&pairs).unwrap_or_else(|err| {
            log::warn!("Failed to serialize grid query: {err}");
            String::new()
        });

        let mut url = String::from(base.path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        if let Some(fragment) = base.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

/// Decodes with the default page size.
pub fn decode(url: &str) -> GridQueryState {
    QueryStateCodec::default().decode(url)
}

/// Encodes with the default page size.
pub fn encode(state: &GridQueryState, base_url: &str) -> String {
    QueryStateCodec::default().encode(state, base_url)
}
