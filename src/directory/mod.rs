// src/directory/mod.rs
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::http::Request;
use crate::identity::file_id;
use crate::storage::FileStore;

const DEFAULT_ITEMS_PER_PAGE: usize = 16;
const MAX_ITEMS_PER_PAGE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Contains,
    Equals,
    StartsWith,
}

impl FilterOp {
    /// Unknown operators disable filtering instead of failing the request.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "contains" => Some(FilterOp::Contains),
            "equals" => Some(FilterOp::Equals),
            "startsWith" => Some(FilterOp::StartsWith),
            _ => None,
        }
    }

    fn matches(&self, name: &str, value: &str) -> bool {
        match self {
            FilterOp::Contains => name.contains(value),
            FilterOp::Equals => name == value,
            FilterOp::StartsWith => name.starts_with(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug)]
pub struct ListQuery {
    pub start_index: usize,
    pub items_per_page: usize,
    pub filter_op: Option<FilterOp>,
    pub filter_value: Option<String>,
    pub sort_order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            start_index: 0,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            filter_op: None,
            filter_value: None,
            sort_order: SortOrder::Asc,
        }
    }
}

impl ListQuery {
    pub fn from_request(request: &Request) -> Self {
        let start_index = request
            .param("startIndex")
            .and_then(|v| v.parse::<i64>().ok())
            .map(|v| v.max(0) as usize)
            .unwrap_or(0);

        let items_per_page = request
            .param("count")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| (1..=MAX_ITEMS_PER_PAGE as i64).contains(v))
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE);

        let filter_op = request.param("filterOp").and_then(FilterOp::parse);
        let filter_value = request.param("filterValue").map(|v| v.to_string());

        let sort_order = match request.param("sortOrder") {
            Some("DESC") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };

        ListQuery { start_index, items_per_page, filter_op, filter_value, sort_order }
    }
}

/// One file as surfaced in a listing. Metadata fields stay null when the
/// backend cannot provide them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub file_name: String,
    pub size: Option<u64>,
    pub content_type: Option<String>,
    pub checksum: Option<String>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub total_results: usize,
    pub items_per_page: usize,
    pub start_index: usize,
    pub entry: Vec<Entry>,
}

/// Enumerates a store, applies filter/sort/pagination and derives entry
/// metadata for the returned page only.
pub struct DirectoryLister<'a> {
    store: &'a dyn FileStore,
}

impl<'a> DirectoryLister<'a> {
    pub fn new(store: &'a dyn FileStore) -> Self {
        DirectoryLister { store }
    }

    pub fn list(&self, query: &ListQuery) -> Result<ListingPage> {
        let mut names = self.store.list()?;

        if let (Some(op), Some(value)) = (query.filter_op, query.filter_value.as_deref()) {
            names.retain(|name| op.matches(name, value));
        }

        names.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        if query.sort_order == SortOrder::Desc {
            names.reverse();
        }

        let total_results = names.len();
        let entry = names
            .into_iter()
            .skip(query.start_index)
            .take(query.items_per_page)
            .map(|name| self.entry(name))
            .collect();

        Ok(ListingPage {
            total_results,
            items_per_page: query.items_per_page,
            start_index: query.start_index,
            entry,
        })
    }

    /// Metadata lookups are best-effort per field: a backend failure turns
    /// into a null value instead of aborting the listing.
    fn entry(&self, name: String) -> Entry {
        let stat = self
            .store
            .stat(&name)
            .map_err(|e| warn!(file = %name, "stat failed: {}", e))
            .ok();
        let checksum = self
            .store
            .checksum(&name)
            .map_err(|e| warn!(file = %name, "checksum failed: {}", e))
            .ok();
        let content_type = self
            .store
            .content_type(&name)
            .map_err(|e| warn!(file = %name, "content type lookup failed: {}", e))
            .ok();

        Entry {
            id: file_id(&name),
            size: stat.as_ref().map(|s| s.size),
            last_modified: stat.as_ref().and_then(|s| s.modified).map(|m| {
                m.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            }),
            content_type,
            checksum,
            file_name: name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_file("Beta.txt", b"2")
            .with_file("alpha.txt", b"1")
            .with_file("gamma.csv", b"3")
    }

    fn names(page: &ListingPage) -> Vec<&str> {
        page.entry.iter().map(|e| e.file_name.as_str()).collect()
    }

    #[test]
    fn test_sort_is_case_insensitive_ascending() {
        let store = store();
        let page = DirectoryLister::new(&store).list(&ListQuery::default()).unwrap();
        assert_eq!(names(&page), vec!["alpha.txt", "Beta.txt", "gamma.csv"]);
    }

    #[test]
    fn test_desc_is_exact_reverse_of_asc() {
        let store = store();
        let lister = DirectoryLister::new(&store);
        let asc = lister.list(&ListQuery::default()).unwrap();
        let desc = lister
            .list(&ListQuery { sort_order: SortOrder::Desc, ..ListQuery::default() })
            .unwrap();
        let mut reversed: Vec<&str> = names(&asc);
        reversed.reverse();
        assert_eq!(names(&desc), reversed);
    }

    #[test]
    fn test_filter_contains_is_case_sensitive() {
        let store = store();
        let lister = DirectoryLister::new(&store);
        let query = ListQuery {
            filter_op: Some(FilterOp::Contains),
            filter_value: Some("a.txt".to_string()),
            ..ListQuery::default()
        };
        let page = lister.list(&query).unwrap();
        // "Beta.txt" contains "a.txt" too ("Bet-a.txt")
        assert_eq!(names(&page), vec!["alpha.txt", "Beta.txt"]);

        let query = ListQuery {
            filter_op: Some(FilterOp::StartsWith),
            filter_value: Some("beta".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(lister.list(&query).unwrap().total_results, 0);
    }

    #[test]
    fn test_filter_equals() {
        let store = store();
        let query = ListQuery {
            filter_op: Some(FilterOp::Equals),
            filter_value: Some("gamma.csv".to_string()),
            ..ListQuery::default()
        };
        let page = DirectoryLister::new(&store).list(&query).unwrap();
        assert_eq!(page.total_results, 1);
        assert_eq!(names(&page), vec!["gamma.csv"]);
    }

    #[test]
    fn test_total_results_is_independent_of_pagination() {
        let store = store();
        let query = ListQuery { start_index: 2, items_per_page: 1, ..ListQuery::default() };
        let page = DirectoryLister::new(&store).list(&query).unwrap();
        assert_eq!(page.total_results, 3);
        assert_eq!(names(&page), vec!["gamma.csv"]);
    }

    #[test]
    fn test_start_index_past_end_yields_empty_page() {
        let store = store();
        let query = ListQuery { start_index: 10, ..ListQuery::default() };
        let page = DirectoryLister::new(&store).list(&query).unwrap();
        assert_eq!(page.total_results, 3);
        assert!(page.entry.is_empty());
    }

    #[test]
    fn test_entry_metadata() {
        let store = MemoryStore::new().with_file("a.txt", b"hi");
        let page = DirectoryLister::new(&store).list(&ListQuery::default()).unwrap();
        let entry = &page.entry[0];
        assert_eq!(entry.id, crate::identity::file_id("a.txt"));
        assert_eq!(entry.size, Some(2));
        assert_eq!(entry.content_type.as_deref(), Some("text/plain"));
        assert_eq!(
            entry.checksum.as_deref(),
            Some("8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4")
        );
        assert!(entry.last_modified.is_some());
    }

    #[test]
    fn test_metadata_failures_become_null() {
        use crate::storage::FileStat;
        use std::io::{self, Read};

        // Lists one file but fails every metadata lookup, like a remote
        // backend that lost its connection mid-request.
        struct DeadStore;

        impl crate::storage::FileStore for DeadStore {
            fn list(&self) -> crate::error::Result<Vec<String>> {
                Ok(vec!["ghost.bin".to_string()])
            }
            fn read(&self, _name: &str) -> crate::error::Result<Vec<u8>> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone").into())
            }
            fn write(&self, _name: &str, _reader: &mut dyn Read) -> crate::error::Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone").into())
            }
            fn stat(&self, _name: &str) -> crate::error::Result<FileStat> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone").into())
            }
        }

        let store = DeadStore;
        let page = DirectoryLister::new(&store).list(&ListQuery::default()).unwrap();
        assert_eq!(page.total_results, 1);

        let entry = &page.entry[0];
        assert_eq!(entry.file_name, "ghost.bin");
        assert_eq!(entry.id, crate::identity::file_id("ghost.bin"));
        assert_eq!(entry.size, None);
        assert_eq!(entry.checksum, None);
        assert_eq!(entry.last_modified, None);
        // the mime guess is extension-based and never touches the backend
        assert_eq!(entry.content_type.as_deref(), Some("application/octet-stream"));
    }

    #[test]
    fn test_query_from_request_clamps() {
        use crate::http::Request;

        let request = Request::get("/")
            .with_param("startIndex", "-5")
            .with_param("count", "200");
        let query = ListQuery::from_request(&request);
        assert_eq!(query.start_index, 0);
        assert_eq!(query.items_per_page, 16);

        let request = Request::get("/").with_param("count", "64");
        assert_eq!(ListQuery::from_request(&request).items_per_page, 64);

        let request = Request::get("/").with_param("count", "0");
        assert_eq!(ListQuery::from_request(&request).items_per_page, 16);
    }

    #[test]
    fn test_query_from_request_ignores_unknown_filter_op() {
        use crate::http::Request;

        let request = Request::get("/")
            .with_param("filterOp", "endsWith")
            .with_param("filterValue", "x");
        let query = ListQuery::from_request(&request);
        assert!(query.filter_op.is_none());
    }
}
