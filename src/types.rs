use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::cache::FileCache;

/// Named arguments of a catalog request, kept sorted by name.
pub type Args = BTreeMap<String, String>;

/// One logical call against the catalog API: an endpoint path plus its
/// named arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub endpoint: String,
    pub args: Args,
}

impl Request {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            args: Args::new(),
        }
    }

    pub fn arg(mut self, name: &str, value: impl ToString) -> Self {
        self.args.insert(name.to_string(), value.to_string());
        self
    }

    /// Fingerprint of this request in the response cache.
    pub fn cache_key(&self) -> String {
        FileCache::make_key(&[self.endpoint.as_str()], &self.args)
    }
}

/// Pagination state of a fetched payload that reported more items than it
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
    pub next_offset: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub user_auth_token: String,
    pub obtained_at: u64,
}

#[derive(Tabled)]
pub struct NodeTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub kind: String,
    pub label: String,
    pub url: String,
}

#[derive(Tabled)]
pub struct NodeImageTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub kind: String,
    pub label: String,
    pub image: String,
    pub url: String,
}

#[derive(Tabled)]
pub struct CacheInfoRow {
    pub directory: String,
    pub entries: usize,
    pub default_ttl: u64,
}
