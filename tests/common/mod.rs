#![allow(dead_code)]

use std::sync::Mutex;

use qobuzcli::{
    cache::FileCache,
    catalog::Catalog,
    qobuz::CatalogApi,
    traversal::CancelToken,
    types::{Args, Request},
};
use serde_json::Value;
use tempfile::TempDir;

/// In-memory catalog answering canned payloads and recording every call.
#[derive(Default)]
pub struct FakeApi {
    responses: Vec<(Request, Value)>,
    calls: Mutex<Vec<Request>>,
    cancel_on: Option<(String, CancelToken)>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, request: Request, payload: Value) -> Self {
        self.responses.push((request, payload));
        self
    }

    /// Raises `token` when `endpoint` is called.
    pub fn cancel_on(mut self, endpoint: &str, token: CancelToken) -> Self {
        self.cancel_on = Some((endpoint.to_string(), token));
        self
    }

    pub fn calls(&self) -> Vec<Request> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls()
            .iter()
            .filter(|request| request.endpoint == endpoint)
            .count()
    }
}

impl CatalogApi for FakeApi {
    async fn get(&self, endpoint: &str, args: &Args) -> Option<Value> {
        let request = Request {
            endpoint: endpoint.to_string(),
            args: args.clone(),
        };
        self.calls.lock().unwrap().push(request.clone());

        if let Some((cancel_endpoint, token)) = &self.cancel_on {
            if cancel_endpoint == endpoint {
                token.cancel();
            }
        }

        self.responses
            .iter()
            .find(|(known, _)| *known == request)
            .map(|(_, payload)| payload.clone())
    }
}

/// Catalog over `api` caching into `dir`, pages of `limit` items, user `u1`.
pub fn catalog(api: FakeApi, dir: &TempDir, limit: u32) -> Catalog<FakeApi> {
    Catalog::new(api, FileCache::new(dir.path()))
        .with_limit(limit)
        .with_user_id(Some("u1".to_string()))
}

/// `/album/getFeatured` request of the root node.
pub fn featured(limit: u32, offset: u64) -> Request {
    Request::new("/album/getFeatured")
        .arg("limit", limit)
        .arg("offset", offset)
        .arg("type", "new-releases")
}

/// First `/album/get` page of album `id` with the default page size of 10.
pub fn album(id: &str) -> Request {
    album_page(id, 10, 0)
}

pub fn album_page(id: &str, limit: u32, offset: u64) -> Request {
    Request::new("/album/get")
        .arg("album_id", id)
        .arg("limit", limit)
        .arg("offset", offset)
}
