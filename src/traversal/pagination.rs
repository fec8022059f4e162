//! Detection of truncated result pages and the synthetic "next page" child.

use serde_json::Value;

use crate::{
    node::{Node, NodeId, Tree, behavior},
    types::Pagination,
};

/// Payload fields that may hold a paginated collection, in lookup order.
pub const PAGINATED_FIELDS: [&str; 10] = [
    "albums",
    "labels",
    "tracks",
    "artists",
    "playlists",
    "playlist",
    "public_playlists",
    "genres",
    "rubrics",
    "articles",
];

/// Pagination of `data` when it holds a truncated page.
///
/// Only the first field carrying `limit`, `total` and `offset` is
/// considered; a payload with two paginated collections is extended along
/// the first one only. A page that cannot advance (`limit` of zero, an
/// offset past `u64::MAX`) is never reported as truncated.
pub fn detect(data: &Value) -> Option<Pagination> {
    let (offset, limit, total) = PAGINATED_FIELDS
        .iter()
        .filter_map(|field| data.get(field))
        .find_map(page_window)?;

    if limit == 0 {
        return None;
    }
    let next_offset = offset.checked_add(limit)?;
    (total > next_offset).then_some(Pagination {
        offset,
        limit,
        total,
        next_offset,
    })
}

fn page_window(collection: &Value) -> Option<(u64, u64, u64)> {
    let collection = collection.as_object()?;
    let offset = collection.get("offset")?.as_u64()?;
    let limit = collection.get("limit")?.as_u64()?;
    let total = collection.get("total")?.as_u64()?;
    Some((offset, limit, total))
}

/// Records the pagination of the node's current payload, returns whether the
/// page is truncated.
pub fn detect_pagination(tree: &mut Tree, id: NodeId) -> bool {
    let Some(node) = tree.get_mut(id) else {
        return false;
    };
    let pagination = node.data().and_then(detect);
    node.set_pagination(pagination);
    pagination.is_some()
}

/// Appends the continuation child of a truncated node: same kind and
/// identity, offset moved to the next page, a copy of the current payload.
///
/// No continuation is added when it would fetch the same page again: the
/// kind's request carries no offset, or the payload reports a next offset
/// that is not past the node's own.
pub fn append_continuation(tree: &mut Tree, id: NodeId) -> Option<NodeId> {
    let node = tree.get(id)?;
    let pagination = node.pagination()?;
    if !behavior::is_paged(node.kind()) || pagination.next_offset <= node.offset() {
        return None;
    }

    let mut params = node.params().clone();
    if let Some(nid) = node.nid() {
        params.set("nid", nid);
    }
    params.set("offset", pagination.next_offset.to_string());

    let continuation = Node::new(node.kind(), params, node.data().cloned())
        .with_label(behavior::base_label(tree, id))
        .with_page_marker(format!("[{} / {}]", pagination.next_offset, pagination.total));
    Some(tree.attach(id, continuation))
}
