//! Playlist mutations.
//!
//! Every mutation is a direct remote call followed by the invalidation of
//! the cached first pages it made stale: the playlist itself and the list of
//! the user's playlists.

use std::collections::HashSet;

use serde_json::Value;

use crate::{
    catalog::Catalog,
    info,
    node::{Node, NodeId, NodeKind, NodeKinds, Parameters, Tree, behavior},
    qobuz::CatalogApi,
    traversal::{CancelToken, Listing, TraversalError, TreeBuilder, UNBOUNDED},
    types::Request,
    warning,
};

/// Track ids sent per `/playlist/addTracks` call.
pub const ADD_TRACKS_BATCH: usize = 50;
/// Most tracks a playlist can hold.
pub const MAX_PLAYLIST_TRACKS: usize = 1000;

/// Creates a playlist named `name`.
///
/// # Returns
///
/// The id of the new playlist, `None` when the API refused it.
///
/// # Example
///
/// ```ignore
/// if let Some(id) = create(&catalog, "Late night", false, false).await {
///     add_tracks(&catalog, &tree, &id, &tracks).await;
/// }
/// ```
pub async fn create<A: CatalogApi>(
    catalog: &Catalog<A>,
    name: &str,
    public: bool,
    collaborative: bool,
) -> Option<String> {
    let request = Request::new("/playlist/create")
        .arg("name", name)
        .arg("is_public", public)
        .arg("is_collaborative", collaborative);

    let json = catalog.call(&request).await?;
    let id = json.get("id").and_then(id_to_string)?;
    invalidate(catalog, &id).await;
    Some(id)
}

pub async fn rename<A: CatalogApi>(catalog: &Catalog<A>, playlist_id: &str, name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        warning!("A playlist needs a name");
        return false;
    }

    let request = Request::new("/playlist/update")
        .arg("playlist_id", playlist_id)
        .arg("name", name);
    if catalog.call(&request).await.is_none() {
        return false;
    }
    invalidate(catalog, playlist_id).await;
    true
}

pub async fn delete<A: CatalogApi>(catalog: &Catalog<A>, playlist_id: &str) -> bool {
    let request = Request::new("/playlist/delete").arg("playlist_id", playlist_id);
    if catalog.call(&request).await.is_none() {
        return false;
    }
    invalidate(catalog, playlist_id).await;
    true
}

/// Appends the tracks among `nodes` to a playlist.
///
/// Ids are sent in batches of [`ADD_TRACKS_BATCH`]; nodes that are not
/// tracks are skipped and anything past [`MAX_PLAYLIST_TRACKS`] is dropped
/// with a warning.
///
/// # Returns
///
/// `false` when there is nothing to add or a batch is refused. Batches sent
/// before a refused one stay in the playlist.
pub async fn add_tracks<A: CatalogApi>(
    catalog: &Catalog<A>,
    tree: &Tree,
    playlist_id: &str,
    nodes: &[NodeId],
) -> bool {
    let track_ids = track_ids(tree, nodes);
    if track_ids.is_empty() {
        warning!("No track to add");
        return false;
    }

    for batch in track_ids.chunks(ADD_TRACKS_BATCH) {
        let request = Request::new("/playlist/addTracks")
            .arg("playlist_id", playlist_id)
            .arg("track_ids", batch.join(","));
        if catalog.call(&request).await.is_none() {
            warning!("Adding tracks to playlist {} failed", playlist_id);
            return false;
        }
    }

    invalidate(catalog, playlist_id).await;
    true
}

/// Ids of the track nodes among `nodes`, capped at [`MAX_PLAYLIST_TRACKS`].
pub fn track_ids(tree: &Tree, nodes: &[NodeId]) -> Vec<String> {
    let mut ids: Vec<String> = nodes
        .iter()
        .filter_map(|id| tree.get(*id))
        .filter(|node| node.kind() == NodeKind::Track)
        .filter_map(Node::nid)
        .collect();

    if ids.len() > MAX_PLAYLIST_TRACKS {
        warning!(
            "Playlists hold at most {} tracks, skipping {}",
            MAX_PLAYLIST_TRACKS,
            ids.len() - MAX_PLAYLIST_TRACKS
        );
        ids.truncate(MAX_PLAYLIST_TRACKS);
    }
    ids
}

/// Drops the cached first page of the playlist and of the user's playlists.
pub async fn invalidate<A: CatalogApi>(catalog: &Catalog<A>, playlist_id: &str) {
    let playlist = Node::new(
        NodeKind::Playlist,
        Parameters::new().with("nid", playlist_id),
        None,
    );
    let user_playlists = Node::new(NodeKind::UserPlaylists, Parameters::new(), None);

    for node in [playlist, user_playlists] {
        if let Some(request) = behavior::request(&node, catalog) {
            catalog.invalidate(&request).await;
        }
    }
}

/// Every distinct track reachable from `start`, in traversal order.
///
/// Tracks are not fetched: their payload in the listing that contains them
/// is enough. Similar artists are not followed, so collecting from an
/// artist stays within that artist.
pub async fn collect_tracks<A: CatalogApi>(
    catalog: &Catalog<A>,
    tree: &mut Tree,
    start: NodeId,
    cancel: CancelToken,
) -> Result<Vec<NodeId>, TraversalError> {
    if tree.get(start).map(Node::kind) == Some(NodeKind::Track) {
        tree.fetch(start, catalog).await;
        return Ok(vec![start]);
    }

    let mut builder = TreeBuilder::new(catalog)
        .with_depth(UNBOUNDED)
        .with_include(NodeKinds::of(&[NodeKind::Track]))
        .with_exclude(NodeKinds::of(&[NodeKind::Track, NodeKind::SimilarArtists]))
        .with_cancel_token(cancel);
    let mut listing = Listing::new();
    builder.build(tree, start, &mut listing).await?;

    let mut seen = HashSet::new();
    let tracks: Vec<NodeId> = listing
        .into_nodes()
        .into_iter()
        .filter(|id| match tree.get(*id).and_then(Node::nid) {
            Some(nid) => seen.insert(nid),
            None => false,
        })
        .collect();
    info!("Collected {} tracks", tracks.len());
    Ok(tracks)
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
