mod common;

use common::{FakeApi, album, album_page, catalog, featured};
use qobuzcli::{
    node::{Node, NodeId, NodeKind, Parameters, Tree, behavior},
    qobuz::{
        favorites::{self, FavoriteIds},
        playlist,
    },
    traversal::CancelToken,
    types::Request,
};
use serde_json::json;
use tempfile::TempDir;

fn tree() -> Tree {
    Tree::with_base_url("plugin://plugin.audio.qobuz/").unwrap()
}

fn tracks(tree: &mut Tree, ids: impl Iterator<Item = u64>) -> Vec<NodeId> {
    ids.map(|id| {
        tree.insert(Node::new(
            NodeKind::Track,
            Parameters::new(),
            Some(json!({"id": id})),
        ))
    })
    .collect()
}

fn add_batch(playlist_id: &str, ids: std::ops::RangeInclusive<u64>) -> Request {
    let ids: Vec<String> = ids.map(|id| id.to_string()).collect();
    Request::new("/playlist/addTracks")
        .arg("playlist_id", playlist_id)
        .arg("track_ids", ids.join(","))
}

fn playlist_request(catalog: &qobuzcli::catalog::Catalog<FakeApi>, id: &str) -> Request {
    let node = Node::new(
        NodeKind::Playlist,
        Parameters::new().with("nid", id),
        None,
    );
    behavior::request(&node, catalog).unwrap()
}

#[tokio::test]
async fn test_collect_tracks_dedupes_without_fetching_tracks() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::new()
        .respond(
            featured(10, 0),
            json!({"albums": {"items": [{"id": 1}, {"id": 2}], "limit": 10, "total": 2, "offset": 0}}),
        )
        .respond(
            album("1"),
            json!({"id": 1, "tracks": {"items": [{"id": 11}, {"id": 12}]}}),
        )
        .respond(
            album("2"),
            json!({"id": 2, "tracks": {"items": [{"id": 12}, {"id": 13}]}}),
        );
    let catalog = catalog(api, &dir, 10);
    let mut tree = tree();
    let root = tree.insert(Node::new(NodeKind::Root, Parameters::new(), None));

    let collected = playlist::collect_tracks(&catalog, &mut tree, root, CancelToken::new())
        .await
        .unwrap();

    let ids: Vec<String> = collected.iter().filter_map(|id| tree[*id].nid()).collect();
    assert_eq!(ids, vec!["11", "12", "13"]);
    assert_eq!(catalog.api().call_count("/track/get"), 0);
    assert_eq!(catalog.api().call_count("/album/get"), 2);
}

#[tokio::test]
async fn test_collect_tracks_follows_album_pages() {
    let dir = TempDir::new().unwrap();
    let page = |ids: &[u64], offset: u64| {
        let items: Vec<_> = ids.iter().map(|id| json!({"id": id})).collect();
        json!({"id": "a1", "tracks": {"items": items, "limit": 2, "total": 5, "offset": offset}})
    };
    let api = FakeApi::new()
        .respond(album_page("a1", 2, 0), page(&[1, 2], 0))
        .respond(album_page("a1", 2, 2), page(&[3, 4], 2))
        .respond(album_page("a1", 2, 4), page(&[5], 4));
    let catalog = catalog(api, &dir, 2);
    let mut tree = tree();
    let album = tree.insert(Node::new(
        NodeKind::Album,
        Parameters::new().with("nid", "a1"),
        None,
    ));

    let collected = playlist::collect_tracks(&catalog, &mut tree, album, CancelToken::new())
        .await
        .unwrap();

    let ids: Vec<String> = collected.iter().filter_map(|id| tree[*id].nid()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(catalog.api().call_count("/album/get"), 3);
}

#[tokio::test]
async fn test_collect_tracks_from_track_returns_it() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::new().respond(
        Request::new("/track/get").arg("track_id", "7"),
        json!({"id": 7, "title": "Solo"}),
    );
    let catalog = catalog(api, &dir, 10);
    let mut tree = tree();
    let track = tree.insert(Node::new(
        NodeKind::Track,
        Parameters::new().with("nid", "7"),
        None,
    ));

    let collected = playlist::collect_tracks(&catalog, &mut tree, track, CancelToken::new())
        .await
        .unwrap();

    assert_eq!(collected, vec![track]);
    assert_eq!(tree[track].get_str("title", ""), "Solo");
}

#[tokio::test]
async fn test_add_tracks_batches_and_invalidates() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::new()
        .respond(add_batch("p1", 1..=50), json!({"id": "p1"}))
        .respond(add_batch("p1", 51..=100), json!({"id": "p1"}))
        .respond(add_batch("p1", 101..=120), json!({"id": "p1"}));
    let catalog = catalog(api, &dir, 10);

    let cached = playlist_request(&catalog, "p1");
    catalog
        .cache()
        .store(&cached.cache_key(), &json!({"id": "p1", "tracks": {}}))
        .await;

    let mut tree = tree();
    let mut nodes = tracks(&mut tree, 1..=120);
    nodes.insert(
        3,
        tree.insert(Node::new(NodeKind::Album, Parameters::new(), Some(json!({"id": 999})))),
    );

    assert!(playlist::add_tracks(&catalog, &tree, "p1", &nodes).await);
    assert_eq!(catalog.api().call_count("/playlist/addTracks"), 3);
    assert_eq!(catalog.cache().load(&cached.cache_key()).await, None);
}

#[tokio::test]
async fn test_add_tracks_stops_at_refused_batch() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::new().respond(add_batch("p1", 1..=50), json!({"id": "p1"}));
    let catalog = catalog(api, &dir, 10);
    let mut tree = tree();
    let nodes = tracks(&mut tree, 1..=120);

    assert!(!playlist::add_tracks(&catalog, &tree, "p1", &nodes).await);
    assert_eq!(catalog.api().call_count("/playlist/addTracks"), 2);
}

#[tokio::test]
async fn test_add_tracks_without_tracks_makes_no_call() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog(FakeApi::new(), &dir, 10);
    let mut tree = tree();
    let album = tree.insert(Node::new(NodeKind::Album, Parameters::new(), Some(json!({"id": 1}))));

    assert!(!playlist::add_tracks(&catalog, &tree, "p1", &[album]).await);
    assert!(catalog.api().calls().is_empty());
}

#[test]
fn test_track_ids_capped() {
    let mut tree = tree();
    let nodes = tracks(&mut tree, 1..=1005);

    let ids = playlist::track_ids(&tree, &nodes);
    assert_eq!(ids.len(), playlist::MAX_PLAYLIST_TRACKS);
    assert_eq!(ids.last().map(String::as_str), Some("1000"));
}

#[tokio::test]
async fn test_create_returns_new_id() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::new().respond(
        Request::new("/playlist/create")
            .arg("name", "Late night")
            .arg("is_public", false)
            .arg("is_collaborative", false),
        json!({"id": 4242, "name": "Late night"}),
    );
    let catalog = catalog(api, &dir, 10);

    let id = playlist::create(&catalog, "Late night", false, false).await;
    assert_eq!(id, Some("4242".to_string()));
}

#[tokio::test]
async fn test_rename_and_delete() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::new()
        .respond(
            Request::new("/playlist/update")
                .arg("playlist_id", "p1")
                .arg("name", "New"),
            json!({"id": "p1"}),
        )
        .respond(
            Request::new("/playlist/delete").arg("playlist_id", "p1"),
            json!({"status": "success"}),
        );
    let catalog = catalog(api, &dir, 10);

    assert!(!playlist::rename(&catalog, "p1", "   ").await);
    assert!(catalog.api().calls().is_empty());
    assert!(playlist::rename(&catalog, "p1", "  New ").await);
    assert!(playlist::delete(&catalog, "p1").await);
    assert!(!playlist::delete(&catalog, "p2").await);
}

#[tokio::test]
async fn test_favorites_add_and_remove_invalidate() {
    let dir = TempDir::new().unwrap();
    let ids = FavoriteIds {
        tracks: vec!["1".to_string(), "2".to_string()],
        albums: vec!["a".to_string()],
        artists: vec![],
    };
    let api = FakeApi::new()
        .respond(
            Request::new("/favorite/create")
                .arg("track_ids", "1,2")
                .arg("album_ids", "a"),
            json!({"status": "success"}),
        )
        .respond(
            Request::new("/favorite/delete")
                .arg("track_ids", "1,2")
                .arg("album_ids", "a"),
            json!({"status": "success"}),
        );
    let catalog = catalog(api, &dir, 10);

    let favorites = Node::new(NodeKind::Favorites, Parameters::new(), None);
    let cached = behavior::request(&favorites, &catalog).unwrap();
    assert_eq!(cached.args.get("user_id").map(String::as_str), Some("u1"));

    catalog.cache().store(&cached.cache_key(), &json!({"albums": {}})).await;
    assert!(favorites::add(&catalog, &ids).await);
    assert_eq!(catalog.cache().load(&cached.cache_key()).await, None);

    catalog.cache().store(&cached.cache_key(), &json!({"albums": {}})).await;
    assert!(favorites::remove(&catalog, &ids).await);
    assert_eq!(catalog.cache().load(&cached.cache_key()).await, None);

    assert!(!favorites::add(&catalog, &FavoriteIds::default()).await);
    assert_eq!(catalog.api().calls().len(), 2);
}
