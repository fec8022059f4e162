mod common;

use common::{FakeApi, album, catalog};
use qobuzcli::node::{
    Lookup, Node, NodeKind, Parameters, Tree,
    property::{first_present, lookup},
};
use serde_json::{Value, json};
use tempfile::TempDir;

fn tree() -> Tree {
    Tree::with_base_url("plugin://plugin.audio.qobuz/").unwrap()
}

fn node(kind: NodeKind, data: Value) -> Node {
    Node::new(kind, Parameters::new(), Some(data))
}

#[test]
fn test_lookup_distinguishes_missing_and_empty() {
    let data = json!({"a": {"b": "x", "e": "", "n": null, "none": "None", "l": []}});

    assert_eq!(lookup(&data, "a/b"), Lookup::Found(&json!("x")));
    assert_eq!(lookup(&data, "a/zz"), Lookup::Missing);
    assert_eq!(lookup(&data, "a/b/c"), Lookup::Missing);
    assert_eq!(lookup(&data, "a/e"), Lookup::Empty);
    assert_eq!(lookup(&data, "a/n"), Lookup::Empty);
    assert_eq!(lookup(&data, "a/none"), Lookup::Empty);
    assert_eq!(lookup(&data, "a/l"), Lookup::Empty);
}

#[test]
fn test_first_present_falls_back_past_missing_and_empty() {
    let data = json!({"a": {"c": ""}, "b": 3});

    // a/b missing, a/c empty, b present
    assert_eq!(
        first_present(Some(&data), &["a/b", "a/c", "b"]),
        Some(&json!(3))
    );
    assert_eq!(first_present(Some(&data), &["a/b", "a/c"]), None);
    assert_eq!(first_present(None, "b"), None);
}

#[test]
fn test_get_str_renders_scalars_and_defaults() {
    let node = node(NodeKind::Album, json!({"id": 42, "hires": true, "title": "T"}));

    assert_eq!(node.get_str("id", ""), "42");
    assert_eq!(node.get_str("hires", ""), "true");
    assert_eq!(node.get_str(&["subtitle", "title"], ""), "T");
    assert_eq!(node.get_str("nope", "default"), "default");

    let empty = Node::new(NodeKind::Album, Parameters::new(), None);
    assert_eq!(empty.get_str("title", "default"), "default");
}

#[test]
fn test_nid_prefers_data_id() {
    let params = Parameters::new().with("nid", "7").with("offset", "50");
    let node = Node::new(NodeKind::Album, params.clone(), None);
    assert_eq!(node.nid(), Some("7".to_string()));
    assert_eq!(node.offset(), 50);
    // nid and offset are lifted out of the inherited parameters
    assert!(node.params().get("nid").is_none());
    assert!(node.params().get("offset").is_none());

    let node = Node::new(NodeKind::Album, params, Some(json!({"id": 9})));
    assert_eq!(node.nid(), Some("9".to_string()));
}

#[test]
fn test_children_inherit_parameter_copy() {
    let mut tree = tree();
    let parent = tree.insert(Node::new(
        NodeKind::PublicPlaylists,
        Parameters::new().with("type", "editor-picks").with("mode", "view"),
        None,
    ));
    let child = tree.attach(
        parent,
        Node::new(NodeKind::Playlist, Parameters::new().with("mode", "scan"), None),
    );

    assert_eq!(tree[child].params().get("type"), Some("editor-picks"));
    assert_eq!(tree[child].params().get("mode"), Some("scan"));
    assert_eq!(tree.parent(child), Some(parent));

    tree[child].params_mut().set("type", "last-created");
    assert_eq!(tree[parent].params().get("type"), Some("editor-picks"));
}

#[test]
fn test_remove_subtree_frees_every_slot() {
    let mut tree = tree();
    let root = tree.insert(Node::new(NodeKind::Root, Parameters::new(), None));
    let album = tree.attach(root, node(NodeKind::Album, json!({"id": 1})));
    let track = tree.attach(album, node(NodeKind::Track, json!({"id": 2})));
    let other = tree.attach(root, node(NodeKind::Album, json!({"id": 3})));
    assert_eq!(tree.len(), 4);

    tree.remove_subtree(album);

    assert_eq!(tree.len(), 2);
    assert!(!tree.contains(album));
    assert!(!tree.contains(track));
    assert_eq!(tree.children(root), &[other]);

    tree.clear_children(root);
    assert_eq!(tree.len(), 1);
    assert!(tree.children(root).is_empty());
}

#[test]
fn test_make_url_and_round_trip() {
    let mut tree = tree();
    let id = tree.insert(Node::new(
        NodeKind::Album,
        Parameters::new().with("nid", "42"),
        None,
    ));

    let url = tree.make_url(id);
    assert_eq!(
        url,
        "plugin://plugin.audio.qobuz/?mode=view&nid=42&nt=album&offset=0"
    );

    let (kind, params) = Parameters::from_url(&url).unwrap();
    assert_eq!(kind, NodeKind::Album);
    let rebuilt = Node::new(kind, params, None);
    assert_eq!(rebuilt.nid(), Some("42".to_string()));
    assert_eq!(rebuilt.offset(), 0);
    assert_eq!(rebuilt.params().get("mode"), Some("view"));
}

#[test]
fn test_make_url_drops_empty_values_and_encodes() {
    let mut tree = tree();
    let id = tree.insert(Node::new(
        NodeKind::PublicPlaylists,
        Parameters::new().with("type", "editor-picks").with("query", "a b&c"),
        None,
    ));

    let url = tree.make_url(id);
    assert!(!url.contains("nid="));
    assert!(url.contains("query=a+b%26c"));
    assert!(url.contains("nt=public_playlists"));

    let (_, params) = Parameters::from_url(&url).unwrap();
    assert_eq!(params.get("query"), Some("a b&c"));
}

#[test]
fn test_from_url_rejects_missing_kind() {
    assert!(Parameters::from_url("plugin://plugin.audio.qobuz/?nid=1").is_err());
    assert!(Parameters::from_url("plugin://plugin.audio.qobuz/?nt=bogus").is_err());
    assert!(Parameters::from_url("not a url").is_err());
}

#[test]
fn test_labels() {
    let mut tree = tree();
    let root = tree.insert(Node::new(NodeKind::Root, Parameters::new(), None));
    let album = tree.attach(
        root,
        node(NodeKind::Album, json!({"title": "Kind of Blue", "artist": {"name": "Miles Davis"}})),
    );
    let compilation = tree.attach(root, node(NodeKind::Album, json!({"title": "Hits"})));
    let track = tree.attach(
        album,
        node(NodeKind::Track, json!({"title": "So What", "album": {"artist": {"name": "Miles Davis"}}})),
    );
    let artist = tree.attach(root, node(NodeKind::Artist, json!({"name": "Nina Simone"})));
    let similar = tree.attach(
        artist,
        node(NodeKind::SimilarArtists, json!({"name": "Nina Simone"})),
    );
    let nameless = tree.attach(root, node(NodeKind::Playlist, json!({"id": 3})));

    assert_eq!(tree.label(root), "Qobuz");
    assert_eq!(tree.label(album), "Miles Davis - Kind of Blue");
    assert_eq!(tree.label(compilation), "VA - Hits");
    assert_eq!(tree.label(track), "Miles Davis - So What");
    assert_eq!(tree.label(artist), "Nina Simone");
    assert_eq!(tree.label(similar), "Similar to Nina Simone");
    assert_eq!(tree.label(nameless), "Playlist");

    let public = tree.insert(Node::new(NodeKind::PublicPlaylists, Parameters::new(), None));
    assert_eq!(tree.label(public), "Public playlists (last-created)");
}

#[test]
fn test_images() {
    let mut tree = tree();
    let album = tree.insert(node(
        NodeKind::Album,
        json!({"image": {"small": "s.jpg", "large": "l.jpg"}}),
    ));
    let track = tree.attach(album, node(NodeKind::Track, json!({"title": "T"})));
    let artist = tree.insert(node(
        NodeKind::Artist,
        json!({"picture": "https://img/126s/a.jpg"}),
    ));
    let albums = tree.attach(artist, Node::new(NodeKind::AlbumsByArtist, Parameters::new(), None));
    let playlist = tree.insert(node(NodeKind::Playlist, json!({"images300": ["p1.jpg", "p2.jpg"]})));

    assert_eq!(tree.image(album, "small"), Some("s.jpg".to_string()));
    assert_eq!(tree.image(album, "thumbnail"), Some("l.jpg".to_string()));
    assert_eq!(tree.image(track, "large"), Some("l.jpg".to_string()));
    assert_eq!(tree.image(artist, "large"), Some("https://img/_/a.jpg".to_string()));
    assert_eq!(tree.image(albums, "large"), Some("https://img/_/a.jpg".to_string()));
    let mosaic = tree.image(playlist, "large").unwrap();
    assert!(mosaic == "p1.jpg" || mosaic == "p2.jpg");
}

#[tokio::test]
async fn test_fetch_without_identity_never_calls_remote() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog(FakeApi::new(), &dir, 10).with_user_id(None);
    let mut tree = tree();
    let album = tree.insert(Node::new(NodeKind::Album, Parameters::new(), None));
    let favorites = tree.insert(Node::new(NodeKind::Favorites, Parameters::new(), None));
    let public = tree.insert(Node::new(
        NodeKind::PublicPlaylists,
        Parameters::new().with("type", "bogus"),
        None,
    ));

    assert!(!tree.fetch(album, &catalog).await);
    assert!(!tree.fetch(favorites, &catalog).await);
    assert!(!tree.fetch(public, &catalog).await);
    assert!(catalog.api().calls().is_empty());
}

#[tokio::test]
async fn test_failed_fetch_keeps_prior_data() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog(FakeApi::new(), &dir, 10);
    let mut tree = tree();
    let id = tree.insert(node(NodeKind::Album, json!({"id": 5, "title": "Old"})));

    assert!(!tree.fetch(id, &catalog).await);
    assert_eq!(tree[id].get_str("title", ""), "Old");
    assert_eq!(catalog.api().call_count("/album/get"), 1);
}

#[tokio::test]
async fn test_album_populate_stamps_tracks() {
    let dir = TempDir::new().unwrap();
    let payload = json!({
        "id": "a1",
        "title": "Blue",
        "artist": {"name": "Joni Mitchell"},
        "genre": {"name": "Folk"},
        "label": {"name": "Reprise", "albums_count": 12},
        "released_at": 36_547_200,
        "image": {"large": "l.jpg"},
        "tracks": {"items": [{"id": 1, "title": "All I Want"}, {"id": 2, "title": "My Old Man"}]},
    });
    let api = FakeApi::new().respond(album("a1"), payload);
    let catalog = catalog(api, &dir, 10);
    let mut tree = tree();
    let id = tree.insert(Node::new(NodeKind::Album, Parameters::new().with("nid", "a1"), None));

    assert!(tree.fetch(id, &catalog).await);
    assert!(tree.populate(id));

    let tracks = tree.children(id).to_vec();
    assert_eq!(tracks.len(), 2);
    let first = &tree[tracks[0]];
    assert_eq!(first.kind(), NodeKind::Track);
    assert_eq!(first.nid(), Some("1".to_string()));
    assert_eq!(first.get_str("album/title", ""), "Blue");
    assert_eq!(first.get_str("album/id", ""), "a1");
    assert_eq!(first.get_str("album/genre/name", ""), "Folk");
    assert_eq!(first.get_str("album/label/albums_count", ""), "12");
    assert_eq!(first.get_str("album/year", ""), "1971");
    assert_eq!(tree.label(tracks[0]), "Joni Mitchell - All I Want");
}

#[test]
fn test_populate_artist_and_albums_by_artist() {
    let mut tree = tree();
    let artist = tree.insert(node(NodeKind::Artist, json!({"id": 36819, "name": "Nina Simone"})));

    assert!(tree.populate(artist));
    let children = tree.children(artist).to_vec();
    let kinds: Vec<NodeKind> = children.iter().map(|c| tree[*c].kind()).collect();
    assert_eq!(kinds, vec![NodeKind::AlbumsByArtist, NodeKind::SimilarArtists]);
    assert_eq!(tree[children[0]].nid(), Some("36819".to_string()));

    let albums = tree.insert(node(
        NodeKind::AlbumsByArtist,
        json!({
            "id": 36819,
            "name": "Nina Simone",
            "albums": {"items": [{"id": "x", "title": "Pastel Blues"}, {"id": "y", "title": "Duets", "artist": {"name": "Various"}}]},
        }),
    ));
    assert!(tree.populate(albums));
    let albums = tree.children(albums).to_vec();
    assert_eq!(tree.label(albums[0]), "Nina Simone - Pastel Blues");
    assert_eq!(tree.label(albums[1]), "Various - Duets");
}

#[test]
fn test_populate_favorites_and_rubrics() {
    let mut tree = tree();
    let favorites = tree.insert(node(
        NodeKind::Favorites,
        json!({
            "artists": {"items": [{"id": 1, "name": "A"}]},
            "albums": {"items": [{"id": 2, "title": "B"}]},
            "tracks": {"items": [{"id": 3, "title": "C"}, {"id": 4, "title": "D"}]},
        }),
    ));
    assert!(tree.populate(favorites));
    let kinds: Vec<NodeKind> = tree
        .children(favorites)
        .iter()
        .map(|c| tree[*c].kind())
        .collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Artist, NodeKind::Album, NodeKind::Track, NodeKind::Track]
    );

    let rubrics = tree.insert(node(
        NodeKind::ArticleRubrics,
        json!({"rubrics": {"items": [{"id": 12, "title": "Interviews"}]}}),
    ));
    assert!(tree.populate(rubrics));
    let articles = tree.children(rubrics)[0];
    assert_eq!(tree[articles].kind(), NodeKind::Articles);
    assert_eq!(tree[articles].nid(), Some("12".to_string()));
    assert_eq!(tree.label(articles), "Interviews");

    let track = tree.insert(node(NodeKind::Track, json!({"id": 1})));
    assert!(!tree.populate(track));
}
