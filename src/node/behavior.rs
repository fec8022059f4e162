//! Per-kind dispatch of the node operations: the request a node fetches, how
//! its payload becomes children, its label and its image.

use rand::Rng;
use serde_json::{Map, Value, json};

use super::{Node, NodeId, NodeKind, Parameters, Tree, property};
use crate::{
    catalog::Catalog, debug, qobuz::CatalogApi, types::Request, utils::year_from_timestamp,
};

/// `type` values accepted by `/playlist/getFeatured`.
pub const PUBLIC_PLAYLIST_TYPES: [&str; 2] = ["editor-picks", "last-created"];
pub const DEFAULT_PUBLIC_PLAYLIST_TYPE: &str = "last-created";
pub const DEFAULT_FEATURED_ALBUM_TYPE: &str = "new-releases";

const ARTIST_NAME_PATHS: [&str; 3] = ["artist/name", "interpreter/name", "composer/name"];
const TRACK_ARTIST_PATHS: [&str; 5] = [
    "performer/name",
    "artist/name",
    "album/artist/name",
    "interpreter/name",
    "composer/name",
];

/// Request that fetches `node`, `None` when the node lacks what the request
/// is parameterized on (its id, the user id, a valid selector).
pub fn request<A: CatalogApi>(node: &Node, catalog: &Catalog<A>) -> Option<Request> {
    let request = match node.kind() {
        NodeKind::Root => Request::new("/album/getFeatured").arg(
            "type",
            node.params()
                .get("type")
                .unwrap_or(DEFAULT_FEATURED_ALBUM_TYPE),
        ),
        NodeKind::Album => Request::new("/album/get").arg("album_id", node.nid()?),
        NodeKind::Track => Request::new("/track/get").arg("track_id", node.nid()?),
        NodeKind::Artist => Request::new("/artist/get").arg("artist_id", node.nid()?),
        NodeKind::AlbumsByArtist => Request::new("/artist/get")
            .arg("artist_id", node.nid()?)
            .arg("extra", "albums"),
        NodeKind::SimilarArtists => {
            Request::new("/artist/getSimilarArtists").arg("artist_id", node.nid()?)
        }
        NodeKind::Playlist => Request::new("/playlist/get")
            .arg("playlist_id", node.nid()?)
            .arg("extra", "tracks"),
        NodeKind::UserPlaylists => {
            Request::new("/playlist/getUserPlaylists").arg("user_id", catalog.user_id()?)
        }
        NodeKind::PublicPlaylists => {
            Request::new("/playlist/getFeatured").arg("type", public_playlist_type(node)?)
        }
        NodeKind::Favorites => {
            Request::new("/favorite/getUserFavorites").arg("user_id", catalog.user_id()?)
        }
        NodeKind::ArticleRubrics => Request::new("/article/listRubrics"),
        NodeKind::Articles => {
            Request::new("/article/listLastArticles").arg("rubric_ids", node.nid()?)
        }
        NodeKind::Article => Request::new("/article/get").arg("article_id", node.nid()?),
    };

    if !is_paged(node.kind()) {
        return Some(request);
    }
    Some(
        request
            .arg("limit", catalog.limit())
            .arg("offset", node.offset()),
    )
}

/// Whether the kind's request takes `limit` and `offset`, that is whether a
/// later page of it can be fetched.
pub fn is_paged(kind: NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::Track | NodeKind::Artist | NodeKind::Article
    )
}

/// Selected featured playlist type, `None` when the selector is invalid.
pub fn public_playlist_type(node: &Node) -> Option<&str> {
    let selected = node
        .params()
        .get("type")
        .unwrap_or(DEFAULT_PUBLIC_PLAYLIST_TYPE);
    PUBLIC_PLAYLIST_TYPES.contains(&selected).then_some(selected)
}

/// Fetches the node's payload through the catalog. On failure the node
/// keeps whatever data it had.
pub async fn fetch<A: CatalogApi>(tree: &mut Tree, id: NodeId, catalog: &Catalog<A>) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    let Some(request) = request(node, catalog) else {
        debug!("Cannot fetch {} {:?}: identity unknown", node.kind(), node.nid());
        return false;
    };

    match catalog.get(&request).await {
        Some(data) => match tree.get_mut(id) {
            Some(node) => {
                node.set_data(data);
                true
            }
            None => false,
        },
        None => false,
    }
}

/// Turns the node's payload into children, returns whether any were added.
pub fn populate(tree: &mut Tree, id: NodeId) -> bool {
    let Some(kind) = tree.get(id).map(Node::kind) else {
        return false;
    };

    match kind {
        NodeKind::Root => attach_items(tree, id, "albums/items", NodeKind::Album),
        NodeKind::Album => populate_album(tree, id),
        NodeKind::Track | NodeKind::Article => false,
        NodeKind::Artist => populate_artist(tree, id),
        NodeKind::AlbumsByArtist => populate_albums_by_artist(tree, id),
        NodeKind::SimilarArtists => attach_items(tree, id, "artists/items", NodeKind::Artist),
        NodeKind::Playlist => attach_items(tree, id, "tracks/items", NodeKind::Track),
        NodeKind::UserPlaylists | NodeKind::PublicPlaylists => {
            attach_items(tree, id, "playlists/items", NodeKind::Playlist)
        }
        NodeKind::Favorites => {
            let artists = attach_items(tree, id, "artists/items", NodeKind::Artist);
            let albums = attach_items(tree, id, "albums/items", NodeKind::Album);
            let tracks = attach_items(tree, id, "tracks/items", NodeKind::Track);
            artists || albums || tracks
        }
        NodeKind::ArticleRubrics => populate_rubrics(tree, id),
        NodeKind::Articles => attach_items(tree, id, "articles/items", NodeKind::Article),
    }
}

fn items(tree: &Tree, id: NodeId, path: &str) -> Vec<Value> {
    match tree.get(id).and_then(|node| node.get_property(path)) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn attach_items(tree: &mut Tree, id: NodeId, path: &str, kind: NodeKind) -> bool {
    let items = items(tree, id, path);
    attach_all(tree, id, kind, items)
}

fn attach_all(tree: &mut Tree, id: NodeId, kind: NodeKind, items: Vec<Value>) -> bool {
    if items.is_empty() {
        return false;
    }
    for item in items {
        tree.attach(id, Node::new(kind, Parameters::new(), Some(item)));
    }
    true
}

/// Tracks of an album payload, each carrying a summary of the album so a
/// track stands on its own once detached from it.
fn populate_album(tree: &mut Tree, id: NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };

    let year = node
        .get_property("released_at")
        .and_then(Value::as_i64)
        .and_then(year_from_timestamp)
        .or_else(|| {
            node.get_str("release_date_original", "")
                .get(..4)
                .and_then(|year| year.parse().ok())
        });
    let album = json!({
        "title": node.get_str("title", ""),
        "id": node.nid(),
        "genre": { "name": node.get_str("genre/name", "") },
        "label": {
            "name": node.get_str("label/name", ""),
            "albums_count": node.get_property("label/albums_count").cloned(),
        },
        "year": year,
        "artist": { "name": node.get_str(&ARTIST_NAME_PATHS, "") },
        "image": node.get_property("image").cloned(),
    });

    let tracks = items(tree, id, "tracks/items")
        .into_iter()
        .map(|mut track| {
            if let Value::Object(map) = &mut track {
                map.insert("album".to_string(), album.clone());
            }
            track
        })
        .collect();
    attach_all(tree, id, NodeKind::Track, tracks)
}

fn populate_artist(tree: &mut Tree, id: NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    let Some(nid) = node.nid() else {
        return false;
    };
    let data = node.data().cloned();

    let params = Parameters::new().with("nid", nid);
    tree.attach(
        id,
        Node::new(NodeKind::AlbumsByArtist, params.clone(), data.clone()),
    );
    tree.attach(id, Node::new(NodeKind::SimilarArtists, params, data));
    true
}

fn populate_albums_by_artist(tree: &mut Tree, id: NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    let mut artist = Map::new();
    if let Some(nid) = node.nid() {
        artist.insert("id".to_string(), Value::String(nid));
    }
    artist.insert(
        "name".to_string(),
        Value::String(node.get_str("name", "")),
    );
    let artist = Value::Object(artist);

    let albums = items(tree, id, "albums/items")
        .into_iter()
        .map(|mut album| {
            if let Value::Object(map) = &mut album {
                map.entry("artist").or_insert_with(|| artist.clone());
            }
            album
        })
        .collect();
    attach_all(tree, id, NodeKind::Album, albums)
}

fn populate_rubrics(tree: &mut Tree, id: NodeId) -> bool {
    let rubrics = items(tree, id, "rubrics/items");
    if rubrics.is_empty() {
        return false;
    }
    for rubric in rubrics {
        let nid = property::lookup(&rubric, "id")
            .found()
            .and_then(property::value_to_string)
            .unwrap_or_default();
        let title = property::lookup(&rubric, "title")
            .found()
            .and_then(property::value_to_string)
            .unwrap_or_default();
        let child = Node::new(
            NodeKind::Articles,
            Parameters::new().with("nid", nid),
            Some(rubric),
        )
        .with_label(title);
        tree.attach(id, child);
    }
    true
}

/// Label of the node including the page marker of a continuation.
pub fn label(tree: &Tree, id: NodeId) -> String {
    let base = base_label(tree, id);
    match tree.get(id).and_then(Node::page_marker) {
        Some(marker) => format!("{} {}", base, marker),
        None => base,
    }
}

/// Label of the node without page marker, falling back to the kind's
/// display name.
pub fn base_label(tree: &Tree, id: NodeId) -> String {
    let Some(node) = tree.get(id) else {
        return String::new();
    };
    if let Some(label) = node.explicit_label() {
        return label.to_string();
    }

    let label = match node.kind() {
        NodeKind::Root | NodeKind::UserPlaylists => String::new(),
        NodeKind::Album => {
            let title = node.get_str("title", "");
            if title.is_empty() {
                title
            } else {
                format!("{} - {}", node.get_str(&ARTIST_NAME_PATHS, "VA"), title)
            }
        }
        NodeKind::Track => {
            let title = node.get_str("title", "");
            let artist = node.get_str(&TRACK_ARTIST_PATHS, "");
            if artist.is_empty() || title.is_empty() {
                title
            } else {
                format!("{} - {}", artist, title)
            }
        }
        NodeKind::Artist | NodeKind::AlbumsByArtist => node.get_str("name", ""),
        NodeKind::SimilarArtists => {
            let name = node.get_str("name", "");
            if name.is_empty() {
                name
            } else {
                format!("Similar to {}", name)
            }
        }
        NodeKind::Playlist => node.get_str(&["name", "title"], ""),
        NodeKind::PublicPlaylists => format!(
            "Public playlists ({})",
            public_playlist_type(node).unwrap_or(DEFAULT_PUBLIC_PLAYLIST_TYPE)
        ),
        NodeKind::Favorites => "Favorites".to_string(),
        NodeKind::ArticleRubrics | NodeKind::Articles | NodeKind::Article => {
            node.get_str("title", "")
        }
    };

    if label.trim().is_empty() {
        node.kind().display_name().to_string()
    } else {
        label
    }
}

/// Artwork of the node in the preferred `size`; kinds without artwork of
/// their own show their parent's.
pub fn image(tree: &Tree, id: NodeId, size: &str) -> Option<String> {
    let node = tree.get(id)?;
    if let Some(image) = node.explicit_image() {
        return Some(image.to_string());
    }

    let own = match node.kind() {
        NodeKind::Album => cover(node, "image", size),
        NodeKind::Track => cover(node, "album/image", size),
        NodeKind::Artist | NodeKind::AlbumsByArtist => node
            .get_property(&["picture", "image/large", "image/medium"])
            .and_then(property::value_to_string)
            .map(|url| url.replace("126s", "_")),
        NodeKind::Playlist => playlist_mosaic(node),
        _ => None,
    };

    own.or_else(|| node.parent().and_then(|parent| image(tree, parent, size)))
        .or_else(|| {
            node.get_property("image")
                .and_then(property::value_to_string)
        })
}

fn cover(node: &Node, prefix: &str, size: &str) -> Option<String> {
    let paths: Vec<String> = [size, "large", "small", "thumbnail"]
        .iter()
        .map(|size| format!("{}/{}", prefix, size))
        .collect();
    node.get_property(&paths)
        .and_then(property::value_to_string)
}

/// One of the playlist's cover mosaics, picked at random.
fn playlist_mosaic(node: &Node) -> Option<String> {
    match node.get_property(&["images300", "images150", "images"])? {
        Value::Array(urls) => {
            let urls: Vec<String> = urls.iter().filter_map(property::value_to_string).collect();
            if urls.is_empty() {
                return None;
            }
            let pick = rand::rng().random_range(0..urls.len());
            urls.into_iter().nth(pick)
        }
        other => property::value_to_string(other),
    }
}
