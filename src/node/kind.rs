use std::{collections::BTreeSet, fmt, str::FromStr};

/// Discriminant of a catalog node: selects how the node fetches, populates
/// and renders, and which include/exclude filters match it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Root,
    Track,
    Album,
    Artist,
    AlbumsByArtist,
    SimilarArtists,
    Playlist,
    UserPlaylists,
    PublicPlaylists,
    Favorites,
    ArticleRubrics,
    Articles,
    Article,
}

impl NodeKind {
    pub const ALL: [NodeKind; 13] = [
        NodeKind::Root,
        NodeKind::Track,
        NodeKind::Album,
        NodeKind::Artist,
        NodeKind::AlbumsByArtist,
        NodeKind::SimilarArtists,
        NodeKind::Playlist,
        NodeKind::UserPlaylists,
        NodeKind::PublicPlaylists,
        NodeKind::Favorites,
        NodeKind::ArticleRubrics,
        NodeKind::Articles,
        NodeKind::Article,
    ];

    /// Stable name used in navigation URLs (`nt=`) and on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Track => "track",
            NodeKind::Album => "album",
            NodeKind::Artist => "artist",
            NodeKind::AlbumsByArtist => "albums_by_artist",
            NodeKind::SimilarArtists => "similar_artists",
            NodeKind::Playlist => "playlist",
            NodeKind::UserPlaylists => "user_playlists",
            NodeKind::PublicPlaylists => "public_playlists",
            NodeKind::Favorites => "favorites",
            NodeKind::ArticleRubrics => "article_rubrics",
            NodeKind::Articles => "articles",
            NodeKind::Article => "article",
        }
    }

    /// Label of last resort when a node's data yields none.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Root => "Qobuz",
            NodeKind::Track => "Track",
            NodeKind::Album => "Album",
            NodeKind::Artist => "Artist",
            NodeKind::AlbumsByArtist => "Albums",
            NodeKind::SimilarArtists => "Similar artists",
            NodeKind::Playlist => "Playlist",
            NodeKind::UserPlaylists => "My playlists",
            NodeKind::PublicPlaylists => "Public playlists",
            NodeKind::Favorites => "Favorites",
            NodeKind::ArticleRubrics => "Articles",
            NodeKind::Articles => "Articles",
            NodeKind::Article => "Article",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == normalized)
            .ok_or_else(|| format!("unknown node kind '{}'", s))
    }
}

/// Set of node kinds used as include/exclude filter of a traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeKinds(pub BTreeSet<NodeKind>);

impl NodeKinds {
    pub fn all() -> Self {
        NodeKinds(NodeKind::ALL.into_iter().collect())
    }

    pub fn none() -> Self {
        NodeKinds(BTreeSet::new())
    }

    pub fn of(kinds: &[NodeKind]) -> Self {
        NodeKinds(kinds.iter().copied().collect())
    }

    pub fn contains(&self, kind: NodeKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(NodeKind::slug)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}
