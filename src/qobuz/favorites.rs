use crate::{
    catalog::Catalog,
    node::{Node, NodeKind, Parameters, behavior},
    qobuz::CatalogApi,
    types::Request,
    warning,
};

/// Ids to add to or remove from the user's favorites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteIds {
    pub tracks: Vec<String>,
    pub albums: Vec<String>,
    pub artists: Vec<String>,
}

impl FavoriteIds {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && self.albums.is_empty() && self.artists.is_empty()
    }

    fn apply(&self, mut request: Request) -> Request {
        for (name, ids) in [
            ("track_ids", &self.tracks),
            ("album_ids", &self.albums),
            ("artist_ids", &self.artists),
        ] {
            if !ids.is_empty() {
                request = request.arg(name, ids.join(","));
            }
        }
        request
    }
}

pub async fn add<A: CatalogApi>(catalog: &Catalog<A>, ids: &FavoriteIds) -> bool {
    mutate(catalog, "/favorite/create", ids).await
}

pub async fn remove<A: CatalogApi>(catalog: &Catalog<A>, ids: &FavoriteIds) -> bool {
    mutate(catalog, "/favorite/delete", ids).await
}

async fn mutate<A: CatalogApi>(catalog: &Catalog<A>, endpoint: &str, ids: &FavoriteIds) -> bool {
    if ids.is_empty() {
        warning!("No favorite given");
        return false;
    }
    if catalog.call(&ids.apply(Request::new(endpoint))).await.is_none() {
        return false;
    }
    invalidate(catalog).await;
    true
}

/// Drops the cached first page of the user's favorites.
pub async fn invalidate<A: CatalogApi>(catalog: &Catalog<A>) -> bool {
    let favorites = Node::new(NodeKind::Favorites, Parameters::new(), None);
    match behavior::request(&favorites, catalog) {
        Some(request) => catalog.invalidate(&request).await,
        None => false,
    }
}
