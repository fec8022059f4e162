use crate::{
    error,
    qobuz::favorites::{self, FavoriteIds},
    success,
};

pub async fn favorites_add(ids: FavoriteIds) {
    let catalog = super::open_catalog(true).await;
    if !favorites::add(&catalog, &ids).await {
        error!("Cannot add favorites");
    }
    success!("Favorites added");
}

pub async fn favorites_remove(ids: FavoriteIds) {
    let catalog = super::open_catalog(true).await;
    if !favorites::remove(&catalog, &ids).await {
        error!("Cannot remove favorites");
    }
    success!("Favorites removed");
}
