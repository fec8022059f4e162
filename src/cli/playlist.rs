use crate::{
    error, info,
    management::{SessionManager, UserStorage},
    node::Tree,
    qobuz::playlist,
    success,
};

use super::StartNode;

pub async fn playlist_create(name: String, public: bool, current: bool) {
    let catalog = super::open_catalog(true).await;
    let Some(playlist_id) = playlist::create(&catalog, &name, public, false).await else {
        error!("Cannot create playlist {}", name);
    };
    success!("Created playlist {} ({})", name, playlist_id);

    if current {
        set_current(&playlist_id).await;
    }
}

pub async fn playlist_rename(playlist_id: String, name: String) {
    let catalog = super::open_catalog(true).await;
    if !playlist::rename(&catalog, &playlist_id, &name).await {
        error!("Cannot rename playlist {}", playlist_id);
    }
    success!("Playlist {} renamed to {}", playlist_id, name.trim());
}

pub async fn playlist_delete(playlist_id: String) {
    let catalog = super::open_catalog(true).await;
    if !playlist::delete(&catalog, &playlist_id).await {
        error!("Cannot delete playlist {}", playlist_id);
    }
    success!("Playlist {} deleted", playlist_id);
}

/// Shows the current playlist, or makes `playlist_id` the current one.
pub async fn playlist_current(playlist_id: Option<String>) {
    match playlist_id {
        Some(playlist_id) => set_current(&playlist_id).await,
        None => match load_storage().await.current_playlist() {
            Some(current) => info!("Current playlist: {}", current),
            None => info!("No current playlist, set one with `qobuzcli playlist current ID`"),
        },
    }
}

/// Adds every track reachable from the node at `from` to a playlist, the
/// current one unless `playlist_id` is given.
pub async fn playlist_add(playlist_id: Option<String>, from: String) {
    let playlist_id = match playlist_id {
        Some(id) => id,
        None => match load_storage().await.current_playlist() {
            Some(current) => current.to_string(),
            None => error!("No playlist given and no current playlist set"),
        },
    };

    let node = match StartNode::from_url(from).to_node() {
        Ok(node) => node,
        Err(e) => error!("Cannot read node: {}", e),
    };

    let catalog = super::open_catalog(true).await;
    let mut tree = Tree::new();
    let start = tree.insert(node);
    info!("Collecting tracks of {}", tree.label(start));

    let tracks =
        match playlist::collect_tracks(&catalog, &mut tree, start, super::cancel_on_ctrl_c()).await
        {
            Ok(tracks) => tracks,
            Err(e) => error!("Cannot collect tracks: {}", e),
        };

    if !playlist::add_tracks(&catalog, &tree, &playlist_id, &tracks).await {
        error!("Cannot add tracks to playlist {}", playlist_id);
    }
    success!(
        "Added {} tracks to playlist {}",
        tracks.len().min(playlist::MAX_PLAYLIST_TRACKS),
        playlist_id
    );
}

async fn load_storage() -> UserStorage {
    let session = match SessionManager::load().await {
        Ok(session) => session,
        Err(e) => error!("{}", e),
    };
    match UserStorage::load(session.user_id()).await {
        Ok(storage) => storage,
        Err(e) => error!("Cannot read user storage: {}", e),
    }
}

async fn set_current(playlist_id: &str) {
    let mut storage = load_storage().await;
    storage.set_current_playlist(playlist_id);
    if let Err(e) = storage.persist().await {
        error!("Cannot store current playlist: {}", e);
    }
    success!("Current playlist is now {}", playlist_id);
}
