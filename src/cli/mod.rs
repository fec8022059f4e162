//! # CLI Module
//!
//! Command implementations behind the `qobuzcli` binary. Each command builds
//! what it needs (API client, cache-aware catalog, node tree) from the
//! environment, runs the library operation and reports the result with the
//! crate's terminal macros.
//!
//! ```text
//! CLI Layer (commands, spinner, tables)
//!     ↓
//! Traversal / Qobuz mutations
//!     ↓
//! Catalog (response cache)
//!     ↓
//! Qobuz JSON API
//! ```
//!
//! ## Usage Patterns
//!
//! ```bash
//! qobuzcli login                                   # store a session
//! qobuzcli browse                                  # featured new releases
//! qobuzcli browse album --nid 0060254735180        # tracks of an album
//! qobuzcli browse favorites --include track --depth -1
//! qobuzcli playlist add --from "plugin://plugin.audio.qobuz/?nt=album&nid=..."
//! qobuzcli cache clean --max-age 86400
//! ```
//!
//! Failures that end a command are reported with `error!`, which exits the
//! process; recoverable ones are reported with `warning!`.

mod auth;
mod browse;
mod cache;
mod favorites;
mod playlist;

pub use auth::login;
pub use browse::StartNode;
pub use browse::browse;
pub use cache::{cache_clean, cache_clear, cache_info};
pub use favorites::{favorites_add, favorites_remove};
pub use playlist::{
    playlist_add, playlist_create, playlist_current, playlist_delete, playlist_rename,
};

use crate::{
    catalog::Catalog,
    error,
    management::SessionManager,
    qobuz::QobuzClient,
    traversal::CancelToken,
};

/// Catalog over the Qobuz API, authenticated with the stored session when
/// there is one.
async fn open_catalog(require_session: bool) -> Catalog<QobuzClient> {
    let session = match SessionManager::load().await {
        Ok(manager) => Some(manager),
        Err(e) if require_session => error!("{}", e),
        Err(_) => None,
    };

    let client = QobuzClient::from_env()
        .with_user_auth_token(session.as_ref().map(|s| s.user_auth_token().to_string()));
    Catalog::from_env(client, session.map(|s| s.user_id().to_string()))
}

/// Cancellation token raised by Ctrl-C.
fn cancel_on_ctrl_c() -> CancelToken {
    let token = CancelToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });
    token
}
