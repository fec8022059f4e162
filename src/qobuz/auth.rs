use serde_json::Value;

use crate::{
    node::property::{lookup, value_to_string},
    qobuz::CatalogApi,
    types::{Args, Session},
    utils, warning,
};

/// Authenticates against `/user/login` and returns the new session.
///
/// The login call is never cached. `password` is sent as configured; the
/// API expects its MD5 digest.
///
/// # Arguments
///
/// * `api` - Remote catalog to authenticate against
/// * `username` - Account name or email
/// * `password` - MD5 digest of the account password
///
/// # Returns
///
/// - `Some(Session)` - User id and auth token of the account
/// - `None` - Login refused or the answer lacked the user id or token
///
/// # Example
///
/// ```ignore
/// let client = QobuzClient::from_env();
/// if let Some(session) = login(&client, "me@example.org", "5f4dcc3b...").await {
///     SessionManager::new(session).persist().await?;
/// }
/// ```
pub async fn login<A: CatalogApi>(api: &A, username: &str, password: &str) -> Option<Session> {
    let mut args = Args::new();
    args.insert("username".to_string(), username.to_string());
    args.insert("password".to_string(), password.to_string());

    let Some(json) = api.get("/user/login", &args).await else {
        warning!("Login for {} failed", username);
        return None;
    };
    session_from_login(&json)
}

/// Extracts the session of a `/user/login` answer.
pub fn session_from_login(json: &Value) -> Option<Session> {
    let user_id = lookup(json, "user/id").found().and_then(value_to_string);
    let token = lookup(json, "user_auth_token")
        .found()
        .and_then(value_to_string);

    match (user_id, token) {
        (Some(user_id), Some(user_auth_token)) => Some(Session {
            user_id,
            user_auth_token,
            obtained_at: utils::now_timestamp(),
        }),
        _ => {
            warning!("Login answer carries no user id or auth token");
            None
        }
    }
}
