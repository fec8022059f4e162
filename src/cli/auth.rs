use crate::{
    config, error, info, management::SessionManager, qobuz, qobuz::QobuzClient, success,
};

/// Logs in with `QOBUZ_USERNAME` / `QOBUZ_PASSWORD` and stores the session.
pub async fn login() {
    let (Some(username), Some(password)) = (config::username(), config::password()) else {
        error!(
            "Set QOBUZ_USERNAME and QOBUZ_PASSWORD in {}",
            config::data_dir().join(".env").display()
        );
    };

    info!("Logging in as {}", username);
    let client = QobuzClient::from_env();
    let Some(session) = qobuz::auth::login(&client, &username, &password).await else {
        error!("Login refused for {}", username);
    };

    let manager = SessionManager::new(session);
    if let Err(e) = manager.persist().await {
        error!("Cannot store session: {}", e);
    }
    success!("Logged in, user id {}", manager.user_id());
}
