mod auth;
mod storage;

pub use auth::SessionError;
pub use auth::SessionManager;
pub use storage::StorageError;
pub use storage::UserData;
pub use storage::UserStorage;
