//! Accounts and sessions: password hashing, the credential store, the session
//! manager and the actix glue that exposes the logged-in user to handlers.

pub mod credentials;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod session;

pub use credentials::CredentialStore;
pub use extractors::AuthenticatedUser;
pub use middleware::SessionMiddleware;
pub use password::{hash_password, verify_password};
pub use session::{
    MemorySessionStore, SessionManager, SessionStore, SqliteSessionStore, SESSION_COOKIE,
};
