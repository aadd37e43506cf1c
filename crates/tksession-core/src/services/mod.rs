//! Request-scoped coordination of the session layers

pub mod session_manager;

pub use session_manager::{SessionExchange, SessionManager};
