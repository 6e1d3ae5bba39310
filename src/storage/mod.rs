//! Local persistence
//!
//! The only state pew keeps between runs is the session cookie file.

pub mod session;

pub use session::SessionStore;
