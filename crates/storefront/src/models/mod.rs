//! Domain models for storefront.
//!
//! Types stored in, or bridged to, the visitor's session.

pub mod session;

pub use session::{SessionSnapshot, keys as session_keys};
