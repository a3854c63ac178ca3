//! Admin HTTP surface
//!
//! Staff-only preview/editing endpoints plus the login pages.

pub mod preview;
pub mod server;
pub mod web;

pub use server::ApiServer;
