//! External integrations
//!
//! - [`soda`] - the remote SODA dataset service (HTTP, paged)
//! - [`store`] - the on-disk artifact store (CSV tables, JSON manifest)

pub mod soda;
pub mod store;
