//! Helix REST lookups used by bootstrap verification and the polling loop.

mod helix;
mod transport;

pub use helix::{HelixClient, NOT_AVAILABLE};
pub use transport::build_http_client;
