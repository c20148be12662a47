//! Client-side cart mutation coalescer.
//!
//! [`CartSession`] keeps a local cart in step with the server while the user edits it:
//! quantity edits are debounced and serialised per item, repeated adds of a product are
//! suppressed while one is running, and deletes are shown immediately and kept hidden until the
//! server's reads catch up. [`HttpCartApi`] talks to the JSON API; anything implementing
//! [`CartApi`] can stand in for it.

pub mod api;
pub mod errors;
pub mod http;
pub mod session;
pub mod settings;

#[cfg(test)]
mod test;

pub use api::CartApi;
pub use errors::ClientError;
pub use http::HttpCartApi;
pub use session::{AddOutcome, CartSession, ItemStatus};
pub use settings::CoalescerSettings;
