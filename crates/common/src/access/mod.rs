//! Signed, expiring access links
//!
//! A link is a capability token: it authorizes exactly one
//! `(storage path, expiry)` pair, is unforgeable without the server
//! secret, and requires no server-side lookup table. The server mints a
//! URL once; the client can present it until expiry without
//! re-authenticating.
//!
//! - **[`LinkSigner`]**: derives and verifies the keyed fingerprint
//! - **[`AccessLinks`]**: mints full fetch URLs and validates presented
//!   links against expiry and fingerprint together

mod link;
mod signer;

pub use link::{AccessLinks, SignedLink};
pub use signer::{LinkSigner, SigningSecret};
