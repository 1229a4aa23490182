//! Identity provider abstraction
//!
//! Principals are owned by an external identity system. This subsystem
//! needs exactly three things from it: fetch a principal, create or
//! replace one, and overwrite a principal's file collection. Everything
//! else (authentication, sessions, account lifecycle) stays upstream.

mod memory;
mod provider;

pub use memory::{MemoryIdentityProvider, MemoryIdentityProviderError};
pub use provider::{IdentityError, IdentityProvider};
