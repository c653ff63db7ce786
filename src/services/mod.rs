//! Service layer for business logic
//!
//! The lookup service is the only component with behaviour of its own;
//! cache, upstream and credentials are collaborators injected at startup.

mod lookup;

pub use lookup::{DEFAULT_CACHE_TTL, LookupService};
