pub mod lookup;
pub mod status;

pub use lookup::{ErrorBody, LookupHandler, lookup_routes};
pub use status::{StatusService, status_routes};
