// Domain services
//
// Each module pins one backend's base path (relative to the gateway URL)
// and adds inherent methods to `ApiClient`. Strict operations turn an
// empty envelope into `Error` with a fixed fallback message; the few
// lenient ones return an empty default and log what they dropped.

pub mod accounting;
pub mod auth;
pub mod collections;
pub mod compliance;
pub mod customers;
pub mod loans;
pub mod media;
pub mod notifications;
pub mod organization;
pub mod products;
pub mod reporting;
