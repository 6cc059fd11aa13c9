// lendops-api: async client for the lending platform's operations services

pub mod client;
pub mod envelope;
pub mod error;
pub mod page;
pub mod services;
pub mod token;
pub mod transport;
pub mod types;

pub use client::{ApiClient, RequestBody, RequestOptions};
pub use envelope::ResponseEnvelope;
pub use error::Error;
pub use page::{Listing, Page, PageRequest};
pub use token::{MemoryTokenStore, TokenStore};
pub use transport::{TlsMode, TransportConfig};
pub use types::*;
