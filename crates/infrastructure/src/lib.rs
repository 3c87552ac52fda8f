//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_authorization_client;

pub use http_authorization_client::HttpAuthorizationClient;
