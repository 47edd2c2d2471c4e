// Upstream module - calls into the authentication service

pub mod client;
pub mod error;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{AuthServiceClient, DownstreamResult, Operation};
pub use error::{ErrorKind, ForwardError};
