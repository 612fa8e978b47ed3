pub mod client;
pub mod http;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub use client::{endpoints, ApiClient};
