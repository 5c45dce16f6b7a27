//! Network fetch abstraction.
//!
//! The worker never talks to reqwest directly; it goes through the
//! [`Fetcher`] trait so tests can substitute a mock and assert on exactly
//! which network calls happened.

mod fetch;
mod reqwest_client;

pub use fetch::{CachePolicy, FetchError, Fetcher, RequestMode, TileRequest};
pub use reqwest_client::ReqwestFetcher;

#[cfg(test)]
pub use fetch::tests::MockFetcher;
