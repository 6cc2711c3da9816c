//! Test utilities for gateway tests.

pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_transport::{MockResponse, MockTransport};
