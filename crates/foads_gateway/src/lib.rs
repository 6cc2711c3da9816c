//! Backend gateway for the FoadsIA client.
//!
//! Every backend call goes through [`Gateway::call`], which resolves the
//! endpoint against the configured base URL, attaches a bearer token obtained
//! through anonymous login, re-authenticates once on a 401, and converts every
//! failure into an [`ApiResult`](foads_core::ApiResult), substituting demo
//! data when the caller supplied some.
//!
//! The HTTP layer sits behind the [`Transport`] trait so tests can script
//! responses without a server.

#![warn(missing_docs)]

mod config;
mod gateway;
mod session;
mod transport;

pub use config::{DEFAULT_BASE_URL, GatewayConfig, GatewayConfigBuilder};
pub use gateway::Gateway;
pub use session::Session;
pub use transport::{Method, ReqwestTransport, Transport, TransportRequest, TransportResponse};
