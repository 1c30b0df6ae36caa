//! HTTP client side of monsync
//!
//! Zabbix and Grafana are both reached through [`HttpTransport`], which
//! keeps the API clients independent of `reqwest` and mockable in tests.

pub mod transport;

pub use transport::{HttpReply, HttpRequest, HttpTransport, ReqwestTransport};

#[cfg(test)]
pub use transport::MockHttpTransport;
