//! JSON-RPC 2.0 types used to talk to the Zabbix API.
//!
//! Only the client half of the protocol is needed: requests go out over
//! HTTP POST and a single response comes back per request.

pub mod protocol;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

pub const JSONRPC_VERSION: &str = "2.0";

/// Zabbix API method names
pub mod methods {
    pub const USER_LOGIN: &str = "user.login";
    pub const CONFIGURATION_IMPORT: &str = "configuration.import";
}
