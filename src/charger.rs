//! go-eCharger LAN integration
//!
//! Talks to a single charging station over its plain-HTTP local API: a
//! reachability test, a status read, and two setters (current limit and
//! energy limit). Every operation resolves to an [`OperationResult`]; nothing
//! panics or escapes past the client.
//!
//! The HTTP layer sits behind [`HttpTransport`] so the request/response
//! mapping can be exercised without a device on the network.

pub mod client;
pub mod status;
pub mod transport;

pub use client::{
    ChargerClient, MAX_CURRENT_AMPERE, MIN_CURRENT_AMPERE, OperationResult, REQUEST_TIMEOUT,
};
pub use status::{CarState, ChargerStatus};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
