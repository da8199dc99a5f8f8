//! HTTP client for the go-eCharger local API
//!
//! All four operations run through [`ChargerClient::execute`], which owns the
//! address check, status-code handling and JSON decoding. Transports that do
//! not enforce their own connect and read timeouts get an overall bound.
//! Each operation only supplies its endpoint, its query parameters and a
//! function interpreting the decoded response object.

use super::status::{ChargerStatus, field_content, parse_object};
use super::transport::{HttpTransport, ReqwestTransport};
use crate::error::{ChargewiseError, Result};
use crate::logging::{StructuredLogger, get_logger};
use serde_json::{Map, Value};
use std::time::Duration;

/// Connect and read timeout applied to every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Lowest current accepted by AC charging hardware
pub const MIN_CURRENT_AMPERE: u32 = 6;

/// Highest current supported by this charger family
pub const MAX_CURRENT_AMPERE: u32 = 32;

const STATUS_PATH: &str = "/api/status";
const SET_PATH: &str = "/api/set";

/// Success value or a user-displayable failure
pub type OperationResult<T> = Result<T>;

/// Client for exactly one charger endpoint per call
pub struct ChargerClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    timeout: Duration,
    logger: StructuredLogger,
}

impl ChargerClient<ReqwestTransport> {
    /// Create a client using the default HTTP transport
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(ReqwestTransport::new(REQUEST_TIMEOUT)?))
    }
}

impl<T: HttpTransport> ChargerClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            timeout: REQUEST_TIMEOUT,
            logger: get_logger("charger"),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Confirm the address answers the status endpoint with JSON
    pub async fn test_connection(&self, address: &str) -> OperationResult<String> {
        self.execute(address, STATUS_PATH, &[("filter", "car,typ".to_string())], |obj| {
            Ok(match field_content(obj, "typ") {
                Some(device_type) => format!("Connected to {}", device_type),
                None => "Connected successfully".to_string(),
            })
        })
        .await
    }

    /// Read car state, currents, charging permission and energy limit
    pub async fn get_status(&self, address: &str) -> OperationResult<ChargerStatus> {
        self.execute(
            address,
            STATUS_PATH,
            &[("filter", "car,amp,alw,dwo,acu".to_string())],
            |obj| Ok(ChargerStatus::from_object(obj)),
        )
        .await
    }

    /// Set the charging current limit in ampere
    pub async fn set_current_limit(&self, address: &str, amps: u32) -> OperationResult<String> {
        ensure_address(address)?;
        if !(MIN_CURRENT_AMPERE..=MAX_CURRENT_AMPERE).contains(&amps) {
            return Err(ChargewiseError::validation(
                "amps",
                format!(
                    "Current must be between {} and {} ampere",
                    MIN_CURRENT_AMPERE, MAX_CURRENT_AMPERE
                ),
            ));
        }

        self.execute(address, SET_PATH, &[("amp", amps.to_string())], |obj| {
            let echoed = field_content(obj, "amp");
            let accepted = match echoed.as_deref() {
                Some("true") => true,
                Some(value) => value.parse::<i64>().ok() == Some(i64::from(amps)),
                None => false,
            };
            if accepted {
                Ok(format!("Current limit set to {}A", amps))
            } else {
                Err(ChargewiseError::device(format!(
                    "Failed to set current: {}",
                    echoed.as_deref().unwrap_or("no value returned")
                )))
            }
        })
        .await
    }

    /// Set the energy limit; fractional watt-hours are truncated
    pub async fn set_energy_limit(&self, address: &str, energy_wh: f64) -> OperationResult<String> {
        ensure_address(address)?;
        if !energy_wh.is_finite() || energy_wh < 0.0 {
            return Err(ChargewiseError::validation(
                "energy_wh",
                format!("Energy limit must be a non-negative number, got {}", energy_wh),
            ));
        }
        let wh = truncate_wh(energy_wh);

        self.execute(address, SET_PATH, &[("dwo", wh.to_string())], |obj| {
            match field_content(obj, "dwo").as_deref() {
                Some("true") => Ok(format!("Energy limit set to {} Wh", wh)),
                other => Err(ChargewiseError::device(format!(
                    "Failed to set energy limit: {}",
                    other.unwrap_or("no value returned")
                ))),
            }
        })
        .await
    }

    /// Issue one GET and map every outcome into an `OperationResult`
    async fn execute<R, F>(
        &self,
        address: &str,
        path: &str,
        query: &[(&str, String)],
        interpret: F,
    ) -> OperationResult<R>
    where
        F: FnOnce(&Map<String, Value>) -> OperationResult<R>,
    {
        ensure_address(address)?;
        let url = build_url(address, path, query);
        let logger = self.logger.with_field("address", address.trim());
        logger.debug(&format!("GET {}", url));

        let response = if self.transport.enforces_timeouts() {
            self.transport.get(&url).await
        } else {
            tokio::time::timeout(self.timeout, self.transport.get(&url))
                .await
                .unwrap_or(Err(ChargewiseError::Timeout))
        };

        let result = match response {
            Ok(resp) if resp.status == 200 => {
                parse_object(&resp.body).and_then(|obj| interpret(&obj))
            }
            Ok(resp) => Err(ChargewiseError::http(resp.status)),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => logger.debug(&format!("{} succeeded", path)),
            Err(e) => logger.warn(&format!("{} failed: {}", path, e)),
        }
        result
    }
}

fn ensure_address(address: &str) -> Result<()> {
    if address.trim().is_empty() {
        return Err(ChargewiseError::EmptyAddress);
    }
    Ok(())
}

fn build_url(address: &str, path: &str, query: &[(&str, String)]) -> String {
    let params: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("http://{}{}?{}", address.trim(), path, params.join("&"))
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_wh(energy_wh: f64) -> i64 {
    energy_wh.trunc() as i64
}
