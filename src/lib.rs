//! # Chargewise - EV charge energy estimator
//!
//! Estimates how much energy an electric vehicle needs to charge from its
//! current state-of-charge to a target, accounting for battery degradation
//! and charging losses, and pushes the resulting energy limit to a
//! go-eCharger on the local network.
//!
//! ## Architecture
//!
//! - `energy`: Battery energy model (pure calculation, no I/O)
//! - `charger`: go-eCharger HTTP client with a typed failure taxonomy
//! - `config`: YAML configuration with validation
//! - `persistence`: Last-used SOC values and connection status
//! - `logging`: Structured logging and tracing
//! - `error`: Error types shared by all modules
//!
//! The energy model and the charger client do not depend on each other; the
//! `chargewise` binary composes them.

pub mod charger;
pub mod config;
pub mod energy;
pub mod error;
pub mod logging;
pub mod persistence;

// Re-export commonly used types
pub use charger::{ChargerClient, ChargerStatus, OperationResult};
pub use config::Config;
pub use energy::{BatteryConfiguration, ChargeEstimate, SocRange, required_energy_kwh};
pub use error::{ChargewiseError, Result};
