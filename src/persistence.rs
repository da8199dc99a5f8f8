//! Persistence layer for user state
//!
//! This module saves and loads the values the user last worked with: the
//! current and target state-of-charge, and the outcome of the most recent
//! charger connection test.

use crate::charger::OperationResult;
use crate::energy::{SocPreset, SocRange, clamp_soc};
use crate::error::Result;
use crate::logging::get_logger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix marking a successful connection test
pub const CONNECTED_MARK: char = '✓';

/// Prefix marking a failed connection test
pub const FAILED_MARK: char = '✗';

/// Persistent state structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistentState {
    /// Last entered current SOC in percent
    pub current_soc: f64,

    /// Last entered target SOC in percent
    pub target_soc: f64,

    /// Display text of the last connection test, empty if never tested
    pub connection_status: String,

    /// Charger address the last connection test ran against
    pub connection_address: String,

    /// When the last connection test finished
    pub connection_checked_at: Option<DateTime<Utc>>,
}

impl PersistentState {
    pub fn soc_range(&self) -> SocRange {
        SocRange::clamped(self.current_soc, self.target_soc)
    }
}

impl Default for PersistentState {
    fn default() -> Self {
        Self {
            current_soc: 20.0,
            target_soc: 80.0,
            connection_status: String::new(),
            connection_address: String::new(),
            connection_checked_at: None,
        }
    }
}

/// Persistence manager
pub struct PersistenceManager {
    file_path: PathBuf,
    state: PersistentState,
    logger: crate::logging::StructuredLogger,
}

impl PersistenceManager {
    /// Create a new persistence manager
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        let logger = get_logger("persistence");
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            state: PersistentState::default(),
            logger,
        }
    }

    /// Load state from disk
    pub fn load(&mut self) -> Result<()> {
        if !self.file_path.exists() {
            self.logger
                .info("No persistent state file found, using defaults");
            return Ok(());
        }

        let contents = std::fs::read_to_string(&self.file_path)?;
        self.state = serde_json::from_str(&contents)?;
        self.state.current_soc = clamp_soc(self.state.current_soc);
        self.state.target_soc = clamp_soc(self.state.target_soc);
        self.logger.info("Loaded persistent state from disk");

        Ok(())
    }

    /// Save state to disk
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(&self.file_path, contents)?;
        self.logger.debug("Saved persistent state to disk");

        Ok(())
    }

    pub fn state(&self) -> &PersistentState {
        &self.state
    }

    pub fn set_current_soc(&mut self, soc: f64) {
        self.state.current_soc = clamp_soc(soc);
    }

    pub fn set_target_soc(&mut self, soc: f64) {
        self.state.target_soc = clamp_soc(soc);
    }

    /// Move the target SOC to a preset value
    pub fn apply_preset(&mut self, preset: SocPreset) {
        self.set_target_soc(preset.target_soc());
        self.logger
            .info(&format!("Target SOC set by preset {}", preset.label()));
    }

    /// Record the outcome of a connection test against `address` as display text
    pub fn record_connection(&mut self, address: &str, outcome: &OperationResult<String>) {
        self.state.connection_status = match outcome {
            Ok(message) => format!("{} {}", CONNECTED_MARK, message),
            Err(e) => format!("{} {}", FAILED_MARK, e),
        };
        self.state.connection_address = address.trim().to_string();
        self.state.connection_checked_at = Some(Utc::now());
    }

    /// Whether the last connection test succeeded
    pub fn is_charger_connected(&self) -> bool {
        self.state.connection_status.starts_with(CONNECTED_MARK)
    }

    /// Whether the last connection test succeeded against this same address
    pub fn is_charger_connected_to(&self, address: &str) -> bool {
        self.is_charger_connected() && self.state.connection_address == address.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChargewiseError;

    #[test]
    fn setters_clamp_soc() {
        let mut mgr = PersistenceManager::new("unused.json");
        mgr.set_current_soc(-3.0);
        mgr.set_target_soc(120.0);
        assert_eq!(mgr.state().soc_range(), SocRange::new(0.0, 100.0));
    }

    #[test]
    fn connection_status_marks() {
        let mut mgr = PersistenceManager::new("unused.json");
        assert!(!mgr.is_charger_connected());

        mgr.record_connection("192.168.1.50", &Ok("Connected to go-eCharger".to_string()));
        assert_eq!(mgr.state().connection_status, "✓ Connected to go-eCharger");
        assert!(mgr.is_charger_connected());
        assert!(mgr.state().connection_checked_at.is_some());

        mgr.record_connection("192.168.1.50", &Err(ChargewiseError::Timeout));
        assert_eq!(
            mgr.state().connection_status,
            "✗ Connection timeout - charger not responding"
        );
        assert!(!mgr.is_charger_connected());
    }

    #[test]
    fn connection_is_tied_to_tested_address() {
        let mut mgr = PersistenceManager::new("unused.json");
        mgr.record_connection(" 192.168.1.50 ", &Ok("Connected successfully".to_string()));
        assert_eq!(mgr.state().connection_address, "192.168.1.50");
        assert!(mgr.is_charger_connected_to("192.168.1.50"));
        assert!(mgr.is_charger_connected_to("192.168.1.50  "));
        assert!(!mgr.is_charger_connected_to("192.168.1.51"));

        mgr.record_connection("192.168.1.50", &Err(ChargewiseError::ConnectionRefused));
        assert!(!mgr.is_charger_connected_to("192.168.1.50"));
    }

    #[test]
    fn preset_sets_target() {
        let mut mgr = PersistenceManager::new("unused.json");
        mgr.apply_preset(SocPreset::TopUp);
        assert_eq!(mgr.state().target_soc, 90.0);
    }
}
