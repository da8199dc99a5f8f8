//! Battery energy model for Chargewise
//!
//! Computes how much grid energy is needed to move a battery from one
//! state-of-charge to another, accounting for state of health and charging
//! losses. Everything here is pure and has no failure path: degenerate ranges
//! clamp to zero.

use serde::{Deserialize, Serialize};

/// Lowest and highest valid state-of-charge in percent
pub const SOC_MIN: f64 = 0.0;
pub const SOC_MAX: f64 = 100.0;

/// Battery parameters supplied by the configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfiguration {
    /// Nominal usable capacity in kWh
    pub capacity_kwh: f64,

    /// State of health in percent (100 = no degradation)
    pub state_of_health_percent: f64,

    /// Extra energy drawn from the grid to cover charger and cable losses
    pub charge_loss_percent: f64,
}

impl BatteryConfiguration {
    /// Capacity left after degradation, never negative
    pub fn effective_capacity_kwh(&self) -> f64 {
        (self.capacity_kwh * self.state_of_health_percent / 100.0).max(0.0)
    }

    /// Multiplier applied to the energy stored in the battery
    pub fn loss_factor(&self) -> f64 {
        1.0 + self.charge_loss_percent / 100.0
    }
}

impl Default for BatteryConfiguration {
    fn default() -> Self {
        Self {
            capacity_kwh: 75.0,
            state_of_health_percent: 95.0,
            charge_loss_percent: 10.0,
        }
    }
}

/// Charge window from the current SOC to the target SOC, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocRange {
    pub from: f64,
    pub to: f64,
}

impl SocRange {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// Build a range with both bounds forced into [0, 100]
    pub fn clamped(from: f64, to: f64) -> Self {
        Self {
            from: clamp_soc(from),
            to: clamp_soc(to),
        }
    }

    /// Signed SOC difference; negative when the target is below the current level
    pub fn increase(&self) -> f64 {
        self.to - self.from
    }
}

/// Clamp a SOC value into [0, 100]; NaN becomes 0
pub fn clamp_soc(value: f64) -> f64 {
    if value.is_nan() {
        return SOC_MIN;
    }
    value.clamp(SOC_MIN, SOC_MAX)
}

/// Energy in kWh required to charge across `range`, including losses
pub fn required_energy_kwh(config: &BatteryConfiguration, range: SocRange) -> f64 {
    let base = config.effective_capacity_kwh() * range.increase() / 100.0;
    let with_losses = base * config.loss_factor();
    with_losses.max(0.0)
}

/// Round up to the next 0.1 kWh step
pub fn round_up_to_tenth_kwh(kwh: f64) -> f64 {
    (kwh * 10.0).ceil() / 10.0
}

pub fn kwh_to_wh(kwh: f64) -> f64 {
    kwh * 1000.0
}

/// Summary of a charge calculation as presented to the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeEstimate {
    /// Requested SOC change in percentage points (may be negative)
    pub soc_increase: f64,

    /// Exact energy required in kWh
    pub energy_kwh: f64,

    /// Energy limit to push to a charger, rounded up to 0.1 kWh
    pub limit_kwh: f64,

    /// Same limit in Wh
    pub limit_wh: f64,
}

impl ChargeEstimate {
    pub fn compute(config: &BatteryConfiguration, range: SocRange) -> Self {
        let energy_kwh = required_energy_kwh(config, range);
        let limit_kwh = round_up_to_tenth_kwh(energy_kwh);
        Self {
            soc_increase: range.increase(),
            energy_kwh,
            limit_kwh,
            // limit_kwh is a whole number of tenths; drop float noise before truncation
            limit_wh: kwh_to_wh(limit_kwh).round(),
        }
    }

    pub fn needs_charge(&self) -> bool {
        self.soc_increase > 0.0
    }
}

/// Quick target SOC presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocPreset {
    /// Everyday charging, easy on the battery
    Daily,
    TopUp,
    RoadTrip,
}

impl SocPreset {
    pub fn target_soc(self) -> f64 {
        match self {
            Self::Daily => 80.0,
            Self::TopUp => 90.0,
            Self::RoadTrip => 100.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily 80%",
            Self::TopUp => "Top Up 90%",
            Self::RoadTrip => "Road Trip 100%",
        }
    }
}
