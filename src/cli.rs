//! Command line front end: argument parsing and command handlers.

use anyhow::{Result, bail};
use chargewise::charger::{ChargerClient, ChargerStatus};
use chargewise::config::Config;
use chargewise::energy::{ChargeEstimate, SocPreset};
use chargewise::persistence::PersistenceManager;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version = env!("APP_VERSION"), about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// YAML configuration file
    #[arg(long, global = true, env = "CHARGEWISE_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON state file, overrides `state_file` from the configuration
    #[arg(long, global = true, env = "CHARGEWISE_STATE")]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Calculate the energy needed to charge from the current to the target SOC.
    Calc(CalcArgs),

    /// Set the target SOC to a preset.
    Preset {
        #[arg(value_enum)]
        preset: PresetArg,
    },

    /// Update the battery parameters and save the configuration.
    Battery(BatteryArgs),

    /// Talk to the go-eCharger.
    Charger(ChargerArgs),
}

#[derive(ClapArgs)]
pub struct CalcArgs {
    /// Current state of charge in percent
    #[arg(long)]
    pub from: Option<f64>,

    /// Target state of charge in percent
    #[arg(long)]
    pub to: Option<f64>,
}

#[derive(ClapArgs)]
pub struct BatteryArgs {
    /// Nominal battery capacity in kWh (10-200)
    #[arg(long)]
    pub capacity: Option<f64>,

    /// State of health in percent (50-100)
    #[arg(long)]
    pub soh: Option<f64>,

    /// Charging losses in percent (5-25)
    #[arg(long)]
    pub loss: Option<f64>,
}

#[derive(ClapArgs)]
pub struct ChargerArgs {
    /// Charger address, overrides `charger.address` from the configuration
    #[arg(long, global = true)]
    pub address: Option<String>,

    #[command(subcommand)]
    pub command: ChargerCommand,
}

#[derive(Subcommand)]
pub enum ChargerCommand {
    /// Check that the charger answers and remember the result.
    Test,

    /// Show the charger status.
    Status,

    /// Set the charging current limit.
    SetCurrent {
        /// Current in ampere
        amps: u32,
    },

    /// Push the energy limit for the stored SOC range to the charger.
    PushLimit,
}

#[derive(Copy, Clone, ValueEnum)]
pub enum PresetArg {
    Daily,
    TopUp,
    RoadTrip,
}

impl From<PresetArg> for SocPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Daily => Self::Daily,
            PresetArg::TopUp => Self::TopUp,
            PresetArg::RoadTrip => Self::RoadTrip,
        }
    }
}

/// Everything a command handler needs
pub struct App {
    pub config: Config,
    pub config_path: PathBuf,
    pub state: PersistenceManager,
}

impl App {
    pub async fn run(mut self, command: Command) -> Result<()> {
        match command {
            Command::Calc(args) => self.calc(&args),
            Command::Preset { preset } => self.preset(preset.into()),
            Command::Battery(args) => self.battery(&args),
            Command::Charger(args) => self.charger(args).await,
        }
    }

    fn calc(&mut self, args: &CalcArgs) -> Result<()> {
        if let Some(from) = args.from {
            self.state.set_current_soc(from);
        }
        if let Some(to) = args.to {
            self.state.set_target_soc(to);
        }
        self.state.save()?;

        let range = self.state.state().soc_range();
        let estimate = ChargeEstimate::compute(&self.config.battery, range);
        println!(
            "SOC: {:.0}% -> {:.0}% ({:+.0}%)",
            range.from, range.to, estimate.soc_increase
        );
        if !estimate.needs_charge() {
            println!("Target SOC must be higher than the current SOC");
            return Ok(());
        }
        println!(
            "Effective capacity: {:.2} kWh",
            self.config.battery.effective_capacity_kwh()
        );
        println!("Energy needed: {:.2} kWh", estimate.energy_kwh);
        println!(
            "Energy limit: {:.1} kWh ({:.0} Wh)",
            estimate.limit_kwh, estimate.limit_wh
        );
        Ok(())
    }

    fn preset(&mut self, preset: SocPreset) -> Result<()> {
        self.state.apply_preset(preset);
        self.state.save()?;
        println!("Target SOC set to {}", preset.label());
        Ok(())
    }

    fn battery(&mut self, args: &BatteryArgs) -> Result<()> {
        let battery = &mut self.config.battery;
        if let Some(capacity) = args.capacity {
            battery.capacity_kwh = capacity;
        }
        if let Some(soh) = args.soh {
            battery.state_of_health_percent = soh;
        }
        if let Some(loss) = args.loss {
            battery.charge_loss_percent = loss;
        }
        self.config.validate()?;
        self.config.save_to_file(&self.config_path)?;

        let battery = &self.config.battery;
        println!("Battery capacity: {:.1} kWh", battery.capacity_kwh);
        println!("State of health: {:.1}%", battery.state_of_health_percent);
        println!("Charge losses: {:.1}%", battery.charge_loss_percent);
        println!(
            "Effective capacity: {:.2} kWh",
            battery.effective_capacity_kwh()
        );
        println!("Saved to {}", self.config_path.display());
        Ok(())
    }

    async fn charger(&mut self, args: ChargerArgs) -> Result<()> {
        let address = args
            .address
            .unwrap_or_else(|| self.config.charger.address.clone());
        let client = ChargerClient::new()?;

        match args.command {
            ChargerCommand::Test => {
                let outcome = client.test_connection(&address).await;
                self.state.record_connection(&address, &outcome);
                self.state.save()?;
                println!("{}", self.state.state().connection_status);
                outcome?;
            }
            ChargerCommand::Status => {
                let status = client.get_status(&address).await?;
                print_status(&status);
            }
            ChargerCommand::SetCurrent { amps } => {
                println!("{}", client.set_current_limit(&address, amps).await?);
            }
            ChargerCommand::PushLimit => {
                if !self.config.charger.enabled {
                    bail!("Charger control is disabled in the configuration");
                }
                if !self.state.is_charger_connected() {
                    bail!("Charger not connected; run `chargewise charger test` first");
                }
                if !self.state.is_charger_connected_to(&address) {
                    bail!(
                        "Last connection test was against '{}', not '{}'; run `chargewise charger test` first",
                        self.state.state().connection_address,
                        address.trim()
                    );
                }
                let estimate =
                    ChargeEstimate::compute(&self.config.battery, self.state.state().soc_range());
                if !estimate.needs_charge() {
                    bail!("Target SOC must be higher than the current SOC");
                }
                println!(
                    "Energy limit: {:.1} kWh ({:.0} Wh)",
                    estimate.limit_kwh, estimate.limit_wh
                );
                client.set_energy_limit(&address, estimate.limit_wh).await?;
                println!("✓ Energy limit set successfully");
            }
        }
        Ok(())
    }
}

fn print_status(status: &ChargerStatus) {
    let car_code = status
        .car_code
        .map_or_else(|| "n/a".to_string(), |c| c.to_string());
    println!("Car state: {} ({})", status.car_state, car_code);
    println!("Current: {}", optional(status.current_ampere, "A"));
    println!("Current limit: {}", optional(status.current_limit_ampere, "A"));
    println!(
        "Charging allowed: {}",
        status
            .allow_charging
            .map_or("n/a", |allowed| if allowed { "yes" } else { "no" })
    );
    println!(
        "Energy limit: {}",
        status
            .energy_limit_wh
            .map_or_else(|| "n/a".to_string(), |wh| format!("{:.0} Wh", wh))
    );
}

fn optional<T: std::fmt::Display>(value: Option<T>, unit: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{}{}", v, unit))
}
