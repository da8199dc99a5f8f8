use super::*;

impl Default for ChargerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: Some("WARN".to_string()),
            file_level: None,
            file: "/tmp/chargewise.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            battery: BatteryConfiguration::default(),
            charger: ChargerConfig::default(),
            logging: LoggingConfig::default(),
            state_file: "chargewise_state.json".to_string(),
        }
    }
}
