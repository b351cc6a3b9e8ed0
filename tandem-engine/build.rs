//! Build script for tandem-engine
//!
//! Validates the embedded default configuration at compile time so a broken
//! `tandem.toml` never reaches a device.

use std::fs;
use std::path::Path;

use tandem_core::config::EngineConfig;

fn main() {
    validate_config();
}

/// Known keys per section
const ROOT_KEYS: &[&str] = &["role", "ack_pulses", "sync", "reactive", "link"];
const SYNC_KEYS: &[&str] = &["lead_ms"];
const REACTIVE_KEYS: &[&str] = &[
    "sensor_ceiling",
    "smoothing",
    "fire_threshold",
    "telemetry_threshold",
    "telemetry_interval_ms",
    "rediscovery_interval_ms",
    "idle_ms",
    "cadence_ms",
    "geiger_hit_ms",
    "geiger_miss_ms",
];
const LINK_KEYS: &[&str] = &["peer_timeout_ms"];

/// Validate tandem.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=tandem.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("tandem.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read tandem.toml", &[e.to_string()]),
    };

    let config: toml::Table = match content.parse() {
        Ok(table) => table,
        Err(e) => fail(
            "Invalid TOML syntax in tandem.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    check_keys("", &config, ROOT_KEYS, &mut errors);

    if let Some(role) = config.get("role") {
        match role.as_str() {
            Some("wrist") | Some("handheld") => {}
            _ => errors.push("role must be 'wrist' or 'handheld'".to_string()),
        }
    }

    for (section, keys) in [
        ("sync", SYNC_KEYS),
        ("reactive", REACTIVE_KEYS),
        ("link", LINK_KEYS),
    ] {
        match config.get(section) {
            Some(toml::Value::Table(table)) => {
                check_keys(section, table, keys, &mut errors);
                check_positive_integers(section, table, &mut errors);
            }
            Some(_) => errors.push(format!("[{}] must be a table", section)),
            None => {}
        }
    }

    // Ranges come from the engine's own validation
    if errors.is_empty() {
        match toml::from_str::<EngineConfig>(&content) {
            Ok(parsed) => {
                if let Err(e) = parsed.validate() {
                    errors.push(format!("{} (see EngineConfig::validate)", e));
                }
            }
            Err(e) => errors.extend(e.to_string().lines().map(str::to_string)),
        }
    }

    if !errors.is_empty() {
        fail("Invalid configuration in tandem.toml", &errors);
    }
}

/// Reject unknown keys
fn check_keys(section: &str, table: &toml::Table, known: &[&str], errors: &mut Vec<String>) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            if section.is_empty() {
                errors.push(format!("unknown key '{}'", key));
            } else {
                errors.push(format!("[{}] unknown key '{}'", section, key));
            }
        }
    }
}

/// Millisecond values must be positive
fn check_positive_integers(section: &str, table: &toml::Table, errors: &mut Vec<String>) {
    for (key, value) in table {
        if let toml::Value::Integer(v) = value {
            if *v <= 0 || *v > u32::MAX as i64 {
                errors.push(format!("[{}] {} must be a positive u32", section, key));
            }
        }
    }
}

fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| format!("║  • {:<62} ║", line))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
