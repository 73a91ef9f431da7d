//! Build script for aerolog-firmware
//!
//! - Passes the linker scripts (memory.x comes from embassy-stm32)
//! - Validates monitor.toml at compile time

use std::fs;
use std::path::Path;

fn main() {
    setup_linker();
    validate_config();
}

/// Linker arguments for cortex-m-rt and defmt
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate monitor.toml at compile time
///
/// Mirrors the runtime reader's sections, keys and ranges.
fn validate_config() {
    println!("cargo:rerun-if-changed=monitor.toml");

    let config_path = Path::new("monitor.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: monitor.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds monitor.toml at build time.                 ║\n\
            ║  Please create one in the aerolog-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read monitor.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in monitor.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_sampling(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_input(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid monitor configuration                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=monitor.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only the known sections, and no keys outside them
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        match (name.as_str(), value) {
            ("sampling" | "display" | "input", toml::Value::Table(_)) => {}
            ("sampling" | "display" | "input", _) => {
                errors.push(format!("[{}] must be a table", name));
            }
            (_, toml::Value::Table(_)) => errors.push(format!("unknown section [{}]", name)),
            _ => errors.push(format!("'{}' must be inside a section", name)),
        }
    }
}

fn validate_sampling(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(sampling) = config.get("sampling").and_then(|s| s.as_table()) else {
        return;
    };

    for key in sampling.keys() {
        if !["poll_interval_ms", "log_every", "co2_auto_calibration"].contains(&key.as_str()) {
            errors.push(format!("[sampling] unknown key '{}'", key));
        }
    }

    check_int(sampling.get("poll_interval_ms"), 2_000, 600_000, "[sampling] poll_interval_ms", errors);
    check_int(sampling.get("log_every"), 1, 65_535, "[sampling] log_every", errors);

    match sampling.get("co2_auto_calibration") {
        None | Some(toml::Value::Boolean(_)) => {}
        Some(_) => errors.push("[sampling] co2_auto_calibration must be true or false".to_string()),
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display").and_then(|d| d.as_table()) else {
        return;
    };

    for key in display.keys() {
        if !["contrast", "start_screen"].contains(&key.as_str()) {
            errors.push(format!("[display] unknown key '{}'", key));
        }
    }

    check_int(display.get("contrast"), 0, 255, "[display] contrast", errors);

    match display.get("start_screen") {
        None => {}
        Some(toml::Value::String(screen)) if ["main", "chart"].contains(&screen.as_str()) => {}
        Some(_) => errors.push("[display] start_screen must be 'main' or 'chart'".to_string()),
    }
}

fn validate_input(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(input) = config.get("input").and_then(|i| i.as_table()) else {
        return;
    };

    for key in input.keys() {
        if key != "debounce_ms" {
            errors.push(format!("[input] unknown key '{}'", key));
        }
    }

    check_int(input.get("debounce_ms"), 1, 500, "[input] debounce_ms", errors);
}

/// Optional integer within `min..=max`
fn check_int(value: Option<&toml::Value>, min: i64, max: i64, name: &str, errors: &mut Vec<String>) {
    match value {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => errors.push(format!("{} must be {}-{}", name, min, max)),
        Some(_) => errors.push(format!("{} must be an integer", name)),
    }
}
