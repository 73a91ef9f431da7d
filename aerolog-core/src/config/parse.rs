//! Minimal TOML reader for `monitor.toml`
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` pairs with integer, hex integer, boolean or string values
//! - Comments (`# ...`), full-line and trailing
//!
//! Anything else is an error. Keys missing from the file keep their defaults.

use super::types::{MonitorConfig, DEBOUNCE_RANGE_MS, MAX_POLL_INTERVAL_MS, MIN_POLL_INTERVAL_MS};
use crate::screen::ScreenKind;

/// Configuration parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type or does not parse
    InvalidValue,
    /// Value outside its allowed range
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Sampling,
    Display,
    Input,
}

/// Parse a configuration file, starting from the defaults
pub fn parse_config(input: &str) -> Result<MonitorConfig, ConfigError> {
    let mut config = MonitorConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "sampling" => Ok(Section::Sampling),
        "display" => Ok(Section::Display),
        "input" => Ok(Section::Input),
        _ => Err(ConfigError::InvalidSection),
    }
}

fn apply_value(
    config: &mut MonitorConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Sampling, "poll_interval_ms") => {
            config.poll_interval_ms =
                in_range(parse_int(value)?, MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS)?;
        }
        (Section::Sampling, "log_every") => {
            config.log_every = in_range(parse_int(value)?, 1..=u16::MAX)?;
        }
        (Section::Sampling, "co2_auto_calibration") => {
            config.co2_auto_calibration = parse_bool(value)?;
        }
        (Section::Display, "contrast") => {
            config.contrast = parse_int(value)?;
        }
        (Section::Display, "start_screen") => {
            config.start_screen = match parse_string(value)? {
                "main" => ScreenKind::Main,
                "chart" => ScreenKind::Chart,
                _ => return Err(ConfigError::InvalidValue),
            };
        }
        (Section::Input, "debounce_ms") => {
            config.debounce_ms = in_range(parse_int(value)?, DEBOUNCE_RANGE_MS)?;
        }
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) if line[..pos].matches('"').count() % 2 == 0 => &line[..pos],
        _ => line,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Quoted string value
fn parse_string(value: &str) -> Result<&str, ConfigError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ConfigError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Decimal or `0x` hex integer, `_` separators allowed
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ConfigError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ConfigError::InvalidValue)?;
    }

    let parsed = match digits.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse::<u64>(),
    }
    .map_err(|_| ConfigError::InvalidValue)?;

    T::try_from(parsed).map_err(|_| ConfigError::OutOfRange)
}

fn in_range<T: PartialOrd>(value: T, range: core::ops::RangeInclusive<T>) -> Result<T, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange)
    }
}
