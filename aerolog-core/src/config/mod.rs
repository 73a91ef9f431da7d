//! Monitor configuration
//!
//! Settings come from a small TOML file embedded in the firmware image. The
//! build script validates it; at runtime it is read with a minimal line
//! parser that handles only the subset used by the monitor.

mod parse;
mod types;

pub use parse::{parse_config, ConfigError};
pub use types::*;
