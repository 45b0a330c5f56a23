//! Machine configuration
//!
//! Capacities are limits fixed when an arena or a machine is created; storage
//! grows on demand up to them. They can be set three ways:
//!
//! 1. In code, via [`MachineConfig::default`] and the `with_*` setters
//! 2. From the environment, via [`MachineConfig::from_env`]
//! 3. From a TOML file, via [`MachineConfig::load`]
//!
//! ## TOML Format
//!
//! ```toml
//! arena_capacity = 2048
//! stack_capacity = 1048576
//! variable_capacity = 64
//! trace = false
//! ```
//!
//! Every key is optional; missing keys keep their default. Values above
//! [`MAX_ARENA_CAPACITY`], [`MAX_STACK_CAPACITY`] or
//! [`MAX_VARIABLE_CAPACITY`] are rejected with [`ConfigError::Invalid`].

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::backend::term::Term;

/// Default number of terms a program may allocate
pub const DEFAULT_ARENA_CAPACITY: usize = 2048;
/// Default continuation stack depth (16 MiB of 16-byte frames)
pub const DEFAULT_STACK_CAPACITY: usize = 0x10_0000;
/// Default number of variable slots
pub const DEFAULT_VARIABLE_CAPACITY: usize = 64;

/// Term handles are 32-bit indices
pub const MAX_ARENA_CAPACITY: usize = u32::MAX as usize;
/// Largest frame count whose byte size fits in one allocation
pub const MAX_STACK_CAPACITY: usize = isize::MAX as usize / std::mem::size_of::<Term>();
/// Variable ids are 32-bit
pub const MAX_VARIABLE_CAPACITY: usize = u32::MAX as usize;

/// Capacities and switches for one machine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    /// Maximum number of terms in the arena
    pub arena_capacity: usize,
    /// Maximum number of continuation frames
    pub stack_capacity: usize,
    /// Number of variable slots
    pub variable_capacity: usize,
    /// Emit a trace event for every step
    pub trace: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            arena_capacity: DEFAULT_ARENA_CAPACITY,
            stack_capacity: DEFAULT_STACK_CAPACITY,
            variable_capacity: DEFAULT_VARIABLE_CAPACITY,
            trace: false,
        }
    }
}

impl MachineConfig {
    pub fn with_arena_capacity(mut self, capacity: usize) -> Self {
        self.arena_capacity = capacity;
        self
    }

    pub fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    pub fn with_variable_capacity(mut self, capacity: usize) -> Self {
        self.variable_capacity = capacity;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Defaults overridden by `IMP_ARENA_CAPACITY`, `IMP_STACK_CAPACITY`,
    /// `IMP_VARIABLE_CAPACITY` and `IMP_TRACE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env()
    }

    /// Apply the environment overrides on top of `self`.
    ///
    /// A capacity that is not a number, or that exceeds its ceiling, is an
    /// error.
    pub fn merge_env(mut self) -> Result<Self, ConfigError> {
        if let Some(n) = env_usize("IMP_ARENA_CAPACITY")? {
            self.arena_capacity = n;
        }
        if let Some(n) = env_usize("IMP_STACK_CAPACITY")? {
            self.stack_capacity = n;
        }
        if let Some(n) = env_usize("IMP_VARIABLE_CAPACITY")? {
            self.variable_capacity = n;
        }
        if let Ok(value) = std::env::var("IMP_TRACE") {
            self.trace = matches!(value.as_str(), "1" | "true" | "yes");
        }
        self.validate()?;
        Ok(self)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Check every capacity against its ceiling
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_limit("arena_capacity", self.arena_capacity, MAX_ARENA_CAPACITY)?;
        check_limit("stack_capacity", self.stack_capacity, MAX_STACK_CAPACITY)?;
        check_limit("variable_capacity", self.variable_capacity, MAX_VARIABLE_CAPACITY)
    }
}

fn check_limit(key: &str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::Invalid(format!(
            "{} = {} exceeds the maximum of {}",
            key, value, max
        )));
    }
    Ok(())
}

fn env_usize(key: &str) -> Result<Option<usize>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::Invalid(format!("{} = {:?}: {}", key, value, e))),
        Err(_) => Ok(None),
    }
}

/// Errors loading a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read
    Io(String),
    /// The file is not valid configuration TOML
    Parse(String),
    /// A value is out of range or not a number
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "Failed to read config: {}", msg),
            Self::Parse(msg) => write!(f, "Invalid config: {}", msg),
            Self::Invalid(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
