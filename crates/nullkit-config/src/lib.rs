// crates/nullkit-config/src/lib.rs
// ============================================================================
// Module: Nullkit Config
// Description: Canonical application configuration model and validation.
// Purpose: Load, validate, and slice configuration for component factories.
// Dependencies: nullkit-wrappers, serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! A Nullkit application is configured by one TOML document whose sections
//! map one-to-one onto component config slices: a top-level factory passes
//! `config.http` to the HTTP wrapper, `config.store` to the store wrapper,
//! and so on. Every field has a documented default, so the empty document
//! (and the absent file) yields a fully usable configuration.
//!
//! Invariants:
//! - Input handling is strict and fail-closed: oversized paths or files,
//!   non-UTF-8 bytes, and unknown fields are all rejected.
//! - Validation happens after parsing; a config that loads is a config
//!   every factory will accept.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use nullkit_wrappers::ClockWrapperConfig;
use nullkit_wrappers::HttpWrapperConfig;
use nullkit_wrappers::StoreWrapperConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted config path length in bytes.
const MAX_PATH_BYTES: usize = 4096;

/// Maximum accepted path component length in bytes.
const MAX_COMPONENT_BYTES: usize = 255;

/// Maximum accepted config file size in bytes.
const MAX_FILE_BYTES: usize = 1_048_576;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// The config path exceeds the accepted length.
    #[error("config path exceeds max length ({actual} > {max})")]
    PathTooLong {
        /// Maximum accepted bytes.
        max: usize,
        /// Observed path length in bytes.
        actual: usize,
    },
    /// A config path component exceeds the accepted length.
    #[error("config path component too long")]
    PathComponentTooLong,
    /// The config file exceeds the accepted size.
    #[error("config file exceeds size limit ({actual} > {max})")]
    FileTooLarge {
        /// Maximum accepted bytes.
        max: usize,
        /// Observed file size in bytes.
        actual: usize,
    },
    /// The config file is not valid UTF-8.
    #[error("config file must be utf-8")]
    NotUtf8,
    /// The config document failed to parse.
    #[error("config parse error: {0}")]
    Parse(String),
    /// A parsed field failed semantic validation.
    #[error("invalid config field {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Validation failure detail.
        reason: String,
    },
}

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Canonical application configuration.
///
/// # Invariants
/// - Sections map one-to-one onto component config slices.
/// - The all-defaults document passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NullkitConfig {
    /// HTTP wrapper configuration slice.
    pub http: HttpWrapperConfig,
    /// File store wrapper configuration slice.
    pub store: StoreWrapperConfig,
    /// Clock wrapper configuration slice.
    pub clock: ClockWrapperConfig,
}

impl NullkitConfig {
    /// Loads configuration from the given path, or defaults when absent.
    ///
    /// Passing `None` yields the all-defaults configuration without
    /// touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path or file violates a load guard,
    /// the document fails to parse, or validation rejects a field.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };
        check_path(path)?;
        let metadata = fs::metadata(path).map_err(|error| ConfigError::Io(error.to_string()))?;
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > MAX_FILE_BYTES {
            return Err(ConfigError::FileTooLarge {
                max: MAX_FILE_BYTES,
                actual: size,
            });
        }
        let bytes = fs::read(path).map_err(|error| ConfigError::Io(error.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document fails to parse or
    /// validation rejects a field.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|error| ConfigError::Parse(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the parsed configuration against factory requirements.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first rejected field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = Url::parse(&self.http.endpoint).map_err(|error| ConfigError::Invalid {
            field: "http.endpoint",
            reason: error.to_string(),
        })?;
        match endpoint.scheme() {
            "https" => {}
            "http" if self.http.allow_http => {}
            "http" => {
                return Err(ConfigError::Invalid {
                    field: "http.endpoint",
                    reason: "cleartext http requires http.allow_http".to_string(),
                });
            }
            other => {
                return Err(ConfigError::Invalid {
                    field: "http.endpoint",
                    reason: format!("unsupported scheme: {other}"),
                });
            }
        }
        if self.http.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "http.timeout_ms",
                reason: "timeout must be non-zero".to_string(),
            });
        }
        if self.http.max_response_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "http.max_response_bytes",
                reason: "response cap must be non-zero".to_string(),
            });
        }
        if self.store.root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "store.root",
                reason: "store root must not be empty".to_string(),
            });
        }
        if self.store.max_value_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "store.max_value_bytes",
                reason: "document cap must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Applies the fail-closed path guards.
fn check_path(path: &Path) -> Result<(), ConfigError> {
    let length = path.as_os_str().len();
    if length > MAX_PATH_BYTES {
        return Err(ConfigError::PathTooLong {
            max: MAX_PATH_BYTES,
            actual: length,
        });
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_COMPONENT_BYTES {
            return Err(ConfigError::PathComponentTooLong);
        }
    }
    Ok(())
}
