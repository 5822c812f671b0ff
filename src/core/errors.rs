//! VGL-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::PathBuf;

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, VigilError>;

/// Top-level error type for vigil.
#[derive(Debug, Error)]
pub enum VigilError {
    #[error("[VGL-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[VGL-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[VGL-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[VGL-1101] unsupported platform: {details}")]
    UnsupportedPlatform { details: String },

    #[error("[VGL-2001] failed to spawn shell: {details}")]
    Spawn { details: String },

    #[error("[VGL-2002] capture channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[VGL-3001] capture buffer allocation failed ({bytes} bytes)")]
    BufferAlloc { bytes: usize },

    #[error("[VGL-3002] terminal failure: {details}")]
    Terminal { details: String },

    #[error("[VGL-3003] IO failure in {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("[VGL-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl VigilError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "VGL-1001",
            Self::MissingConfig { .. } => "VGL-1002",
            Self::ConfigParse { .. } => "VGL-1003",
            Self::UnsupportedPlatform { .. } => "VGL-1101",
            Self::Spawn { .. } => "VGL-2001",
            Self::ChannelClosed { .. } => "VGL-2002",
            Self::BufferAlloc { .. } => "VGL-3001",
            Self::Terminal { .. } => "VGL-3002",
            Self::Io { .. } => "VGL-3003",
            Self::Runtime { .. } => "VGL-3900",
        }
    }

    /// Process exit status for this error: 2 for usage/configuration
    /// problems, 1 for everything else.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig { .. } | Self::MissingConfig { .. } | Self::ConfigParse { .. } => 2,
            _ => 1,
        }
    }

    /// Convenience constructor for IO errors with a known context.
    #[must_use]
    pub const fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}

impl From<toml::de::Error> for VigilError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for VigilError {
    fn from(value: serde_json::Error) -> Self {
        Self::Runtime {
            details: format!("serde_json: {value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_errors() -> Vec<VigilError> {
        vec![
            VigilError::InvalidConfig {
                details: String::new(),
            },
            VigilError::MissingConfig {
                path: PathBuf::new(),
            },
            VigilError::ConfigParse {
                context: "",
                details: String::new(),
            },
            VigilError::UnsupportedPlatform {
                details: String::new(),
            },
            VigilError::Spawn {
                details: String::new(),
            },
            VigilError::ChannelClosed { component: "" },
            VigilError::BufferAlloc { bytes: 0 },
            VigilError::Terminal {
                details: String::new(),
            },
            VigilError::Io {
                context: "",
                source: std::io::Error::other("test"),
            },
            VigilError::Runtime {
                details: String::new(),
            },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let codes: Vec<&str> = all_errors().iter().map(VigilError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn error_codes_have_vgl_prefix() {
        for err in &all_errors() {
            assert!(
                err.code().starts_with("VGL-"),
                "code {} must start with VGL-",
                err.code()
            );
        }
    }

    #[test]
    fn error_display_includes_code() {
        let err = VigilError::InvalidConfig {
            details: "interval out of range".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("VGL-1001"), "display should contain code: {msg}");
        assert!(
            msg.contains("interval out of range"),
            "display should contain details: {msg}"
        );
    }

    #[test]
    fn config_errors_exit_with_usage_status() {
        assert_eq!(
            VigilError::InvalidConfig {
                details: String::new()
            }
            .exit_code(),
            2
        );
        assert_eq!(
            VigilError::MissingConfig {
                path: PathBuf::new()
            }
            .exit_code(),
            2
        );
        assert_eq!(VigilError::BufferAlloc { bytes: 16 }.exit_code(), 1);
        assert_eq!(
            VigilError::Terminal {
                details: String::new()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: VigilError = toml_err.into();
        assert_eq!(err.code(), "VGL-1003");
    }
}
