//! CLI failures and the exit code each one maps to.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | success |
//! | 2    | argument parse error, reported by clap before `run` starts |
//! | 10   | field error: unknown engine, bad dimensions, bad color, zero particles |
//! | 11   | reading a scene file or writing the PNG failed |
//! | 12   | malformed flag value or `--params` / scene JSON |
//! | 13   | JSON output could not be produced |

use std::fmt;

use hero_field_core::FieldError;

pub const EXIT_FIELD: i32 = 10;
pub const EXIT_IO: i32 = 11;
pub const EXIT_INPUT: i32 = 12;
pub const EXIT_SERIALIZATION: i32 = 13;

#[derive(Debug)]
pub enum CliError {
    /// Rejected by an engine, the canvas or a scene check.
    Field(FieldError),
    Io(String),
    /// The user handed us something we cannot interpret.
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Field(_) => EXIT_FIELD,
            CliError::Io(_) => EXIT_IO,
            CliError::Input(_) => EXIT_INPUT,
            CliError::Serialization(_) => EXIT_SERIALIZATION,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Field(e) => e.fmt(f),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

/// `FieldError::Io` comes from snapshot writes and keeps the I/O exit code.
impl From<FieldError> for CliError {
    fn from(e: FieldError) -> Self {
        if let FieldError::Io(msg) = e {
            CliError::Io(msg)
        } else {
            CliError::Field(e)
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
