//! Error types for element construction and parsing

use thiserror::Error;

use crate::element::{Arity, ElementKind};

/// Per-sequence limit that the parser enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Characters in an OSC payload
    OscPayload,
    /// Positional parameters in a CSI sequence
    CsiParameters,
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::OscPayload => f.write_str("OSC payload length"),
            Limit::CsiParameters => f.write_str("CSI parameter count"),
        }
    }
}

/// Sequence class a lookup was performed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeClass {
    Control,
    Escape,
    Csi,
    Osc,
    Sharp,
    Percent,
}

/// Crate error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A fixed-signature element was built with the wrong number of parameters
    #[error("{kind:?} expects {expected} parameter(s), got {found}")]
    InvalidArity {
        kind: ElementKind,
        expected: Arity,
        found: usize,
    },

    /// A well-formed sequence names no known command
    #[error("unrecognized {class:?} code {code:?}")]
    UnrecognizedCode { class: CodeClass, code: String },

    /// The parser hit a fault and has been reset to text mode
    #[error("{limit} exceeded the limit of {max}; parser state was reset")]
    TransientFault { limit: Limit, max: usize },
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
