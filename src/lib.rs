//! ANSI/VT control sequence decoder
//!
//! Incrementally parses text interleaved with control sequences into a
//! stream of typed [`Element`]s. Each element carries its decoded parameters
//! and the exact text it came from, so the decomposition is lossless:
//!
//! - `element`: Element kinds, parameters and keywords
//! - `parser`: Resumable state machine and dispatch tables
//! - `config`: Parser configuration
//! - `error`: Error types
//!
//! This is a decoder, not a terminal emulator: no screen state is kept.

pub mod config;
pub mod element;
pub mod error;
pub mod parser;

pub use config::{ConfigError, ParserConfig};
pub use element::{keywords, Arity, Element, ElementKind, EraseHow, Keyword, Keywords};
pub use error::{CodeClass, Error, Limit, Result};
pub use parser::{Feed, Parser};
