//! Escape sequence parser
//!
//! A stateful parser that decomposes text into [`Element`](crate::Element)s.
//! Input may arrive in chunks split at any point; partial sequences are kept
//! until the rest arrives.

mod state;
pub mod tables;

pub use state::{Feed, Parser};
