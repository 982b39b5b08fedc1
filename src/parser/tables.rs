//! Control characters and dispatch tables
//!
//! The catalog of recognized sequences is closed; each table maps the
//! character that selects a command to the element kind it produces.

use crate::element::ElementKind;
use crate::error::{CodeClass, Error, Result};

pub const NUL: char = '\x00';
pub const BEL: char = '\x07';
pub const BS: char = '\x08';
pub const HT: char = '\x09';
pub const LF: char = '\x0a';
pub const VT: char = '\x0b';
pub const FF: char = '\x0c';
pub const CR: char = '\x0d';
pub const SO: char = '\x0e';
pub const SI: char = '\x0f';
pub const CAN: char = '\x18';
pub const SUB: char = '\x1a';
pub const ESC: char = '\x1b';
pub const DEL: char = '\x7f';
/// 8-bit Control Sequence Introducer
pub const CSI_C1: char = '\u{9b}';
/// 8-bit String Terminator
pub const ST_C1: char = '\u{9c}';
/// 8-bit Operating System Command
pub const OSC_C1: char = '\u{9d}';

/// C0 controls that need no arguments
pub const BASIC: &[(char, ElementKind)] = &[
    (BEL, ElementKind::Bell),
    (BS, ElementKind::Backspace),
    (HT, ElementKind::Tab),
    (LF, ElementKind::LineFeed),
    (VT, ElementKind::LineFeed),
    (FF, ElementKind::LineFeed),
    (CR, ElementKind::CarriageReturn),
    (SO, ElementKind::ShiftOut),
    (SI, ElementKind::ShiftIn),
];

/// Non-CSI escape sequences - `ESC <c>`
pub const ESCAPE: &[(char, ElementKind)] = &[
    ('c', ElementKind::Reset),
    ('D', ElementKind::Index),
    ('E', ElementKind::LineFeed),
    ('M', ElementKind::ReverseIndex),
    ('H', ElementKind::SetTabStop),
    ('7', ElementKind::SaveCursor),
    ('8', ElementKind::RestoreCursor),
];

/// "Sharp" escape sequences - `ESC # <c>`
pub const SHARP: &[(char, ElementKind)] = &[('8', ElementKind::AlignmentDisplay)];

/// "Percent" escape sequences - `ESC % <c>`
pub const PERCENT: &[(char, ElementKind)] = &[
    ('8', ElementKind::EnableUtf8Mode),
    ('G', ElementKind::EnableUtf8Mode),
    ('@', ElementKind::DisableUtf8Mode),
];

/// CSI sequences - `CSI P1;P2;...;Pn <c>`
pub const CSI: &[(char, ElementKind)] = &[
    ('@', ElementKind::InsertCharacters),
    ('A', ElementKind::CursorUp),
    ('B', ElementKind::CursorDown),
    ('C', ElementKind::CursorForward),
    ('D', ElementKind::CursorBack),
    ('E', ElementKind::CursorDown1),
    ('F', ElementKind::CursorUp1),
    ('G', ElementKind::CursorToColumn),
    ('H', ElementKind::CursorPosition),
    ('J', ElementKind::EraseInDisplay),
    ('K', ElementKind::EraseInLine),
    ('L', ElementKind::InsertLines),
    ('M', ElementKind::DeleteLines),
    ('P', ElementKind::DeleteCharacters),
    ('X', ElementKind::EraseCharacters),
    ('a', ElementKind::CursorForward),
    ('c', ElementKind::ReportDeviceAttributes),
    ('d', ElementKind::CursorToLine),
    ('e', ElementKind::CursorDown),
    ('f', ElementKind::CursorPosition),
    ('g', ElementKind::ClearTabStop),
    ('h', ElementKind::SetMode),
    ('l', ElementKind::ResetMode),
    ('m', ElementKind::SelectGraphicRendition),
    ('n', ElementKind::ReportDeviceStatus),
    ('r', ElementKind::SetMargins),
    ('\'', ElementKind::CursorToColumn),
];

/// OSC commands - `OSC <code> ; <payload> ST`
pub const OSC: &[(&str, ElementKind)] = &[
    ("0", ElementKind::SetTitleAndIconName),
    ("1", ElementKind::SetIconName),
    ("2", ElementKind::SetTitle),
];

/// Controls that execute immediately while a CSI sequence is pending
pub const ALLOWED_IN_CSI: &[char] = &[BEL, BS, HT, LF, VT, FF, CR];

/// Look up a single-character code in one of the tables
pub fn lookup(
    table: &[(char, ElementKind)],
    class: CodeClass,
    code: char,
) -> Result<ElementKind> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| Error::UnrecognizedCode {
            class,
            code: code.to_string(),
        })
}

/// Look up an OSC command code
pub fn lookup_osc(code: &str) -> Result<ElementKind> {
    OSC.iter()
        .find(|(c, _)| *c == code)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| Error::UnrecognizedCode {
            class: CodeClass::Osc,
            code: code.to_string(),
        })
}

/// Whether a character is a C0 control with its own element kind
pub fn is_basic(c: char) -> bool {
    BASIC.iter().any(|(b, _)| *b == c)
}

/// Whether a character ends a run of plain text
pub fn is_special(c: char) -> bool {
    matches!(c, NUL | DEL | ESC | CSI_C1 | OSC_C1) || is_basic(c)
}
