//! Elements produced by the parser
//!
//! An [`Element`] is one decoded unit of the input stream: a run of plain
//! text, a control character, or a complete escape sequence. Every element
//! keeps the exact text it was decoded from, so concatenating the text of the
//! elements reproduces the input.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The kind of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Plain text (or the replacement for an aborted sequence)
    Text,

    // C0 controls
    Bell,
    Backspace,
    Tab,
    /// LF, VT, FF and `ESC E`
    LineFeed,
    CarriageReturn,
    ShiftIn,
    ShiftOut,

    // ESC sequences (non-CSI)
    /// `ESC c` - RIS
    Reset,
    /// `ESC D` - IND
    Index,
    /// `ESC M` - RI
    ReverseIndex,
    /// `ESC H` - HTS
    SetTabStop,
    /// `ESC 7` - DECSC
    SaveCursor,
    /// `ESC 8` - DECRC
    RestoreCursor,

    // CSI sequences
    InsertCharacters,
    CursorUp,
    CursorDown,
    CursorForward,
    CursorBack,
    /// CNL - cursor down to the first column
    CursorDown1,
    /// CPL - cursor up to the first column
    CursorUp1,
    CursorToColumn,
    CursorToLine,
    CursorPosition,
    EraseInDisplay,
    EraseInLine,
    InsertLines,
    DeleteLines,
    DeleteCharacters,
    EraseCharacters,
    ClearTabStop,
    SetMode,
    ResetMode,
    SelectGraphicRendition,
    ReportDeviceAttributes,
    ReportDeviceStatus,
    /// DECSTBM
    SetMargins,

    // OSC sequences
    SetTitle,
    SetIconName,
    SetTitleAndIconName,

    /// `ESC # 8` - DECALN
    AlignmentDisplay,

    /// `ESC % 8` / `ESC % G`
    EnableUtf8Mode,
    /// `ESC % @`
    DisableUtf8Mode,

    /// `ESC ( c` / `ESC ) c` when not in UTF-8 mode
    DefineCharset,

    /// Unrecognized sequence, kept for inspection
    Debug,
}

/// Number of positional parameters a fixed-signature kind accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
}

impl Arity {
    /// Check a parameter count against this arity
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => *n == count,
            Arity::OneOf(counts) => counts.contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::OneOf(counts) => {
                let counts: Vec<String> = counts.iter().map(|c| c.to_string()).collect();
                write!(f, "{}", counts.join(" or "))
            }
        }
    }
}

impl ElementKind {
    /// Declared signature of the kind, if it has a fixed one
    pub fn arity(self) -> Option<Arity> {
        use ElementKind::*;

        match self {
            CursorUp | CursorDown | CursorForward | CursorBack | CursorDown1 | CursorUp1
            | CursorToColumn | CursorToLine | EraseInDisplay | EraseInLine => {
                Some(Arity::Exact(1))
            }
            CursorPosition => Some(Arity::Exact(2)),
            SelectGraphicRendition => Some(Arity::OneOf(&[1, 3, 5])),
            _ => None,
        }
    }

    /// Whether the first parameter of this kind is a repeat count
    fn takes_count(self) -> bool {
        use ElementKind::*;

        matches!(
            self,
            CursorUp
                | CursorDown
                | CursorForward
                | CursorBack
                | CursorDown1
                | CursorUp1
                | InsertCharacters
                | InsertLines
                | DeleteLines
                | DeleteCharacters
                | EraseCharacters
        )
    }
}

/// A named parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keyword {
    Flag(bool),
    Str(String),
}

impl Keyword {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Keyword::Flag(flag) => Some(*flag),
            Keyword::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Keyword::Str(s) => Some(s),
            Keyword::Flag(_) => None,
        }
    }
}

impl From<bool> for Keyword {
    fn from(flag: bool) -> Self {
        Keyword::Flag(flag)
    }
}

impl From<&str> for Keyword {
    fn from(s: &str) -> Self {
        Keyword::Str(s.to_string())
    }
}

impl From<String> for Keyword {
    fn from(s: String) -> Self {
        Keyword::Str(s)
    }
}

impl From<char> for Keyword {
    fn from(c: char) -> Self {
        Keyword::Str(c.to_string())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keyword::Flag(flag) => write!(f, "{}", flag),
            Keyword::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// Named parameters of an element, ordered by name
pub type Keywords = BTreeMap<String, Keyword>;

/// Build a [`Keywords`] map from name/value pairs
pub fn keywords<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Keywords
where
    K: Into<String>,
    V: Into<Keyword>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

/// How much of a line or display an erase sequence clears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseHow {
    /// From the cursor to the end
    ToEnd,
    /// From the beginning to the cursor
    ToStart,
    /// Everything
    Complete,
}

impl EraseHow {
    fn from_param(param: u16) -> Option<Self> {
        match param {
            0 => Some(EraseHow::ToEnd),
            1 => Some(EraseHow::ToStart),
            2 => Some(EraseHow::Complete),
            _ => None,
        }
    }
}

/// One decoded unit of the stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    kind: ElementKind,
    parameters: Vec<u16>,
    keywords: Keywords,
    text: String,
}

impl Element {
    /// Create an element; all fields are stored as given
    pub fn new(
        kind: ElementKind,
        parameters: Vec<u16>,
        keywords: Keywords,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            parameters,
            keywords,
            text: text.into(),
        }
    }

    /// Create an element with no parameters or keywords
    pub fn bare(kind: ElementKind, text: impl Into<String>) -> Self {
        Self::new(kind, Vec::new(), Keywords::new(), text)
    }

    /// Create an element, enforcing the kind's declared signature
    pub fn checked(
        kind: ElementKind,
        parameters: Vec<u16>,
        keywords: Keywords,
        text: impl Into<String>,
    ) -> Result<Self> {
        if let Some(arity) = kind.arity() {
            if !arity.accepts(parameters.len()) {
                return Err(Error::InvalidArity {
                    kind,
                    expected: arity,
                    found: parameters.len(),
                });
            }
        }
        Ok(Self::new(kind, parameters, keywords, text))
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Positional parameters
    pub fn parameters(&self) -> &[u16] {
        &self.parameters
    }

    /// Named parameters
    pub fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// The text this element was parsed from
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Positional parameter at `index`
    pub fn param(&self, index: usize) -> Option<u16> {
        self.parameters.get(index).copied()
    }

    /// Named parameter
    pub fn keyword(&self, name: &str) -> Option<&Keyword> {
        self.keywords.get(name)
    }

    /// Whether the sequence was `?`-prefixed (DEC private)
    pub fn is_private(&self) -> bool {
        self.keyword("private")
            .and_then(Keyword::as_bool)
            .unwrap_or(false)
    }

    /// Repeat count of cursor movement and insert/delete kinds
    pub fn count(&self) -> Option<u16> {
        if self.kind.takes_count() {
            self.param(0)
        } else {
            None
        }
    }

    /// Icon name carried by `SetIconName` and `SetTitleAndIconName`
    pub fn name(&self) -> Option<&str> {
        match self.kind {
            ElementKind::SetIconName | ElementKind::SetTitleAndIconName => {
                self.keyword("name").and_then(Keyword::as_str)
            }
            _ => None,
        }
    }

    /// Title carried by `SetTitle` and `SetTitleAndIconName`
    pub fn title(&self) -> Option<&str> {
        match self.kind {
            ElementKind::SetTitle | ElementKind::SetTitleAndIconName => {
                self.keyword("title").and_then(Keyword::as_str)
            }
            _ => None,
        }
    }

    /// Erase mode of `EraseInLine` and `EraseInDisplay`
    pub fn erase_how(&self) -> Option<EraseHow> {
        match self.kind {
            ElementKind::EraseInLine | ElementKind::EraseInDisplay => {
                EraseHow::from_param(self.param(0)?)
            }
            _ => None,
        }
    }

    /// Charset code and designating bracket of `DefineCharset`
    pub fn charset(&self) -> Option<(char, char)> {
        if self.kind != ElementKind::DefineCharset {
            return None;
        }
        let first_char = |name| {
            self.keyword(name)
                .and_then(Keyword::as_str)
                .and_then(|s| s.chars().next())
        };
        Some((first_char("code")?, first_char("mode")?))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
            write!(f, "({})", params.join(", "))?;
        }
        if !self.keywords.is_empty() {
            let pairs: Vec<String> = self
                .keywords
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            write!(f, " {{{}}}", pairs.join(", "))?;
        }
        write!(f, " {:?}", self.text)
    }
}
