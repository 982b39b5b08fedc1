//! Parser State Machine
//!
//! A resumable, character-at-a-time state machine. All in-progress sequence
//! data lives in the parser, so input may be split at arbitrary points
//! between calls to [`Parser::feed`].
//!
//! States:
//! - Ground: Plain text runs and C0 controls
//! - Escape: After ESC, waiting for the selector
//! - CsiParam: Collecting CSI parameters until the final byte
//! - CsiSkip: After `$` in a CSI sequence, skipping one character
//! - OscString: Collecting OSC code and payload until BEL or ST
//! - OscEscape: ESC seen inside an OSC string, maybe the start of ST
//! - OscPalette: Skipping the payload of a Linux palette OSC
//! - Sharp / Percent / Charset: One selector character after `ESC #`,
//!   `ESC %`, `ESC (` or `ESC )`
//!
//! Every consumed character is appended to a partial buffer that becomes the
//! text of the next element. Characters that complete a no-op (NUL, DEL,
//! shifts in UTF-8 mode, palette commands, ...) stay in the buffer and are
//! carried into the next element, so no input is lost.

use std::mem;

use tracing::{debug, trace, warn};

use super::tables::{
    self, ALLOWED_IN_CSI, BEL, CAN, CSI_C1, DEL, ESC, NUL, OSC_C1, SI, SO, ST_C1, SUB,
};
use crate::config::ParserConfig;
use crate::element::{keywords, Element, ElementKind, Keywords};
use crate::error::{CodeClass, Error, Limit, Result};

/// Any parameter greater than this is set to this
const MAX_PARAM_VALUE: u32 = 9999;
/// Payload length of the Linux `OSC P nrrggbb` palette command
const PALETTE_PAYLOAD_LEN: u8 = 7;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    CsiParam,
    CsiSkip,
    OscString,
    OscEscape,
    OscPalette,
    Sharp,
    Percent,
    Charset,
}

/// The element parser
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
    state: State,
    /// Raw text consumed for the sequence in progress
    buffer: String,
    /// Parameters for CSI sequences
    params: Vec<u16>,
    /// Current parameter being built
    current_param: u32,
    /// Whether this is a private sequence (contains ?)
    private_marker: bool,
    /// OSC code and payload
    osc_data: String,
    /// Characters in `osc_data`
    osc_len: usize,
    /// Characters left to skip in a palette OSC
    palette_remaining: u8,
    /// Bracket of a pending charset designation
    charset_mode: char,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in the ground state with default configuration
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a new parser with the given configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            state: State::Ground,
            buffer: String::with_capacity(64),
            params: Vec::with_capacity(16),
            current_param: 0,
            private_marker: false,
            osc_data: String::with_capacity(256),
            osc_len: 0,
            palette_remaining: 0,
            charset_mode: '(',
        }
    }

    /// The configuration this parser was created with
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Whether the parser operates in UTF-8 mode
    ///
    /// See <http://www.cl.cam.ac.uk/~mgk25/unicode.html#term>.
    pub fn use_utf8(&self) -> bool {
        self.config.use_utf8
    }

    /// Switch UTF-8 mode; takes effect from the next character fed
    pub fn set_use_utf8(&mut self, flag: bool) {
        self.config.use_utf8 = flag;
    }

    /// Whether the parser is in text mode with no sequence in progress
    pub fn is_ground(&self) -> bool {
        self.state == State::Ground
    }

    /// Text consumed so far that no element has carried yet
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Reset the parser to initial state, dropping any partial sequence
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.buffer.clear();
        self.clear_params();
        self.clear_osc();
    }

    /// Consume a chunk of text, lazily yielding elements as they complete
    ///
    /// The returned iterator drives the parser; text it has not reached when
    /// dropped is never parsed. An `Err` item means the parser reset itself
    /// after a fault, and iteration may continue with the rest of the chunk.
    pub fn feed<'p, 'a>(&'p mut self, chunk: &'a str) -> Feed<'p, 'a> {
        Feed {
            parser: self,
            rest: chunk,
        }
    }

    /// Consume a chunk and collect its elements, stopping at the first fault
    pub fn feed_collect(&mut self, chunk: &str) -> Result<Vec<Element>> {
        self.feed(chunk).collect()
    }

    fn clear_params(&mut self) {
        self.params.clear();
        self.current_param = 0;
        self.private_marker = false;
    }

    fn clear_osc(&mut self) {
        self.osc_data.clear();
        self.osc_len = 0;
        self.palette_remaining = 0;
    }

    /// Emit a run of plain text
    fn text_run(&mut self, run: &str) -> Element {
        self.buffer.push_str(run);
        Element::bare(ElementKind::Text, mem::take(&mut self.buffer))
    }

    /// Build an element from the partial buffer without leaving the current state
    fn take_element(
        &mut self,
        kind: ElementKind,
        params: Vec<u16>,
        keywords: Keywords,
    ) -> Element {
        Element::new(kind, params, keywords, mem::take(&mut self.buffer))
    }

    /// Finish the current sequence with an element and return to ground
    fn complete(
        &mut self,
        kind: ElementKind,
        params: Vec<u16>,
        keywords: Keywords,
    ) -> Option<Element> {
        self.state = State::Ground;
        Some(self.take_element(kind, params, keywords))
    }

    /// Finish the current sequence without an element; its text is carried forward
    fn discard(&mut self) -> Option<Element> {
        self.state = State::Ground;
        None
    }

    /// Finish a single-character selection from one of the dispatch tables
    fn dispatch(
        &mut self,
        table: &[(char, ElementKind)],
        class: CodeClass,
        code: char,
        params: Vec<u16>,
        keywords: Keywords,
    ) -> Option<Element> {
        let kind = tables::lookup(table, class, code).unwrap_or_else(|e| {
            debug!("{}", e);
            ElementKind::Debug
        });
        self.complete(kind, params, keywords)
    }

    fn dispatch_bare(
        &mut self,
        table: &[(char, ElementKind)],
        class: CodeClass,
        code: char,
    ) -> Option<Element> {
        self.dispatch(table, class, code, Vec::new(), Keywords::new())
    }

    /// Advance the parser by one character
    ///
    /// A fault resets the parser before it is returned.
    fn advance(&mut self, c: char) -> Result<Option<Element>> {
        self.buffer.push(c);

        let result = match self.state {
            State::Ground => self.process_ground(c),
            State::Escape => Ok(self.process_escape(c)),
            State::CsiParam => self.process_csi_param(c),
            State::CsiSkip => Ok(self.discard()),
            State::OscString => self.process_osc_string(c),
            State::OscEscape => self.process_osc_escape(c),
            State::OscPalette => Ok(self.process_osc_palette()),
            State::Sharp => Ok(self.dispatch_bare(tables::SHARP, CodeClass::Sharp, c)),
            State::Percent => Ok(self.dispatch_bare(tables::PERCENT, CodeClass::Percent, c)),
            State::Charset => Ok(self.process_charset(c)),
        };

        if let Err(e) = &result {
            warn!("{}", e);
            self.reset();
        }
        result
    }

    /// Process a character in ground state
    ///
    /// Plain text runs are consumed by [`Feed`]; this sees the characters
    /// that end them.
    fn process_ground(&mut self, c: char) -> Result<Option<Element>> {
        match c {
            ESC => {
                self.state = State::Escape;
                Ok(None)
            }
            CSI_C1 => {
                self.enter_csi();
                Ok(None)
            }
            OSC_C1 => {
                self.enter_osc();
                Ok(None)
            }
            NUL | DEL => Ok(None),
            c if tables::is_basic(c) => self.process_basic(c),
            _ => Ok(self.complete(ElementKind::Text, Vec::new(), Keywords::new())),
        }
    }

    /// Process a C0 control with its own element kind
    fn process_basic(&mut self, c: char) -> Result<Option<Element>> {
        if (c == SI || c == SO) && self.config.use_utf8 {
            trace!("shift ignored in UTF-8 mode");
            return Ok(None);
        }
        let kind = tables::lookup(tables::BASIC, CodeClass::Control, c)?;
        Ok(Some(self.take_element(kind, Vec::new(), Keywords::new())))
    }

    fn process_escape(&mut self, c: char) -> Option<Element> {
        match c {
            '[' => {
                self.enter_csi();
                None
            }
            ']' => {
                self.enter_osc();
                None
            }
            '#' => {
                self.state = State::Sharp;
                None
            }
            '%' => {
                self.state = State::Percent;
                None
            }
            '(' | ')' => {
                self.charset_mode = c;
                self.state = State::Charset;
                None
            }
            _ => self.dispatch_bare(tables::ESCAPE, CodeClass::Escape, c),
        }
    }

    fn process_charset(&mut self, code: char) -> Option<Element> {
        if self.config.use_utf8 {
            trace!("charset designation ignored in UTF-8 mode");
            return self.discard();
        }
        let keywords = keywords([("code", code), ("mode", self.charset_mode)]);
        self.complete(ElementKind::DefineCharset, Vec::new(), keywords)
    }

    fn enter_csi(&mut self) {
        self.state = State::CsiParam;
        self.clear_params();
    }

    /// Process a character of a CSI sequence
    ///
    /// All parameters are unsigned decimal integers; a missing value is 0 and
    /// any value above 9999 is set to 9999.
    fn process_csi_param(&mut self, c: char) -> Result<Option<Element>> {
        match c {
            '?' => {
                self.private_marker = true;
                Ok(None)
            }
            c if ALLOWED_IN_CSI.contains(&c) => {
                // Executes now; the CSI sequence stays pending
                let kind = tables::lookup(tables::BASIC, CodeClass::Control, c)?;
                Ok(Some(self.take_element(kind, Vec::new(), Keywords::new())))
            }
            ' ' | '>' => {
                trace!("secondary DA is not supported");
                Ok(None)
            }
            CAN | SUB => {
                // The sequence is aborted and shown as text
                self.clear_params();
                Ok(self.complete(ElementKind::Text, Vec::new(), keywords([("abort", c)])))
            }
            '0'..='9' => {
                let digit = c as u32 - '0' as u32;
                self.current_param = self.current_param.saturating_mul(10).saturating_add(digit);
                Ok(None)
            }
            '$' => {
                trace!("xterm-specific CSI $ sequences are not supported");
                self.clear_params();
                self.state = State::CsiSkip;
                Ok(None)
            }
            ';' => {
                self.push_param()?;
                Ok(None)
            }
            _ => {
                self.push_param()?;
                let params = mem::take(&mut self.params);
                let keywords = if self.private_marker {
                    keywords([("private", true)])
                } else {
                    Keywords::new()
                };
                self.clear_params();
                Ok(self.dispatch(tables::CSI, CodeClass::Csi, c, params, keywords))
            }
        }
    }

    fn push_param(&mut self) -> Result<()> {
        if let Some(max) = self.config.max_params {
            if self.params.len() >= max {
                return Err(Error::TransientFault {
                    limit: Limit::CsiParameters,
                    max,
                });
            }
        }
        self.params.push(self.current_param.min(MAX_PARAM_VALUE) as u16);
        self.current_param = 0;
        Ok(())
    }

    fn enter_osc(&mut self) {
        self.state = State::OscString;
        self.clear_osc();
    }

    fn process_osc_string(&mut self, c: char) -> Result<Option<Element>> {
        match c {
            'R' if self.osc_len == 0 => {
                trace!("palette reset is not supported");
                Ok(self.discard())
            }
            'P' if self.osc_len == 0 => {
                trace!("palette set is not supported");
                self.palette_remaining = PALETTE_PAYLOAD_LEN;
                self.state = State::OscPalette;
                Ok(None)
            }
            BEL | ST_C1 => Ok(self.finish_osc()),
            ESC => {
                self.state = State::OscEscape;
                Ok(None)
            }
            _ => {
                self.push_osc(c)?;
                Ok(None)
            }
        }
    }

    /// ESC inside an OSC string: `ESC \` terminates, anything else is payload
    fn process_osc_escape(&mut self, c: char) -> Result<Option<Element>> {
        match c {
            '\\' => Ok(self.finish_osc()),
            ESC => {
                self.push_osc(ESC)?;
                Ok(None)
            }
            _ => {
                self.push_osc(ESC)?;
                self.push_osc(c)?;
                self.state = State::OscString;
                Ok(None)
            }
        }
    }

    fn process_osc_palette(&mut self) -> Option<Element> {
        self.palette_remaining = self.palette_remaining.saturating_sub(1);
        if self.palette_remaining == 0 {
            self.discard()
        } else {
            None
        }
    }

    fn push_osc(&mut self, c: char) -> Result<()> {
        if let Some(max) = self.config.max_osc_len {
            if self.osc_len >= max {
                return Err(Error::TransientFault {
                    limit: Limit::OscPayload,
                    max,
                });
            }
        }
        self.osc_data.push(c);
        self.osc_len += 1;
        Ok(())
    }

    /// Build the element for a terminated OSC string
    fn finish_osc(&mut self) -> Option<Element> {
        let data = mem::take(&mut self.osc_data);
        self.clear_osc();

        let (code, payload) = data.split_once(';').unwrap_or((data.as_str(), ""));
        let kind = tables::lookup_osc(code).unwrap_or_else(|e| {
            debug!("{}", e);
            ElementKind::Debug
        });
        let keywords = match kind {
            ElementKind::SetTitleAndIconName => keywords([("name", payload), ("title", payload)]),
            ElementKind::SetIconName => keywords([("name", payload)]),
            ElementKind::SetTitle => keywords([("title", payload)]),
            _ => Keywords::new(),
        };
        self.complete(kind, Vec::new(), keywords)
    }
}

/// Lazy sequence of elements for one [`Parser::feed`] call
#[derive(Debug)]
pub struct Feed<'p, 'a> {
    parser: &'p mut Parser,
    rest: &'a str,
}

impl<'p, 'a> Feed<'p, 'a> {
    /// The part of the chunk not consumed yet
    pub fn remaining(&self) -> &'a str {
        self.rest
    }
}

impl Iterator for Feed<'_, '_> {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.parser.state == State::Ground {
                let end = self.rest.find(tables::is_special).unwrap_or(self.rest.len());
                if end > 0 {
                    let (run, rest) = self.rest.split_at(end);
                    self.rest = rest;
                    return Some(Ok(self.parser.text_run(run)));
                }
            }

            let mut chars = self.rest.chars();
            let c = chars.next()?;
            self.rest = chars.as_str();

            match self.parser.advance(c) {
                Ok(Some(element)) => return Some(Ok(element)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<Element> {
        Parser::new().feed_collect(input).unwrap()
    }

    fn bare(kind: ElementKind, text: &str) -> Element {
        Element::bare(kind, text)
    }

    fn csi(kind: ElementKind, params: &[u16], text: &str) -> Element {
        Element::new(kind, params.to_vec(), Keywords::new(), text)
    }

    #[test]
    fn test_parser_text() {
        assert_eq!(parse("Hello"), vec![bare(ElementKind::Text, "Hello")]);
        assert_eq!(parse("héllo wörld"), vec![bare(ElementKind::Text, "héllo wörld")]);
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parser_control() {
        let elements = parse("\x07\x08\x09\x0A\x0D");

        assert_eq!(
            elements,
            vec![
                bare(ElementKind::Bell, "\x07"),
                bare(ElementKind::Backspace, "\x08"),
                bare(ElementKind::Tab, "\x09"),
                bare(ElementKind::LineFeed, "\x0A"),
                bare(ElementKind::CarriageReturn, "\x0D"),
            ]
        );
    }

    #[test]
    fn test_parser_csi_cursor() {
        assert_eq!(
            parse("\x1b[10;20H"),
            vec![csi(ElementKind::CursorPosition, &[10, 20], "\x1b[10;20H")]
        );
    }

    #[test]
    fn test_parser_csi_defaults() {
        assert_eq!(parse("\x1b[A"), vec![csi(ElementKind::CursorUp, &[0], "\x1b[A")]);
        assert_eq!(
            parse("\x1b[;5;H"),
            vec![csi(ElementKind::CursorPosition, &[0, 5, 0], "\x1b[;5;H")]
        );
    }

    #[test]
    fn test_parser_csi_clamps_values() {
        assert_eq!(
            parse("\x1b[123456789012B"),
            vec![csi(ElementKind::CursorDown, &[9999], "\x1b[123456789012B")]
        );
    }

    #[test]
    fn test_parser_csi_private() {
        let elements = parse("\x1b[?25h");

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind(), ElementKind::SetMode);
        assert_eq!(elements[0].parameters(), &[25]);
        assert!(elements[0].is_private());
    }

    #[test]
    fn test_parser_csi_sgr() {
        let elements = parse("\x1b[1;31;42m");

        assert_eq!(
            elements,
            vec![csi(ElementKind::SelectGraphicRendition, &[1, 31, 42], "\x1b[1;31;42m")]
        );
        assert!(!elements[0].is_private());
    }

    #[test]
    fn test_parser_c1_csi() {
        assert_eq!(
            parse("\u{9b}3C"),
            vec![csi(ElementKind::CursorForward, &[3], "\u{9b}3C")]
        );
    }

    #[test]
    fn test_parser_csi_unknown_final() {
        assert_eq!(parse("\x1b[3z"), vec![csi(ElementKind::Debug, &[3], "\x1b[3z")]);
    }

    #[test]
    fn test_parser_control_inside_csi() {
        assert_eq!(
            parse("\x1b[5\nA"),
            vec![
                bare(ElementKind::LineFeed, "\x1b[5\n"),
                csi(ElementKind::CursorUp, &[5], "A"),
            ]
        );
    }

    #[test]
    fn test_parser_csi_cancel() {
        let aborted = |c: char, text: &str| {
            Element::new(ElementKind::Text, Vec::new(), keywords([("abort", c)]), text)
        };

        assert_eq!(
            parse("\x1b[12\x18rest"),
            vec![aborted(CAN, "\x1b[12\x18"), bare(ElementKind::Text, "rest")]
        );
        assert_eq!(
            parse("\x1b[\x1aA"),
            vec![aborted(SUB, "\x1b[\x1a"), bare(ElementKind::Text, "A")]
        );
        assert_eq!(
            parse("\x1b[?1\x18")[0].keyword("abort").and_then(|k| k.as_str()),
            Some("\x18")
        );
    }

    #[test]
    fn test_parser_csi_dollar_is_skipped() {
        assert_eq!(parse("\x1b[5$pX"), vec![bare(ElementKind::Text, "\x1b[5$pX")]);
    }

    #[test]
    fn test_parser_csi_secondary_da_ignored() {
        assert_eq!(
            parse("\x1b[>c"),
            vec![csi(ElementKind::ReportDeviceAttributes, &[0], "\x1b[>c")]
        );
    }

    #[test]
    fn test_parser_esc_save_restore() {
        assert_eq!(
            parse("\x1b7\x1b8"),
            vec![
                bare(ElementKind::SaveCursor, "\x1b7"),
                bare(ElementKind::RestoreCursor, "\x1b8"),
            ]
        );
    }

    #[test]
    fn test_parser_esc_index() {
        assert_eq!(
            parse("\x1bD\x1bM\x1bE"),
            vec![
                bare(ElementKind::Index, "\x1bD"),
                bare(ElementKind::ReverseIndex, "\x1bM"),
                bare(ElementKind::LineFeed, "\x1bE"),
            ]
        );
    }

    #[test]
    fn test_parser_esc_unknown() {
        assert_eq!(parse("\x1bZ"), vec![bare(ElementKind::Debug, "\x1bZ")]);
        assert_eq!(parse("\x1b\x1b"), vec![bare(ElementKind::Debug, "\x1b\x1b")]);
    }

    #[test]
    fn test_parser_osc_title() {
        let elements = parse("\x1b]0;My Title\x07");

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind(), ElementKind::SetTitleAndIconName);
        assert_eq!(elements[0].title(), Some("My Title"));
        assert_eq!(elements[0].name(), Some("My Title"));
        assert!(elements[0].parameters().is_empty());
    }

    #[test]
    fn test_parser_osc_string_terminators() {
        let icon = Element::new(
            ElementKind::SetIconName,
            Vec::new(),
            keywords([("name", "icon")]),
            "\x1b]1;icon\x1b\\",
        );
        assert_eq!(parse("\x1b]1;icon\x1b\\"), vec![icon]);

        let title = Element::new(
            ElementKind::SetTitle,
            Vec::new(),
            keywords([("title", "t")]),
            "\u{9d}2;t\u{9c}",
        );
        assert_eq!(parse("\u{9d}2;t\u{9c}"), vec![title]);
    }

    #[test]
    fn test_parser_osc_escape_in_payload() {
        let elements = parse("\x1b]2;a\x1bb\x07");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].title(), Some("a\x1bb"));
    }

    #[test]
    fn test_parser_osc_empty_payload() {
        let elements = parse("\x1b]2\x07");
        assert_eq!(elements[0].kind(), ElementKind::SetTitle);
        assert_eq!(elements[0].title(), Some(""));
    }

    #[test]
    fn test_parser_osc_unknown_code() {
        assert_eq!(
            parse("\x1b]8;;https://example.com\x07"),
            vec![bare(ElementKind::Debug, "\x1b]8;;https://example.com\x07")]
        );
    }

    #[test]
    fn test_parser_osc_palette_is_noop() {
        assert_eq!(parse("\x1b]Rok"), vec![bare(ElementKind::Text, "\x1b]Rok")]);
        assert_eq!(
            parse("\x1b]P1a2b3c4ok"),
            vec![bare(ElementKind::Text, "\x1b]P1a2b3c4ok")]
        );
    }

    #[test]
    fn test_parser_sharp_and_percent() {
        assert_eq!(
            parse("\x1b#8\x1b#3"),
            vec![
                bare(ElementKind::AlignmentDisplay, "\x1b#8"),
                bare(ElementKind::Debug, "\x1b#3"),
            ]
        );
        assert_eq!(
            parse("\x1b%G\x1b%@\x1b%x"),
            vec![
                bare(ElementKind::EnableUtf8Mode, "\x1b%G"),
                bare(ElementKind::DisableUtf8Mode, "\x1b%@"),
                bare(ElementKind::Debug, "\x1b%x"),
            ]
        );
    }

    #[test]
    fn test_parser_designate_charset() {
        let mut parser = Parser::new();
        parser.set_use_utf8(false);

        let elements = parser.feed_collect("\x1b(B\x1b)0").unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].charset(), Some(('B', '(')));
        assert_eq!(elements[1].charset(), Some(('0', ')')));
        assert_eq!(elements[1].text(), "\x1b)0");
    }

    #[test]
    fn test_parser_charset_ignored_in_utf8() {
        assert_eq!(parse("\x1b(0x"), vec![bare(ElementKind::Text, "\x1b(0x")]);
    }

    #[test]
    fn test_parser_shifts() {
        let mut parser = Parser::new();
        assert!(parser.feed_collect("\x0e\x0f").unwrap().is_empty());
        assert_eq!(parser.pending(), "\x0e\x0f");

        parser.reset();
        parser.set_use_utf8(false);
        assert_eq!(
            parser.feed_collect("\x0e\x0f").unwrap(),
            vec![bare(ElementKind::ShiftOut, "\x0e"), bare(ElementKind::ShiftIn, "\x0f")]
        );
    }

    #[test]
    fn test_parser_nul_and_del_are_carried() {
        assert_eq!(
            parse("a\0b\x7f\x07"),
            vec![
                bare(ElementKind::Text, "a"),
                bare(ElementKind::Text, "\0b"),
                bare(ElementKind::Bell, "\x7f\x07"),
            ]
        );
    }

    #[test]
    fn test_parser_streaming() {
        let mut parser = Parser::new();

        // Split CSI sequence across chunks
        assert!(parser.feed_collect("\x1b[10").unwrap().is_empty());
        assert!(!parser.is_ground());
        assert_eq!(parser.pending(), "\x1b[10");

        let elements = parser.feed_collect(";20H").unwrap();
        assert_eq!(
            elements,
            vec![csi(ElementKind::CursorPosition, &[10, 20], "\x1b[10;20H")]
        );
        assert!(parser.is_ground());
    }

    #[test]
    fn test_parser_streaming_osc_terminator() {
        let mut parser = Parser::new();

        assert!(parser.feed_collect("\x1b]2;ti").unwrap().is_empty());
        assert!(parser.feed_collect("tle\x1b").unwrap().is_empty());
        let elements = parser.feed_collect("\\").unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].title(), Some("title"));
        assert_eq!(elements[0].text(), "\x1b]2;title\x1b\\");
    }

    #[test]
    fn test_parser_lazy_feed() {
        let mut parser = Parser::new();
        let mut feed = parser.feed("ab\ncd");

        assert_eq!(feed.next(), Some(Ok(bare(ElementKind::Text, "ab"))));
        assert_eq!(feed.remaining(), "\ncd");
        assert_eq!(feed.next(), Some(Ok(bare(ElementKind::LineFeed, "\n"))));
        assert_eq!(feed.next(), Some(Ok(bare(ElementKind::Text, "cd"))));
        assert_eq!(feed.next(), None);
    }

    #[test]
    fn test_parser_osc_fault_resets() {
        let mut parser = Parser::with_config(ParserConfig {
            max_osc_len: Some(4),
            ..ParserConfig::default()
        });

        let results: Vec<_> = parser.feed("\x1b]2;abcdefg\x07\x1b[5A").collect();
        assert_eq!(
            results,
            vec![
                Err(Error::TransientFault {
                    limit: Limit::OscPayload,
                    max: 4,
                }),
                Ok(bare(ElementKind::Text, "defg")),
                Ok(bare(ElementKind::Bell, "\x07")),
                Ok(csi(ElementKind::CursorUp, &[5], "\x1b[5A")),
            ]
        );
        assert!(parser.is_ground());
    }

    #[test]
    fn test_parser_csi_fault_resets() {
        let mut parser = Parser::with_config(ParserConfig {
            max_params: Some(2),
            ..ParserConfig::default()
        });

        let err = parser.feed_collect("\x1b[1;2;3m");
        assert!(matches!(
            err,
            Err(Error::TransientFault {
                limit: Limit::CsiParameters,
                max: 2,
            })
        ));
        assert!(parser.is_ground());
        assert_eq!(parser.pending(), "");

        assert_eq!(
            parser.feed_collect("\x1b[1;2m").unwrap(),
            vec![csi(ElementKind::SelectGraphicRendition, &[1, 2], "\x1b[1;2m")]
        );
    }

    #[test]
    fn test_parser_reset() {
        let mut parser = Parser::new();

        // Start a sequence
        parser.feed_collect("\x1b[10").unwrap();
        assert!(!parser.is_ground());

        // Reset
        parser.reset();
        assert!(parser.is_ground());
        assert_eq!(parser.pending(), "");

        // Should work normally now
        assert_eq!(parser.feed_collect("A").unwrap(), vec![bare(ElementKind::Text, "A")]);
    }
}
