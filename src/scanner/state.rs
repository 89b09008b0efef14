//! Statement scanner state machine
//!
//! The scanner walks one physical line at a time, appending SQL text to the
//! caller's statement buffer and stopping whenever it reaches a statement
//! boundary: an unquoted terminator at paren depth zero, or a backslash
//! that starts a slash command. Quoting mode and paren depth survive across
//! lines so that a statement may span any number of physical lines.

/// Default statement terminator
pub const DEFAULT_TERMINATOR: &str = ";";

/// Result of one call to [`ScanState::scan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanResult {
    /// Found an unquoted terminator; the buffer holds a complete statement
    Semicolon,
    /// Found a slash command; the cursor is positioned after the backslash
    Backslash,
    /// End of line reached inside a quote, comment or parenthesis
    Incomplete,
    /// End of line reached in normal state; the statement may be complete
    Eol,
}

/// Lexical mode the scanner is currently in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteMode {
    Normal,
    LineComment,
    BlockComment,
    SingleQuote,
    DoubleQuote,
    /// Inside a dollar-quoted body; holds the full opening tag, e.g. `$body$`
    DollarQuote(String),
}

/// What kind of continuation the prompt should advertise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStatus {
    Ready,
    Continue,
    Comment,
    SingleQuote,
    DoubleQuote,
    DollarQuote,
    Paren,
}

/// Scanner working state, one per input session
#[derive(Debug, Clone)]
pub struct ScanState {
    /// Characters of the line currently being scanned
    pub(super) line: Vec<char>,
    /// Index of the next unread character in `line`
    pub(super) cursor: usize,
    mode: QuoteMode,
    paren_depth: usize,
    terminator: Vec<char>,
    /// True once non-whitespace SQL has been emitted since the last boundary
    segment_has_content: bool,
    /// Bytes of whitespace emitted since the last boundary before any content
    leading_ws: usize,
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINATOR)
    }
}

impl ScanState {
    /// Create a scanner using the given statement terminator
    pub fn new(terminator: &str) -> Self {
        let terminator: Vec<char> = if terminator.is_empty() {
            DEFAULT_TERMINATOR.chars().collect()
        } else {
            terminator.chars().collect()
        };

        Self {
            line: Vec::new(),
            cursor: 0,
            mode: QuoteMode::Normal,
            paren_depth: 0,
            terminator,
            segment_has_content: false,
            leading_ws: 0,
        }
    }

    /// Prepare to scan a new physical line
    pub fn setup(&mut self, line: &str) {
        self.line = line.chars().collect();
        self.cursor = 0;
        self.start_segment();
    }

    /// Release the current line once the caller is done with it
    pub fn finish(&mut self) {
        self.line.clear();
        self.cursor = 0;
    }

    /// Clear quoting and paren nesting, e.g. after a forced send
    pub fn reset(&mut self) {
        self.mode = QuoteMode::Normal;
        self.paren_depth = 0;
    }

    pub fn mode(&self) -> &QuoteMode {
        &self.mode
    }

    pub fn paren_depth(&self) -> usize {
        self.paren_depth
    }

    /// True when the current line has been fully consumed
    pub fn at_end(&self) -> bool {
        self.cursor >= self.line.len()
    }

    /// Prompt status for the statement accumulated so far
    pub fn prompt_status(&self, buf: &str) -> PromptStatus {
        match self.mode {
            QuoteMode::SingleQuote => PromptStatus::SingleQuote,
            QuoteMode::DoubleQuote => PromptStatus::DoubleQuote,
            QuoteMode::DollarQuote(_) => PromptStatus::DollarQuote,
            QuoteMode::BlockComment => PromptStatus::Comment,
            _ if self.paren_depth > 0 => PromptStatus::Paren,
            _ if !buf.is_empty() => PromptStatus::Continue,
            _ => PromptStatus::Ready,
        }
    }

    /// Scan forward from the cursor, appending SQL text to `buf`.
    ///
    /// Returns at the first statement boundary or at end of line. Terminator
    /// and backslash characters are consumed but never appended. Calling
    /// again after a boundary continues with the rest of the same line.
    pub fn scan(&mut self, buf: &mut String) -> ScanResult {
        while !self.at_end() {
            let found = match self.mode {
                QuoteMode::Normal => self.step_normal(buf),
                QuoteMode::LineComment => {
                    self.step_line_comment(buf);
                    None
                }
                QuoteMode::BlockComment => {
                    self.step_block_comment(buf);
                    None
                }
                QuoteMode::SingleQuote => {
                    self.step_quoted(buf, '\'');
                    None
                }
                QuoteMode::DoubleQuote => {
                    self.step_quoted(buf, '"');
                    None
                }
                QuoteMode::DollarQuote(_) => {
                    self.step_dollar_quoted(buf);
                    None
                }
            };

            if let Some(result) = found {
                return result;
            }
        }

        self.end_of_line()
    }

    fn end_of_line(&mut self) -> ScanResult {
        // a line comment never survives past its own line
        if self.mode == QuoteMode::LineComment {
            self.mode = QuoteMode::Normal;
        }

        if self.mode == QuoteMode::Normal && self.paren_depth == 0 {
            ScanResult::Eol
        } else {
            ScanResult::Incomplete
        }
    }

    /// Begin a new statement segment on the current line
    pub(super) fn start_segment(&mut self) {
        self.segment_has_content = false;
        self.leading_ws = 0;
    }

    fn step_normal(&mut self, buf: &mut String) -> Option<ScanResult> {
        if self.paren_depth == 0 && self.looking_at(&self.terminator) {
            self.cursor += self.terminator.len();
            self.start_segment();
            return Some(ScanResult::Semicolon);
        }

        let ch = self.line[self.cursor];
        match ch {
            '\\' if !self.segment_has_content => {
                // whitespace ahead of the command belongs to the command
                let keep = buf.len().saturating_sub(self.leading_ws);
                buf.truncate(keep);
                self.cursor += 1;
                self.leading_ws = 0;
                return Some(ScanResult::Backslash);
            }
            '(' => {
                self.paren_depth += 1;
                self.emit(buf, ch);
            }
            ')' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                self.emit(buf, ch);
            }
            '\'' => {
                self.mode = QuoteMode::SingleQuote;
                self.emit(buf, ch);
            }
            '"' => {
                self.mode = QuoteMode::DoubleQuote;
                self.emit(buf, ch);
            }
            '-' if self.peek(1) == Some('-') => {
                self.mode = QuoteMode::LineComment;
                self.emit(buf, '-');
                self.emit(buf, '-');
                self.cursor += 1;
            }
            '/' if self.peek(1) == Some('*') => {
                self.mode = QuoteMode::BlockComment;
                self.emit(buf, '/');
                self.emit(buf, '*');
                self.cursor += 1;
            }
            '$' => match self.dollar_tag_at_cursor() {
                Some(tag) => {
                    buf.push_str(&tag);
                    self.segment_has_content = true;
                    self.cursor += tag.chars().count() - 1;
                    self.mode = QuoteMode::DollarQuote(tag);
                }
                None => self.emit(buf, ch),
            },
            _ => self.emit(buf, ch),
        }

        self.cursor += 1;
        None
    }

    fn step_line_comment(&mut self, buf: &mut String) {
        buf.push(self.line[self.cursor]);
        self.cursor += 1;
    }

    fn step_block_comment(&mut self, buf: &mut String) {
        if self.looking_at(&['*', '/']) {
            buf.push_str("*/");
            self.cursor += 2;
            self.mode = QuoteMode::Normal;
        } else {
            buf.push(self.line[self.cursor]);
            self.cursor += 1;
        }
    }

    fn step_quoted(&mut self, buf: &mut String, quote: char) {
        let ch = self.line[self.cursor];
        buf.push(ch);
        self.cursor += 1;

        if ch != quote {
            return;
        }

        // a doubled quote is an escaped quote, not the end of the literal
        if self.peek(0) == Some(quote) {
            buf.push(quote);
            self.cursor += 1;
        } else {
            self.mode = QuoteMode::Normal;
        }
    }

    fn step_dollar_quoted(&mut self, buf: &mut String) {
        let closing: Option<Vec<char>> = match &self.mode {
            QuoteMode::DollarQuote(tag) => Some(tag.chars().collect()),
            _ => None,
        };

        if let Some(tag) = closing {
            if self.looking_at(&tag) {
                buf.extend(tag.iter());
                self.cursor += tag.len();
                self.mode = QuoteMode::Normal;
                return;
            }
        }

        buf.push(self.line[self.cursor]);
        self.cursor += 1;
    }

    /// Append a character emitted in normal mode.
    ///
    /// Whitespace is not recorded while the buffer is still empty, so a
    /// statement never starts with blank lines or indentation.
    fn emit(&mut self, buf: &mut String, ch: char) {
        if ch.is_whitespace() {
            if buf.is_empty() {
                return;
            }
            buf.push(ch);
            if !self.segment_has_content {
                self.leading_ws += ch.len_utf8();
            }
        } else {
            buf.push(ch);
            self.segment_has_content = true;
        }
    }

    /// Opening dollar-quote tag starting at the cursor, if any.
    ///
    /// `$` inside an identifier such as `rdb$relations` never opens a quote.
    fn dollar_tag_at_cursor(&self) -> Option<String> {
        if self.cursor > 0 && is_ident_char(self.line[self.cursor - 1]) {
            return None;
        }

        let mut end = self.cursor + 1;
        while end < self.line.len() {
            let c = self.line[end];
            if c == '$' {
                return Some(self.line[self.cursor..=end].iter().collect());
            }
            let valid = c == '_' || c.is_alphabetic() || (c.is_ascii_digit() && end > self.cursor + 1);
            if !valid {
                return None;
            }
            end += 1;
        }

        None
    }

    pub(super) fn peek(&self, offset: usize) -> Option<char> {
        self.line.get(self.cursor + offset).copied()
    }

    pub(super) fn looking_at(&self, pattern: &[char]) -> bool {
        self.line
            .get(self.cursor..self.cursor + pattern.len())
            .map_or(false, |slice| slice == pattern)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
