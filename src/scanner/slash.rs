//! Slash command tokenizing
//!
//! After [`ScanState::scan`] reports a backslash, the dispatcher pulls the
//! command name and its arguments from the rest of the line through these
//! methods.

use super::state::ScanState;

/// How an argument word is extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// A single whitespace-delimited word; `'...'` quoting is removed
    Normal,
    /// Everything up to the end of the line, backslashes included
    WholeLine,
}

impl ScanState {
    /// Read the command name following a backslash
    pub fn scan_slash_command(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.peek(0) {
            if ch.is_whitespace() || ch == '\\' {
                break;
            }
            name.push(ch);
            self.cursor += 1;
        }
        name
    }

    /// Read the next argument of the current slash command.
    ///
    /// Returns `None` when the line is exhausted or, for a normal word, when
    /// the next word starts a new backslash sequence. An explicitly quoted
    /// empty word (`''`) is returned as `Some("")`.
    pub fn scan_slash_option(&mut self, kind: OptionKind) -> Option<String> {
        self.skip_whitespace();

        match (self.peek(0), kind) {
            (None, _) | (Some('\\'), OptionKind::Normal) => return None,
            _ => {}
        }

        match kind {
            OptionKind::WholeLine => {
                let rest: String = self.line[self.cursor..].iter().collect();
                self.cursor = self.line.len();
                let rest = rest.trim_end().to_string();
                if rest.is_empty() {
                    None
                } else {
                    Some(rest)
                }
            }
            OptionKind::Normal => Some(self.scan_word()),
        }
    }

    /// Finish the current slash command.
    ///
    /// A `\\` separator is swallowed so the remainder of the line is scanned
    /// as SQL again.
    pub fn scan_slash_command_end(&mut self) {
        self.skip_whitespace();
        if self.looking_at(&['\\', '\\']) {
            self.cursor += 2;
        }
        self.start_segment();
    }

    fn scan_word(&mut self) -> String {
        let mut word = String::new();

        while let Some(ch) = self.peek(0) {
            if ch.is_whitespace() || ch == '\\' {
                break;
            }

            match ch {
                '\'' => {
                    self.cursor += 1;
                    self.scan_single_quoted(&mut word);
                }
                '"' => {
                    word.push(ch);
                    self.cursor += 1;
                    self.scan_double_quoted(&mut word);
                }
                _ => {
                    word.push(ch);
                    self.cursor += 1;
                }
            }
        }

        word
    }

    fn scan_single_quoted(&mut self, word: &mut String) {
        while let Some(ch) = self.peek(0) {
            self.cursor += 1;
            if ch == '\'' {
                if self.peek(0) == Some('\'') {
                    word.push('\'');
                    self.cursor += 1;
                    continue;
                }
                return;
            }
            word.push(ch);
        }
    }

    fn scan_double_quoted(&mut self, word: &mut String) {
        while let Some(ch) = self.peek(0) {
            word.push(ch);
            self.cursor += 1;
            if ch == '"' {
                if self.peek(0) == Some('"') {
                    word.push('"');
                    self.cursor += 1;
                    continue;
                }
                return;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(0), Some(ch) if ch.is_whitespace()) {
            self.cursor += 1;
        }
    }
}
