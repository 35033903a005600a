//! Tokenizer with a one-token pushback buffer, shared by both assembler
//! passes. Whitespace and `;`-to-end-of-line comments are skipped here so
//! neither pass has to think about them.

use super::error::{Diagnostic, DiagnosticKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Number(i32),
    Str(String),
    Char(u8),
    Punct(char),
    Newline,
    Eof,
}

/// A token plus the 1-based line/column it started at.
pub type Positioned = (Token, usize, usize);

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    col: usize,
    pushback: Option<Positioned>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.chars().peekable(),
            line: 1,
            col: 1,
            pushback: None,
        }
    }

    pub fn push_back(&mut self, token: Positioned) {
        debug_assert!(self.pushback.is_none(), "lexer pushback buffer overwritten");
        self.pushback = Some(token);
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    pub fn next_token(&mut self) -> Result<Positioned, Diagnostic> {
        if let Some(tok) = self.pushback.take() {
            return Ok(tok);
        }

        loop {
            let (line, col) = (self.line, self.col);
            let Some(&ch) = self.chars.peek() else {
                return Ok((Token::Eof, line, col));
            };

            if ch == '\n' {
                self.bump();
                return Ok((Token::Newline, line, col));
            }
            if ch.is_whitespace() {
                self.bump();
                continue;
            }
            if ch == ';' {
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
                continue;
            }
            if ch.is_ascii_alphabetic() || ch == '_' {
                let mut ident = String::new();
                while let Some(&c) = self.chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
                return Ok((Token::Ident(ident), line, col));
            }
            if ch.is_ascii_digit() {
                let value = self.lex_number(line, col)?;
                return Ok((Token::Number(value), line, col));
            }
            if ch == '"' {
                self.bump();
                let s = self.lex_string(line, col)?;
                return Ok((Token::Str(s), line, col));
            }
            if ch == '\'' {
                self.bump();
                let c = self.lex_char(line, col)?;
                return Ok((Token::Char(c), line, col));
            }
            if matches!(ch, ',' | ':' | '[' | ']' | '.' | '+' | '-' | '*') {
                self.bump();
                return Ok((Token::Punct(ch), line, col));
            }

            self.bump();
            return Err(Diagnostic::new(
                line,
                col,
                DiagnosticKind::UnexpectedToken,
                format!("unexpected character '{ch}'"),
            ));
        }
    }

    fn lex_number(&mut self, line: usize, col: usize) -> Result<i32, Diagnostic> {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        parse_number_literal(&text).map_err(|message| {
            Diagnostic::new(line, col, DiagnosticKind::InvalidOperand, message)
        })
    }

    /// Strings pass backslash-escaped characters through literally — `\n`
    /// in source text becomes the two characters `\` and `n`, not a
    /// newline. This only exists so `\"` and `\\` can appear in a string.
    fn lex_string(&mut self, line: usize, col: usize) -> Result<String, Diagnostic> {
        let mut buf = String::new();
        loop {
            match self.chars.peek().copied() {
                None | Some('\n') => {
                    return Err(Diagnostic::new(
                        line,
                        col,
                        DiagnosticKind::UnterminatedString,
                        "unterminated string literal",
                    ));
                }
                Some('"') => {
                    self.bump();
                    return Ok(buf);
                }
                Some('\\') => {
                    self.bump();
                    match self.chars.peek().copied() {
                        Some(c) => {
                            buf.push(c);
                            self.bump();
                        }
                        None => {
                            return Err(Diagnostic::new(
                                line,
                                col,
                                DiagnosticKind::UnterminatedString,
                                "unterminated string escape",
                            ));
                        }
                    }
                }
                Some(c) => {
                    buf.push(c);
                    self.bump();
                }
            }
        }
    }

    /// Character literals interpret the standard escapes, unlike strings.
    fn lex_char(&mut self, line: usize, col: usize) -> Result<u8, Diagnostic> {
        let value = match self.chars.peek().copied() {
            Some('\\') => {
                self.bump();
                let escaped = self.chars.peek().copied().ok_or_else(|| {
                    Diagnostic::new(
                        line,
                        col,
                        DiagnosticKind::UnterminatedString,
                        "unterminated character literal",
                    )
                })?;
                let mapped = match escaped {
                    'n' => b'\n',
                    'r' => b'\r',
                    't' => b'\t',
                    '0' => 0u8,
                    '\\' => b'\\',
                    '\'' => b'\'',
                    other => {
                        return Err(Diagnostic::new(
                            line,
                            col,
                            DiagnosticKind::InvalidOperand,
                            format!("unsupported escape '\\{other}'"),
                        ));
                    }
                };
                self.bump();
                mapped
            }
            Some(c) if c.is_ascii() => {
                self.bump();
                c as u8
            }
            Some(_) => {
                return Err(Diagnostic::new(
                    line,
                    col,
                    DiagnosticKind::InvalidOperand,
                    "character literal must be ASCII",
                ));
            }
            None => {
                return Err(Diagnostic::new(
                    line,
                    col,
                    DiagnosticKind::UnterminatedString,
                    "unterminated character literal",
                ));
            }
        };

        match self.chars.peek().copied() {
            Some('\'') => {
                self.bump();
                Ok(value)
            }
            _ => Err(Diagnostic::new(
                line,
                col,
                DiagnosticKind::UnterminatedString,
                "character literal not closed with a quote",
            )),
        }
    }
}

fn parse_number_literal(text: &str) -> Result<i32, String> {
    if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(rest, 16)
            .map(|v| v as i32)
            .map_err(|_| format!("invalid hex literal '{text}'"))
    } else if let Some(rest) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        i64::from_str_radix(rest, 2)
            .map(|v| v as i32)
            .map_err(|_| format!("invalid binary literal '{text}'"))
    } else {
        text.parse::<i32>()
            .map_err(|_| format!("invalid number literal '{text}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let (tok, _, _) = lexer.next_token().unwrap();
            let done = tok == Token::Eof;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn skips_comments_and_whitespace() {
        let toks = collect("  MOV R0, R1 ; comment\n");
        assert_eq!(
            toks,
            vec![
                Token::Ident("MOV".into()),
                Token::Ident("R0".into()),
                Token::Punct(','),
                Token::Ident("R1".into()),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn number_literal_forms() {
        assert_eq!(collect("123")[0], Token::Number(123));
        assert_eq!(collect("0x4000")[0], Token::Number(0x4000));
        assert_eq!(collect("0b1010")[0], Token::Number(0b1010));
    }

    #[test]
    fn pushback_replays_same_token() {
        let mut lexer = Lexer::new("NOP");
        let first = lexer.next_token().unwrap();
        lexer.push_back(first.clone());
        let replayed = lexer.next_token().unwrap();
        assert_eq!(first, replayed);
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let mut lexer = Lexer::new("\"abc");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::UnterminatedString);
    }

    #[test]
    fn string_escape_is_pass_through_not_interpreted() {
        let mut lexer = Lexer::new("\"a\\nb\"");
        let (tok, _, _) = lexer.next_token().unwrap();
        assert_eq!(tok, Token::Str("anb".to_string()));
    }

    #[test]
    fn char_literal_interprets_standard_escapes() {
        let mut lexer = Lexer::new("'\\n'");
        let (tok, _, _) = lexer.next_token().unwrap();
        assert_eq!(tok, Token::Char(b'\n'));
    }
}
