//! SQL lexer for tokenizing DDL input.
//!
//! Keywords are not lexed into dedicated variants: most MySQL keywords are
//! non-reserved and may appear as identifiers, so the parser matches bare
//! words case-insensitively where the grammar expects a keyword.

use alloc::string::{String, ToString};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The position in the input where this token starts.
    pub pos: usize,
}

/// The different kinds of tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal
    IntegerLiteral(i64),
    /// Real/float literal
    RealLiteral(f64),
    /// String literal (single or double quoted)
    StringLiteral(String),
    /// Hex literal (`X'..'` or `0x..`), digits kept verbatim
    HexLiteral(String),
    /// Bit literal (`b'..'` or `0b..`), digits kept verbatim
    BitLiteral(String),

    // Identifiers
    /// A bare word: identifier or keyword
    Word(String),
    /// A backtick-quoted identifier, never a keyword
    QuotedIdentifier(String),

    // Symbols
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
    /// Comma
    Comma,
    /// Semicolon
    Semicolon,
    /// Equals sign
    Equals,
    /// Minus sign
    Minus,
    /// Plus sign
    Plus,
    /// Dot
    Dot,
    /// Any other operator character inside expressions
    Operator(char),

    // Special
    /// End of input
    Eof,
}

impl TokenKind {
    /// Whether this token is the bare word `keyword`, ignoring case.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, TokenKind::Word(word) if word.eq_ignore_ascii_case(keyword))
    }
}

/// SQL lexer that produces tokens from input.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            peeked: None,
        }
    }

    /// Get the current position in the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Slice of the input between two byte offsets.
    #[must_use]
    pub fn source(&self, start: usize, end: usize) -> &'a str {
        self.input.get(start..end).unwrap_or_default()
    }

    /// Peek at the next token without consuming it.
    ///
    /// # Errors
    ///
    /// Returns an error if the next token cannot be lexed.
    pub fn peek(&mut self) -> Result<&Token, LexerError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Consume and return the next token.
    ///
    /// # Errors
    ///
    /// Returns an error if the next token cannot be lexed.
    pub fn next(&mut self) -> Result<Token, LexerError> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }
        self.next_token()
    }

    /// Skip whitespace and comments.
    fn skip_whitespace(&mut self) -> Result<(), LexerError> {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if (b == b'-' && bytes.get(self.pos + 1) == Some(&b'-')) || b == b'#' {
                // Line comment
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else if b == b'/' && bytes.get(self.pos + 1) == Some(&b'*') {
                // Block comment
                let start = self.pos;
                self.pos += 2;
                while self.pos + 1 < bytes.len()
                    && !(bytes[self.pos] == b'*' && bytes[self.pos + 1] == b'/')
                {
                    self.pos += 1;
                }
                if self.pos + 1 >= bytes.len() {
                    return Err(LexerError::UnterminatedComment { pos: start });
                }
                self.pos += 2;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace()?;

        let start_pos = self.pos;
        let bytes = self.input.as_bytes();

        if self.pos >= bytes.len() {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos: start_pos,
            });
        }

        let b = bytes[self.pos];
        let next = bytes.get(self.pos + 1).copied();

        // Single-character symbols
        let kind = match b {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'=' => TokenKind::Equals,
            b'-' => TokenKind::Minus,
            b'+' => TokenKind::Plus,
            b'.' if !next.is_some_and(|n| n.is_ascii_digit()) => TokenKind::Dot,
            b'\'' | b'"' => return self.read_string(start_pos),
            b'`' => return self.read_quoted_identifier(start_pos),
            b'X' | b'x' if next == Some(b'\'') => return self.read_prefixed_literal(start_pos),
            b'B' | b'b' if next == Some(b'\'') => return self.read_prefixed_literal(start_pos),
            b'0' if matches!(next, Some(b'x' | b'b')) => {
                return self.read_radix_literal(start_pos);
            }
            _ if b.is_ascii_digit() || b == b'.' => return self.read_number(start_pos),
            _ if is_ident_start(b) => return Ok(self.read_word(start_pos)),
            b'*' | b'/' | b'%' | b'<' | b'>' | b'!' | b'&' | b'|' | b'^' | b'~' | b':' | b'@'
            | b'?' => TokenKind::Operator(b as char),
            _ => {
                let char = self.input[self.pos..].chars().next().unwrap_or('\u{fffd}');
                return Err(LexerError::UnexpectedChar {
                    char,
                    pos: start_pos,
                });
            }
        };
        self.pos += 1;

        Ok(Token {
            kind,
            pos: start_pos,
        })
    }

    fn read_string(&mut self, start_pos: usize) -> Result<Token, LexerError> {
        let rest = &self.input[self.pos..];
        let mut chars = rest.char_indices();
        let Some((_, quote)) = chars.next() else {
            return Err(LexerError::UnterminatedString { pos: start_pos });
        };

        let mut value = String::new();
        while let Some((offset, c)) = chars.next() {
            if c == quote {
                // Check for escaped quote (doubled)
                if rest[offset + c.len_utf8()..].starts_with(quote) {
                    value.push(quote);
                    chars.next();
                } else {
                    self.pos += offset + c.len_utf8();
                    return Ok(Token {
                        kind: TokenKind::StringLiteral(value),
                        pos: start_pos,
                    });
                }
            } else if c == '\\' {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    'b' => '\u{8}',
                    'Z' => '\u{1a}',
                    other => other,
                });
            } else {
                value.push(c);
            }
        }

        Err(LexerError::UnterminatedString { pos: start_pos })
    }

    fn read_quoted_identifier(&mut self, start_pos: usize) -> Result<Token, LexerError> {
        let rest = &self.input[self.pos + 1..];
        let mut value = String::new();
        let mut offset = 0;

        while let Some(end) = rest[offset..].find('`') {
            value.push_str(&rest[offset..offset + end]);
            offset += end + 1;
            // Doubled backtick is a literal backtick
            if rest[offset..].starts_with('`') {
                value.push('`');
                offset += 1;
            } else {
                self.pos += 1 + offset;
                return Ok(Token {
                    kind: TokenKind::QuotedIdentifier(value),
                    pos: start_pos,
                });
            }
        }

        Err(LexerError::UnterminatedIdentifier { pos: start_pos })
    }

    /// `X'..'` or `b'..'`.
    fn read_prefixed_literal(&mut self, start_pos: usize) -> Result<Token, LexerError> {
        let bytes = self.input.as_bytes();
        let is_hex = bytes[self.pos].eq_ignore_ascii_case(&b'x');
        self.pos += 2;

        let digits_start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos] != b'\'' {
            let b = bytes[self.pos];
            if !is_literal_digit(b, is_hex) {
                return Err(LexerError::InvalidDigit {
                    char: b as char,
                    pos: self.pos,
                });
            }
            self.pos += 1;
        }

        if self.pos >= bytes.len() {
            return Err(LexerError::UnterminatedString { pos: start_pos });
        }

        let digits = self.input[digits_start..self.pos].to_string();
        self.pos += 1; // Skip closing quote

        Ok(Token {
            kind: if is_hex {
                TokenKind::HexLiteral(digits)
            } else {
                TokenKind::BitLiteral(digits)
            },
            pos: start_pos,
        })
    }

    /// `0x..` or `0b..`.
    fn read_radix_literal(&mut self, start_pos: usize) -> Result<Token, LexerError> {
        let bytes = self.input.as_bytes();
        let is_hex = bytes[self.pos + 1] == b'x';
        let digits_start = self.pos + 2;
        let mut end = digits_start;
        while end < bytes.len() && is_literal_digit(bytes[end], is_hex) {
            end += 1;
        }

        // Not a literal after all (e.g. `0b` followed by a non-digit): lex as a number.
        if end == digits_start || bytes.get(end).is_some_and(|b| is_ident_cont(*b)) {
            return self.read_number(start_pos);
        }

        let digits = self.input[digits_start..end].to_string();
        self.pos = end;
        Ok(Token {
            kind: if is_hex {
                TokenKind::HexLiteral(digits)
            } else {
                TokenKind::BitLiteral(digits)
            },
            pos: start_pos,
        })
    }

    fn read_number(&mut self, start_pos: usize) -> Result<Token, LexerError> {
        let bytes = self.input.as_bytes();
        let num_start = self.pos;

        // Read integer part
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }

        // Check for decimal point
        let mut is_real = false;
        if self.pos < bytes.len() && bytes[self.pos] == b'.' {
            is_real = true;
            self.pos += 1;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }

        // Check for exponent
        if self.pos < bytes.len() && (bytes[self.pos] == b'e' || bytes[self.pos] == b'E') {
            is_real = true;
            self.pos += 1;
            if self.pos < bytes.len() && (bytes[self.pos] == b'+' || bytes[self.pos] == b'-') {
                self.pos += 1;
            }
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }

        // Identifiers may start with digits (`1st_col`)
        if !is_real && self.pos < bytes.len() && is_ident_cont(bytes[self.pos]) {
            self.pos = num_start;
            return Ok(self.read_word(start_pos));
        }

        let num_str = &self.input[num_start..self.pos];

        if is_real {
            match num_str.parse::<f64>() {
                Ok(v) => Ok(Token {
                    kind: TokenKind::RealLiteral(v),
                    pos: start_pos,
                }),
                Err(_) => Err(LexerError::InvalidNumber {
                    value: num_str.into(),
                    pos: start_pos,
                }),
            }
        } else {
            match num_str.parse::<i64>() {
                Ok(v) => Ok(Token {
                    kind: TokenKind::IntegerLiteral(v),
                    pos: start_pos,
                }),
                Err(_) => {
                    // Try as f64 if too large for i64
                    match num_str.parse::<f64>() {
                        Ok(v) => Ok(Token {
                            kind: TokenKind::RealLiteral(v),
                            pos: start_pos,
                        }),
                        Err(_) => Err(LexerError::InvalidNumber {
                            value: num_str.into(),
                            pos: start_pos,
                        }),
                    }
                }
            }
        }
    }

    fn read_word(&mut self, start_pos: usize) -> Token {
        let bytes = self.input.as_bytes();
        let ident_start = self.pos;

        while self.pos < bytes.len() && is_ident_cont(bytes[self.pos]) {
            self.pos += 1;
        }

        Token {
            kind: TokenKind::Word(self.input[ident_start..self.pos].into()),
            pos: start_pos,
        }
    }
}

/// Check if a byte can start an identifier.
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

/// Check if a byte can continue an identifier.
fn is_ident_cont(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_literal_digit(b: u8, is_hex: bool) -> bool {
    if is_hex {
        b.is_ascii_hexdigit()
    } else {
        b == b'0' || b == b'1'
    }
}

/// Errors that can occur during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// Unexpected character in input.
    #[error("Unexpected character '{char}' at position {pos}")]
    UnexpectedChar {
        /// The unexpected character.
        char: char,
        /// Position in input.
        pos: usize,
    },
    /// Unterminated string literal.
    #[error("Unterminated string literal starting at position {pos}")]
    UnterminatedString {
        /// Position where string started.
        pos: usize,
    },
    /// Unterminated backtick-quoted identifier.
    #[error("Unterminated quoted identifier starting at position {pos}")]
    UnterminatedIdentifier {
        /// Position where the identifier started.
        pos: usize,
    },
    /// Unterminated block comment.
    #[error("Unterminated comment starting at position {pos}")]
    UnterminatedComment {
        /// Position where the comment started.
        pos: usize,
    },
    /// Invalid digit in a hex or bit literal.
    #[error("Invalid digit '{char}' at position {pos}")]
    InvalidDigit {
        /// The invalid character.
        char: char,
        /// Position in input.
        pos: usize,
    },
    /// Invalid number format.
    #[error("Invalid number '{value}' at position {pos}")]
    InvalidNumber {
        /// The invalid number string.
        value: String,
        /// Position in input.
        pos: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> TokenKind {
        TokenKind::Word(s.into())
    }

    #[test]
    fn test_words_keep_case() {
        let mut lexer = Lexer::new("CREATE table my_table _private $x");
        assert_eq!(lexer.next().unwrap().kind, word("CREATE"));
        assert!(lexer.next().unwrap().kind.is_keyword("TABLE"));
        assert_eq!(lexer.next().unwrap().kind, word("my_table"));
        assert_eq!(lexer.next().unwrap().kind, word("_private"));
        assert_eq!(lexer.next().unwrap().kind, word("$x"));
        assert_eq!(lexer.next().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_quoted_identifiers() {
        let mut lexer = Lexer::new("`order` `we``ird`");
        assert_eq!(
            lexer.next().unwrap().kind,
            TokenKind::QuotedIdentifier("order".into())
        );
        assert_eq!(
            lexer.next().unwrap().kind,
            TokenKind::QuotedIdentifier("we`ird".into())
        );
        assert!(!TokenKind::QuotedIdentifier("order".into()).is_keyword("order"));
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("42 -100 2.25 1e10 .5 1st");
        assert_eq!(lexer.next().unwrap().kind, TokenKind::IntegerLiteral(42));
        assert_eq!(lexer.next().unwrap().kind, TokenKind::Minus);
        assert_eq!(lexer.next().unwrap().kind, TokenKind::IntegerLiteral(100));
        assert_eq!(lexer.next().unwrap().kind, TokenKind::RealLiteral(2.25));
        assert_eq!(lexer.next().unwrap().kind, TokenKind::RealLiteral(1e10));
        assert_eq!(lexer.next().unwrap().kind, TokenKind::RealLiteral(0.5));
        assert_eq!(lexer.next().unwrap().kind, word("1st"));
    }

    #[test]
    fn test_strings() {
        let mut lexer = Lexer::new(r#"'hello' "world" 'it''s' 'a\'b' 'héllo'"#);
        assert_eq!(
            lexer.next().unwrap().kind,
            TokenKind::StringLiteral("hello".into())
        );
        assert_eq!(
            lexer.next().unwrap().kind,
            TokenKind::StringLiteral("world".into())
        );
        assert_eq!(
            lexer.next().unwrap().kind,
            TokenKind::StringLiteral("it's".into())
        );
        assert_eq!(
            lexer.next().unwrap().kind,
            TokenKind::StringLiteral("a'b".into())
        );
        assert_eq!(
            lexer.next().unwrap().kind,
            TokenKind::StringLiteral("héllo".into())
        );
    }

    #[test]
    fn test_hex_and_bit_literals() {
        let mut lexer = Lexer::new("X'DEADBEEF' b'101' 0x1F 0b11");
        assert_eq!(
            lexer.next().unwrap().kind,
            TokenKind::HexLiteral("DEADBEEF".into())
        );
        assert_eq!(lexer.next().unwrap().kind, TokenKind::BitLiteral("101".into()));
        assert_eq!(lexer.next().unwrap().kind, TokenKind::HexLiteral("1F".into()));
        assert_eq!(lexer.next().unwrap().kind, TokenKind::BitLiteral("11".into()));
    }

    #[test]
    fn test_comments_are_skipped() {
        let mut lexer = Lexer::new("-- line\n# hash\n/* block */ id");
        assert_eq!(lexer.next().unwrap().kind, word("id"));
    }

    #[test]
    fn test_unterminated_inputs() {
        assert!(matches!(
            Lexer::new("'abc").next(),
            Err(LexerError::UnterminatedString { pos: 0 })
        ));
        assert!(matches!(
            Lexer::new("`abc").next(),
            Err(LexerError::UnterminatedIdentifier { pos: 0 })
        ));
        assert!(matches!(
            Lexer::new("/* abc").next(),
            Err(LexerError::UnterminatedComment { pos: 0 })
        ));
    }

    #[test]
    fn test_symbols() {
        let mut lexer = Lexer::new("(),;=.");
        assert_eq!(lexer.next().unwrap().kind, TokenKind::LParen);
        assert_eq!(lexer.next().unwrap().kind, TokenKind::RParen);
        assert_eq!(lexer.next().unwrap().kind, TokenKind::Comma);
        assert_eq!(lexer.next().unwrap().kind, TokenKind::Semicolon);
        assert_eq!(lexer.next().unwrap().kind, TokenKind::Equals);
        assert_eq!(lexer.next().unwrap().kind, TokenKind::Dot);
    }
}
