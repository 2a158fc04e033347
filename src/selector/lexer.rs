//! CSS Selector Lexer
//!
//! Tokenizes selector expressions. Whitespace is a token of its own since
//! it doubles as the descendant combinator.

use crate::error::{Error, Result};

/// Selector token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Names and literals
    Ident(String),
    Str(String),

    // Simple selector prefixes
    Star,        // *
    Dot,         // .
    Hash,        // #
    Colon,       // :
    DoubleColon, // ::

    // Combinators and separators
    Whitespace,
    Greater, // >
    Plus,    // +
    Tilde,   // ~
    Column,  // ||
    Comma,   // ,

    // Brackets
    LeftBracket,  // [
    RightBracket, // ]
    LeftParen,    // (
    RightParen,   // )

    // Attribute operators
    Eq,        // =
    Includes,  // ~=
    DashMatch, // |=
    Prefix,    // ^=
    Suffix,    // $=
    Substring, // *=

    // End of input
    Eof,
}

/// Selector lexer
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Tokenize the whole input; each token carries its byte offset
    pub fn tokenize(mut self) -> Result<Vec<(Token, usize)>> {
        let mut tokens = Vec::new();
        loop {
            let start = self.pos;
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push((token, start));
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token> {
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        if c.is_ascii_whitespace() {
            while self.peek().map_or(false, |c| c.is_ascii_whitespace()) {
                self.advance(1);
            }
            return Ok(Token::Whitespace);
        }

        let followed_by_eq = self.peek_at(1) == Some('=');
        let token = match c {
            '*' if followed_by_eq => Token::Substring,
            '~' if followed_by_eq => Token::Includes,
            '|' if followed_by_eq => Token::DashMatch,
            '^' if followed_by_eq => Token::Prefix,
            '$' if followed_by_eq => Token::Suffix,
            '|' if self.peek_at(1) == Some('|') => Token::Column,
            ':' if self.peek_at(1) == Some(':') => Token::DoubleColon,
            '*' => Token::Star,
            '~' => Token::Tilde,
            '.' => Token::Dot,
            '#' => Token::Hash,
            ':' => Token::Colon,
            '>' => Token::Greater,
            '+' => Token::Plus,
            ',' => Token::Comma,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '=' => Token::Eq,
            '"' | '\'' => return self.read_string(c),
            c if is_ident_char(c) => return Ok(self.read_ident()),
            _ => {
                return Err(Error::Selector {
                    message: format!("unexpected character '{}'", c),
                    position: self.pos,
                })
            }
        };

        let len = match token {
            Token::Substring
            | Token::Includes
            | Token::DashMatch
            | Token::Prefix
            | Token::Suffix
            | Token::Column
            | Token::DoubleColon => 2,
            _ => 1,
        };
        self.advance(len);
        Ok(token)
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            self.advance(c.len_utf8());
        }
        Token::Ident(self.input[start..self.pos].to_string())
    }

    fn read_string(&mut self, quote: char) -> Result<Token> {
        let open = self.pos;
        self.advance(1);
        let start = self.pos;
        match self.remaining().find(quote) {
            Some(len) => {
                let value = self.input[start..start + len].to_string();
                self.advance(len + 1);
                Ok(Token::Str(value))
            }
            None => Err(Error::Selector {
                message: "unterminated string".to_string(),
                position: open,
            }),
        }
    }
}

/// Name characters: ASCII alphanumerics, `-`, `_` and anything non-ASCII
#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_compound() {
        assert_eq!(
            tokens("div.a#b"),
            vec![
                Token::Ident("div".to_string()),
                Token::Dot,
                Token::Ident("a".to_string()),
                Token::Hash,
                Token::Ident("b".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_combinators() {
        assert_eq!(
            tokens("a > b ~ c + d || e"),
            vec![
                Token::Ident("a".to_string()),
                Token::Whitespace,
                Token::Greater,
                Token::Whitespace,
                Token::Ident("b".to_string()),
                Token::Whitespace,
                Token::Tilde,
                Token::Whitespace,
                Token::Ident("c".to_string()),
                Token::Whitespace,
                Token::Plus,
                Token::Whitespace,
                Token::Ident("d".to_string()),
                Token::Whitespace,
                Token::Column,
                Token::Whitespace,
                Token::Ident("e".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_attribute_operators() {
        assert_eq!(
            tokens("[a~=b][c|=d][e^='f'][g$=\"h\"][i*=j]"),
            vec![
                Token::LeftBracket,
                Token::Ident("a".to_string()),
                Token::Includes,
                Token::Ident("b".to_string()),
                Token::RightBracket,
                Token::LeftBracket,
                Token::Ident("c".to_string()),
                Token::DashMatch,
                Token::Ident("d".to_string()),
                Token::RightBracket,
                Token::LeftBracket,
                Token::Ident("e".to_string()),
                Token::Prefix,
                Token::Str("f".to_string()),
                Token::RightBracket,
                Token::LeftBracket,
                Token::Ident("g".to_string()),
                Token::Suffix,
                Token::Str("h".to_string()),
                Token::RightBracket,
                Token::LeftBracket,
                Token::Ident("i".to_string()),
                Token::Substring,
                Token::Ident("j".to_string()),
                Token::RightBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_pseudo() {
        assert_eq!(
            tokens("p::before:not(a)"),
            vec![
                Token::Ident("p".to_string()),
                Token::DoubleColon,
                Token::Ident("before".to_string()),
                Token::Colon,
                Token::Ident("not".to_string()),
                Token::LeftParen,
                Token::Ident("a".to_string()),
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let toks = Lexer::new("a .b").tokenize().unwrap();
        let positions: Vec<usize> = toks.iter().map(|&(_, p)| p).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("[a='b]").tokenize().unwrap_err();
        assert!(matches!(err, Error::Selector { position: 3, .. }));
    }

    #[test]
    fn test_unexpected_character() {
        assert!(Lexer::new("a | b").tokenize().is_err());
        assert!(Lexer::new("a;").tokenize().is_err());
    }
}
