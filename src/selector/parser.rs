//! CSS Selector Parser
//!
//! Recursive descent over the token stream into a selector list.

use super::lexer::{Lexer, Token};
use crate::error::{Error, Result};

/// Comma-separated selectors; a node matches if any of them does
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

/// Compound selectors joined by combinators, left to right
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub head: Compound,
    pub tail: Vec<(Combinator, Compound)>,
}

/// `:has()` argument: a selector anchored at the subject
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeSelector {
    pub combinator: Combinator,
    pub selector: ComplexSelector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
    /// `~`
    Sibling,
    /// `+`
    Adjacent,
    /// `||`
    Column,
}

/// Simple selectors that all apply to the same element
#[derive(Debug, Clone, PartialEq)]
pub struct Compound(pub Vec<Simple>);

#[derive(Debug, Clone, PartialEq)]
pub enum Simple {
    /// Element name, lowercase
    Type(String),
    /// `*`
    Universal,
    Class(String),
    Id(String),
    Attribute(AttributeSelector),
    /// Non-functional pseudo-class, lowercase name
    PseudoClass(String),
    Is(SelectorList),
    Where(SelectorList),
    Not(SelectorList),
    Has(Vec<RelativeSelector>),
    PseudoElement(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    /// Attribute name, lowercase
    pub name: String,
    pub op: AttrOp,
    pub value: String,
    pub case_insensitive: bool,
}

/// Attribute operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `[a]`
    Has,
    /// `[a=v]`
    Equals,
    /// `[a~=v]` one of the whitespace-separated words
    Includes,
    /// `[a|=v]` exactly `v` or starting with `v-`
    DashMatch,
    /// `[a^=v]`
    Prefix,
    /// `[a$=v]`
    Suffix,
    /// `[a*=v]`
    Substring,
}

impl SelectorList {
    /// Parse a selector expression
    pub fn parse(input: &str) -> Result<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        let mut parser = Parser { tokens, pos: 0 };

        parser.skip_whitespace();
        if parser.peek() == &Token::Eof {
            return Err(parser.error("empty selector"));
        }
        let list = parser.parse_list()?;
        parser.skip_whitespace();
        match parser.peek() {
            Token::Eof => Ok(list),
            Token::RightParen => Err(parser.error("unbalanced ')'")),
            _ => Err(parser.error("unexpected token")),
        }
    }
}

/// Selector parser
struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&Token::Eof, |(t, _)| t)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(0, |&(_, p)| p)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token != Token::Eof {
            self.pos += 1;
        }
        token
    }

    /// Returns true if any whitespace was skipped
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek() == &Token::Whitespace {
            self.pos += 1;
            skipped = true;
        }
        skipped
    }

    fn error(&self, message: &str) -> Error {
        Error::Selector {
            message: message.to_string(),
            position: self.position(),
        }
    }

    fn expect(&mut self, token: Token, message: &str) -> Result<()> {
        if self.peek() == &token {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn parse_list(&mut self) -> Result<SelectorList> {
        let mut selectors = vec![self.parse_complex()?];
        loop {
            self.skip_whitespace();
            if self.peek() != &Token::Comma {
                return Ok(SelectorList(selectors));
            }
            self.advance();
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
        }
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector> {
        let head = self.parse_compound()?;
        let mut tail = Vec::new();

        loop {
            let save = self.pos;
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.combinator() {
                Some(c) => {
                    self.advance();
                    self.skip_whitespace();
                    c
                }
                None if had_whitespace && self.starts_compound() => Combinator::Descendant,
                None => {
                    // Trailing whitespace belongs to the caller
                    self.pos = save;
                    return Ok(ComplexSelector { head, tail });
                }
            };
            if !self.starts_compound() {
                return Err(self.error("expected selector after combinator"));
            }
            tail.push((combinator, self.parse_compound()?));
        }
    }

    fn parse_relative(&mut self) -> Result<RelativeSelector> {
        let combinator = match self.combinator() {
            Some(c) => {
                self.advance();
                self.skip_whitespace();
                c
            }
            None => Combinator::Descendant,
        };
        let selector = self.parse_complex()?;
        Ok(RelativeSelector { combinator, selector })
    }

    fn combinator(&self) -> Option<Combinator> {
        match self.peek() {
            Token::Greater => Some(Combinator::Child),
            Token::Tilde => Some(Combinator::Sibling),
            Token::Plus => Some(Combinator::Adjacent),
            Token::Column => Some(Combinator::Column),
            _ => None,
        }
    }

    fn starts_compound(&self) -> bool {
        matches!(
            self.peek(),
            Token::Ident(_)
                | Token::Star
                | Token::Dot
                | Token::Hash
                | Token::LeftBracket
                | Token::Colon
                | Token::DoubleColon
        )
    }

    fn parse_compound(&mut self) -> Result<Compound> {
        let mut parts = Vec::new();

        match self.peek() {
            Token::Ident(name) => {
                parts.push(Simple::Type(name.to_ascii_lowercase()));
                self.advance();
            }
            Token::Star => {
                parts.push(Simple::Universal);
                self.advance();
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Token::Dot => {
                    self.advance();
                    parts.push(Simple::Class(self.ident("expected class name")?));
                }
                Token::Hash => {
                    self.advance();
                    parts.push(Simple::Id(self.ident("expected id")?));
                }
                Token::LeftBracket => {
                    self.advance();
                    parts.push(Simple::Attribute(self.parse_attribute()?));
                }
                Token::Colon => {
                    self.advance();
                    parts.push(self.parse_pseudo_class()?);
                }
                Token::DoubleColon => {
                    self.advance();
                    let name = self.ident("expected pseudo-element name")?;
                    parts.push(Simple::PseudoElement(name.to_ascii_lowercase()));
                }
                _ => break,
            }
        }

        if parts.is_empty() {
            return Err(self.error("expected selector"));
        }
        Ok(Compound(parts))
    }

    fn ident(&mut self, message: &str) -> Result<String> {
        match self.peek() {
            Token::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error(message)),
        }
    }

    /// Attribute selector body; the `[` is already consumed
    fn parse_attribute(&mut self) -> Result<AttributeSelector> {
        self.skip_whitespace();
        if self.peek() == &Token::Eof {
            return Err(self.error("unterminated attribute selector"));
        }
        let name = self.ident("expected attribute name")?.to_ascii_lowercase();
        self.skip_whitespace();

        let op = match self.peek() {
            Token::RightBracket => {
                self.advance();
                return Ok(AttributeSelector {
                    name,
                    op: AttrOp::Has,
                    value: String::new(),
                    case_insensitive: false,
                });
            }
            Token::Eq => AttrOp::Equals,
            Token::Includes => AttrOp::Includes,
            Token::DashMatch => AttrOp::DashMatch,
            Token::Prefix => AttrOp::Prefix,
            Token::Suffix => AttrOp::Suffix,
            Token::Substring => AttrOp::Substring,
            Token::Eof => return Err(self.error("unterminated attribute selector")),
            _ => return Err(self.error("expected attribute operator")),
        };
        self.advance();
        self.skip_whitespace();

        let value = match self.advance() {
            Token::Ident(v) | Token::Str(v) => v,
            Token::Eof => return Err(self.error("unterminated attribute selector")),
            _ => return Err(self.error("expected attribute value")),
        };
        self.skip_whitespace();

        let mut case_insensitive = false;
        if let Token::Ident(flag) = self.peek() {
            match flag.as_str() {
                "i" | "I" => case_insensitive = true,
                "s" | "S" => {}
                _ => return Err(self.error("unknown attribute flag")),
            }
            self.advance();
            self.skip_whitespace();
        }

        if self.peek() == &Token::Eof {
            return Err(self.error("unterminated attribute selector"));
        }
        self.expect(Token::RightBracket, "expected ']'")?;
        Ok(AttributeSelector {
            name,
            op,
            value,
            case_insensitive,
        })
    }

    /// Pseudo-class; the `:` is already consumed
    fn parse_pseudo_class(&mut self) -> Result<Simple> {
        let name = self.ident("expected pseudo-class name")?.to_ascii_lowercase();
        if self.peek() != &Token::LeftParen {
            return Ok(Simple::PseudoClass(name));
        }
        let name_position = self.position();
        self.advance();
        self.skip_whitespace();

        let simple = match name.as_str() {
            "is" => Simple::Is(self.parse_list()?),
            "where" => Simple::Where(self.parse_list()?),
            "not" => Simple::Not(self.parse_list()?),
            "has" => {
                let mut relative = vec![self.parse_relative()?];
                loop {
                    self.skip_whitespace();
                    if self.peek() != &Token::Comma {
                        break;
                    }
                    self.advance();
                    self.skip_whitespace();
                    relative.push(self.parse_relative()?);
                }
                Simple::Has(relative)
            }
            _ => {
                return Err(Error::Selector {
                    message: format!("unknown functional pseudo-class ':{}()'", name),
                    position: name_position,
                })
            }
        };

        self.skip_whitespace();
        if self.peek() == &Token::Eof {
            return Err(self.error("unterminated parenthesis"));
        }
        self.expect(Token::RightParen, "expected ')'")?;
        Ok(simple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(input: &str) -> ComplexSelector {
        let mut list = SelectorList::parse(input).unwrap();
        assert_eq!(list.0.len(), 1);
        list.0.remove(0)
    }

    fn message(input: &str) -> String {
        match SelectorList::parse(input) {
            Err(Error::Selector { message, .. }) => message,
            other => panic!("expected selector error, got {:?}", other),
        }
    }

    #[test]
    fn test_compound() {
        let sel = single("DIV.a#b[c]");
        assert!(sel.tail.is_empty());
        assert_eq!(
            sel.head.0,
            vec![
                Simple::Type("div".to_string()),
                Simple::Class("a".to_string()),
                Simple::Id("b".to_string()),
                Simple::Attribute(AttributeSelector {
                    name: "c".to_string(),
                    op: AttrOp::Has,
                    value: String::new(),
                    case_insensitive: false,
                }),
            ]
        );
    }

    #[test]
    fn test_combinators() {
        let sel = single(" a b>c ~ d+e || f ");
        let combinators: Vec<_> = sel.tail.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            combinators,
            vec![
                Combinator::Descendant,
                Combinator::Child,
                Combinator::Sibling,
                Combinator::Adjacent,
                Combinator::Column,
            ]
        );
    }

    #[test]
    fn test_union() {
        let list = SelectorList::parse("a, b ,c").unwrap();
        assert_eq!(list.0.len(), 3);
    }

    #[test]
    fn test_attribute_selector() {
        let sel = single("[ Lang |= \"en\" i ]");
        assert_eq!(
            sel.head.0,
            vec![Simple::Attribute(AttributeSelector {
                name: "lang".to_string(),
                op: AttrOp::DashMatch,
                value: "en".to_string(),
                case_insensitive: true,
            })]
        );
    }

    #[test]
    fn test_functional_pseudo_classes() {
        let sel = single("li:not(.a, .b):has(> span)::marker");
        assert_eq!(sel.head.0.len(), 4);
        match &sel.head.0[1] {
            Simple::Not(list) => assert_eq!(list.0.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        match &sel.head.0[2] {
            Simple::Has(rel) => assert_eq!(rel[0].combinator, Combinator::Child),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(sel.head.0[3], Simple::PseudoElement("marker".to_string()));
    }

    #[test]
    fn test_nested_parentheses() {
        let sel = single(":is(a:not(:has(b)))");
        assert!(matches!(sel.head.0[0], Simple::Is(_)));
    }

    #[test]
    fn test_errors() {
        assert_eq!(message(""), "empty selector");
        assert_eq!(message("   "), "empty selector");
        assert_eq!(message("a >"), "expected selector after combinator");
        assert_eq!(message("a + ,b"), "expected selector after combinator");
        assert_eq!(message("[href"), "unterminated attribute selector");
        assert_eq!(message("[href="), "unterminated attribute selector");
        assert_eq!(message(":not(a"), "unterminated parenthesis");
        assert_eq!(message(":nth-child(2)"), "unknown functional pseudo-class ':nth-child()'");
        assert_eq!(message("a)"), "unbalanced ')'");
        assert_eq!(message("a,"), "expected selector");
        assert_eq!(message("[a='x]"), "unterminated string");
    }

    #[test]
    fn test_error_position() {
        match SelectorList::parse("div > ") {
            Err(Error::Selector { position, .. }) => assert_eq!(position, 6),
            other => panic!("unexpected {:?}", other),
        }
    }
}
