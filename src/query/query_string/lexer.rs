//! Lexer for query string syntax
//!
//! Tokenizes sanitized query strings into a stream of tokens. Word tokens
//! cover both search words and field names; the parser narrows a word to a
//! field name where the grammar needs one.

use crate::error::SearchqlError;
use crate::query::ast::{Operator, Quote};
use crate::Result;

/// Token types for query string parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A bare word: alphanumerics plus `_ ! ? * -`
    Word(String),
    /// A quoted multi-word literal: alphanumerics and spaces
    Quoted { text: String, quote: Quote },
    /// Caret followed by the boost literal, kept as typed
    Caret(String),
    /// Comparison operator
    Operator(Operator),

    /// OR keyword (case-sensitive)
    Or,
    /// Minus at the start of a clause (negation)
    Minus,
    /// Colon separator (field:value)
    Colon,
    /// Left square bracket (range start)
    LeftBracket,
    /// Right square bracket (range end)
    RightBracket,
    /// Comma between range bounds
    Comma,

    /// End of input
    Eof,
}

impl Token {
    /// Check if this token can begin a clause
    pub fn starts_clause(&self) -> bool {
        matches!(self, Token::Word(_) | Token::Quoted { .. } | Token::Minus)
    }
}

/// Lexer for tokenizing query strings
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
    /// Set after tokens that must be followed by a value, where `-` is literal
    expects_value: bool,
}

impl Lexer {
    /// Create a new lexer for the given input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
            expects_value: false,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        let token = self.scan_token()?;
        self.expects_value = matches!(
            token,
            Token::Colon | Token::Operator(_) | Token::LeftBracket | Token::Comma | Token::Minus
        );
        Ok(token)
    }

    fn scan_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        self.token_start = self.position;

        if self.position >= self.input.len() {
            return Ok(Token::Eof);
        }

        let ch = self.current_char();

        match ch {
            ':' => {
                self.advance();
                Ok(Token::Colon)
            }
            '[' => {
                self.advance();
                Ok(Token::LeftBracket)
            }
            ']' => {
                self.advance();
                Ok(Token::RightBracket)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            '^' => {
                self.advance();
                self.read_float()
            }
            '>' | '<' => {
                self.advance();
                let or_equal = self.position < self.input.len() && self.current_char() == '=';
                if or_equal {
                    self.advance();
                }
                Ok(Token::Operator(match (ch, or_equal) {
                    ('>', false) => Operator::GreaterThan,
                    ('>', true) => Operator::GreaterThanOrEqual,
                    ('<', false) => Operator::LessThan,
                    _ => Operator::LessThanOrEqual,
                }))
            }
            '\'' | '"' => {
                self.advance();
                let quote = if ch == '"' { Quote::Double } else { Quote::Single };
                self.read_quoted(quote)
            }
            '-' if !self.expects_value => {
                self.advance();
                Ok(Token::Minus)
            }
            _ if Self::is_word_char(ch) => Ok(self.read_word()),
            _ => Err(SearchqlError::syntax(
                self.position,
                format!("Unexpected character '{}'", ch),
            )),
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek_token(&mut self) -> Result<Token> {
        let saved_position = self.position;
        let saved_start = self.token_start;
        let saved_expects_value = self.expects_value;
        let token = self.next_token()?;
        self.position = saved_position;
        self.token_start = saved_start;
        self.expects_value = saved_expects_value;
        Ok(token)
    }

    /// Character offset where the most recently returned token starts
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Get remaining input as string (for error messages)
    pub fn remaining(&self) -> String {
        self.input[self.position..].iter().collect()
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while self.position < self.input.len() {
            let ch = self.current_char();
            if Self::is_word_char(ch) {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if word == "OR" {
            Token::Or
        } else {
            Token::Word(word)
        }
    }

    fn read_quoted(&mut self, quote: Quote) -> Result<Token> {
        let open = self.token_start;
        let mut text = String::new();

        while self.position < self.input.len() {
            let ch = self.current_char();
            if ch == quote.as_char() {
                self.advance();
                if text.is_empty() {
                    return Err(SearchqlError::syntax(open, "Empty quoted literal"));
                }
                return Ok(Token::Quoted { text, quote });
            }
            if !Self::is_multi_word_char(ch) {
                return Err(SearchqlError::syntax(
                    self.position,
                    format!("Unexpected character '{}' in quoted literal", ch),
                ));
            }
            text.push(ch);
            self.advance();
        }

        Err(SearchqlError::syntax(open, "Unterminated quoted literal"))
    }

    /// Read the literal after `^`: digits with an optional fractional part
    fn read_float(&mut self) -> Result<Token> {
        let mut num_str = String::new();
        let mut has_dot = false;

        while self.position < self.input.len() {
            let ch = self.current_char();
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else if ch == '.' && !has_dot && self.peek().is_some_and(|c| c.is_ascii_digit()) {
                has_dot = true;
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if num_str.is_empty() {
            return Err(SearchqlError::syntax(self.position, "Expected number after '^'"));
        }

        Ok(Token::Caret(num_str))
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// Check if a character can be part of a word
    fn is_word_char(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || matches!(ch, '_' | '!' | '?' | '*' | '-')
    }

    fn is_multi_word_char(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == ' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token == Token::Eof {
                break;
            }
            out.push(token);
        }
        out
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_simple_word() {
        let mut lexer = Lexer::new("hello");
        assert_eq!(lexer.next_token().unwrap(), word("hello"));
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn test_word_characters() {
        assert_eq!(tokens("fo*o_ba-r!?"), vec![word("fo*o_ba-r!?")]);
    }

    #[test]
    fn test_field_value() {
        assert_eq!(tokens("title:rust"), vec![word("title"), Token::Colon, word("rust")]);
    }

    #[test]
    fn test_or_keyword_is_case_sensitive() {
        assert_eq!(tokens("a OR b or c"), vec![word("a"), Token::Or, word("b"), word("or"), word("c")]);
    }

    #[test]
    fn test_boost() {
        assert_eq!(tokens("rust^2.5"), vec![word("rust"), Token::Caret("2.5".to_string())]);
        assert_eq!(tokens("rust^3"), vec![word("rust"), Token::Caret("3".to_string())]);
    }

    #[test]
    fn test_boost_requires_number() {
        let mut lexer = Lexer::new("rust^x");
        lexer.next_token().unwrap();
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_negation_at_clause_start() {
        assert_eq!(tokens("-foo"), vec![Token::Minus, word("foo")]);
        assert_eq!(tokens("a -b"), vec![word("a"), Token::Minus, word("b")]);
        assert_eq!(tokens("foo-bar"), vec![word("foo-bar")]);
    }

    #[test]
    fn test_minus_after_finished_token_negates() {
        assert_eq!(
            tokens("rust^2-draft"),
            vec![word("rust"), Token::Caret("2".to_string()), Token::Minus, word("draft")]
        );
        assert_eq!(
            tokens("'big cat'-dog"),
            vec![
                Token::Quoted {
                    text: "big cat".to_string(),
                    quote: Quote::Single
                },
                Token::Minus,
                word("dog"),
            ]
        );
        assert_eq!(
            tokens("p[1,5]-x"),
            vec![
                word("p"),
                Token::LeftBracket,
                word("1"),
                Token::Comma,
                word("5"),
                Token::RightBracket,
                Token::Minus,
                word("x"),
            ]
        );
    }

    #[test]
    fn test_minus_is_literal_in_value_position() {
        assert_eq!(tokens("temp>-5"), vec![word("temp"), Token::Operator(Operator::GreaterThan), word("-5")]);
        assert_eq!(tokens("title:-x"), vec![word("title"), Token::Colon, word("-x")]);
        assert_eq!(
            tokens("t[-2,-1]"),
            vec![
                word("t"),
                Token::LeftBracket,
                word("-2"),
                Token::Comma,
                word("-1"),
                Token::RightBracket,
            ]
        );
        assert_eq!(tokens("--x"), vec![Token::Minus, word("-x")]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokens("a>1 b<2 c>=3 d<=4"),
            vec![
                word("a"),
                Token::Operator(Operator::GreaterThan),
                word("1"),
                word("b"),
                Token::Operator(Operator::LessThan),
                word("2"),
                word("c"),
                Token::Operator(Operator::GreaterThanOrEqual),
                word("3"),
                word("d"),
                Token::Operator(Operator::LessThanOrEqual),
                word("4"),
            ]
        );
    }

    #[test]
    fn test_bare_equals_is_rejected() {
        let mut lexer = Lexer::new("=");
        assert!(matches!(
            lexer.next_token(),
            Err(SearchqlError::Syntax { position: 0, .. })
        ));
    }

    #[test]
    fn test_range() {
        assert_eq!(
            tokens("price[10,20]"),
            vec![
                word("price"),
                Token::LeftBracket,
                word("10"),
                Token::Comma,
                word("20"),
                Token::RightBracket,
            ]
        );
    }

    #[test]
    fn test_quoted_literals() {
        assert_eq!(
            tokens("'hello world' \"big cat\""),
            vec![
                Token::Quoted {
                    text: "hello world".to_string(),
                    quote: Quote::Single
                },
                Token::Quoted {
                    text: "big cat".to_string(),
                    quote: Quote::Double
                },
            ]
        );
    }

    #[test]
    fn test_unterminated_quote() {
        let mut lexer = Lexer::new("'unterminated");
        assert!(matches!(
            lexer.next_token(),
            Err(SearchqlError::Syntax { position: 0, .. })
        ));
    }

    #[test]
    fn test_quote_rejects_punctuation() {
        let mut lexer = Lexer::new("'a*b'");
        assert!(matches!(
            lexer.next_token(),
            Err(SearchqlError::Syntax { position: 2, .. })
        ));
    }

    #[test]
    fn test_dot_outside_boost_is_rejected() {
        let mut lexer = Lexer::new("3.5");
        assert_eq!(lexer.next_token().unwrap(), word("3"));
        assert!(matches!(
            lexer.next_token(),
            Err(SearchqlError::Syntax { position: 1, .. })
        ));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("sort:title");
        assert_eq!(lexer.peek_token().unwrap(), word("sort"));
        assert_eq!(lexer.next_token().unwrap(), word("sort"));
        assert_eq!(lexer.peek_token().unwrap(), Token::Colon);
        assert_eq!(lexer.token_start(), 0);
        assert_eq!(lexer.remaining(), ":title");
    }

    #[test]
    fn test_token_start_positions() {
        let mut lexer = Lexer::new("  a  title:b");
        lexer.next_token().unwrap();
        assert_eq!(lexer.token_start(), 2);
        lexer.next_token().unwrap();
        assert_eq!(lexer.token_start(), 5);
    }
}
