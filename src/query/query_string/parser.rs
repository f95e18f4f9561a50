//! Recursive descent parser for query strings
//!
//! # Grammar
//!
//! ```text
//! start          := query? sort_component?        (at least one part)
//! query          := disjunction+                  (implicit AND)
//! disjunction    := clause ("OR" clause)*         (left-folded pairs)
//! clause         := '-' atom | atom
//! atom           := strict_search | range | comparison | field | word
//! strict_search  := QUOTED
//! range          := TERM '[' WORD ',' WORD ']'
//! comparison     := TERM OPERATOR WORD
//! field          := TERM ':' (WORD | QUOTED)
//! word           := WORD ('^' FLOAT)?
//! sort_component := "sort" ':' TERM ORDER?
//! ```
//!
//! OR pairs the clauses directly around it, so `a b OR c` reads as
//! `a AND (b OR c)`. Negation applies to exactly one atom.

use super::lexer::{Lexer, Token};
use crate::error::SearchqlError;
use crate::query::ast::{is_sort_order, is_term_identifier, FieldValue, Query, SortComponent, Start};
use crate::Result;

const SORT_KEYWORD: &str = "sort";

/// Parser producing a [`Start`] tree from a query string
pub struct QueryStringParser {
    lexer: Lexer,
    current_token: Token,
    current_position: usize,
}

impl QueryStringParser {
    /// Create a new parser for the given query string
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_start();

        Ok(Self {
            lexer,
            current_token,
            current_position,
        })
    }

    /// Parse the whole input into a parse tree
    pub fn parse(&mut self) -> Result<Start> {
        let query = if self.current_token.starts_clause() && !self.at_sort_component()? {
            Some(self.parse_query()?)
        } else {
            None
        };

        let sort = if self.at_sort_component()? {
            Some(self.parse_sort_component()?)
        } else {
            None
        };

        if self.current_token != Token::Eof {
            return Err(self.unexpected(if sort.is_some() {
                "sort clause must come last"
            } else {
                "expected a clause"
            }));
        }

        if query.is_none() && sort.is_none() {
            return Err(SearchqlError::syntax(self.current_position, "Empty query"));
        }

        Ok(Start { query, sort })
    }

    /// Parse: query := disjunction+
    fn parse_query(&mut self) -> Result<Query> {
        let mut parts = vec![self.parse_disjunction()?];

        while self.current_token.starts_clause() && !self.at_sort_component()? {
            parts.push(self.parse_disjunction()?);
        }

        Ok(Query::QueryComponent(parts))
    }

    /// Parse: disjunction := clause ("OR" clause)*
    fn parse_disjunction(&mut self) -> Result<Query> {
        let mut left = self.parse_clause()?;

        while self.current_token == Token::Or {
            self.advance()?;
            let right = self.parse_clause()?;
            left = Query::OrQuery(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    /// Parse: clause := '-' atom | atom
    fn parse_clause(&mut self) -> Result<Query> {
        if self.current_token == Token::Minus {
            self.advance()?;
            let inner = self.parse_atom()?;
            return Ok(Query::NegateQuery(Box::new(inner)));
        }

        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Query> {
        match &self.current_token {
            Token::Quoted { text, quote } => {
                let query = Query::StrictSearchQuery {
                    phrase: text.clone(),
                    quote: *quote,
                };
                self.advance()?;
                Ok(query)
            }
            Token::Word(word) => {
                let word = word.clone();
                let word_position = self.current_position;
                self.advance()?;

                match self.current_token {
                    Token::Colon => {
                        self.expect_term_identifier(&word, word_position)?;
                        self.advance()?;
                        self.parse_field_value(word)
                    }
                    Token::LeftBracket => {
                        self.expect_term_identifier(&word, word_position)?;
                        self.advance()?;
                        self.parse_range(word)
                    }
                    Token::Operator(operator) => {
                        self.expect_term_identifier(&word, word_position)?;
                        self.advance()?;
                        let value = self.expect_word("comparison value")?;
                        Ok(Query::Comparison {
                            field: word,
                            operator,
                            value,
                        })
                    }
                    _ => {
                        let boost = if let Token::Caret(boost) = &self.current_token {
                            let boost = boost.clone();
                            self.advance()?;
                            Some(boost)
                        } else {
                            None
                        };
                        Ok(Query::WordQuery { word, boost })
                    }
                }
            }
            _ => Err(self.unexpected("expected a word, field or quoted literal")),
        }
    }

    /// Parse the value after `field:`
    fn parse_field_value(&mut self, field: String) -> Result<Query> {
        let value = match &self.current_token {
            Token::Word(word) => FieldValue::Word(word.clone()),
            Token::Quoted { text, quote } => FieldValue::Literal {
                text: text.clone(),
                quote: *quote,
            },
            _ => {
                return Err(self.unexpected(&format!("expected value after '{}:'", field)));
            }
        };
        self.advance()?;

        Ok(Query::FieldQuery { field, value })
    }

    /// Parse the bounds after `field[`
    fn parse_range(&mut self, field: String) -> Result<Query> {
        let lo = self.expect_word("range lower bound")?;
        self.expect(Token::Comma)?;
        let hi = self.expect_word("range upper bound")?;
        self.expect(Token::RightBracket)?;

        Ok(Query::RangeQuery { field, lo, hi })
    }

    /// Parse: sort_component := "sort" ':' TERM ORDER?
    fn parse_sort_component(&mut self) -> Result<SortComponent> {
        self.advance()?; // consume 'sort'
        self.expect(Token::Colon)?;

        let field_position = self.current_position;
        let field = self.expect_word("sort field")?;
        self.expect_term_identifier(&field, field_position)?;

        let order = match &self.current_token {
            Token::Word(word) if is_sort_order(word) => {
                let order = word.clone();
                self.advance()?;
                Some(order)
            }
            _ => None,
        };

        Ok(SortComponent { field, order })
    }

    fn at_sort_component(&mut self) -> Result<bool> {
        match &self.current_token {
            Token::Word(word) if word == SORT_KEYWORD => {
                Ok(self.lexer.peek_token()? == Token::Colon)
            }
            _ => Ok(false),
        }
    }

    fn expect_word(&mut self, what: &str) -> Result<String> {
        match &self.current_token {
            Token::Word(word) => {
                let word = word.clone();
                self.advance()?;
                Ok(word)
            }
            _ => Err(self.unexpected(&format!("expected {}", what))),
        }
    }

    fn expect_term_identifier(&self, word: &str, position: usize) -> Result<()> {
        if is_term_identifier(word) {
            Ok(())
        } else {
            Err(SearchqlError::syntax(
                position,
                format!("Invalid field name '{}'", word),
            ))
        }
    }

    /// Advance to the next token
    fn advance(&mut self) -> Result<()> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_start();
        Ok(())
    }

    /// Expect a specific token and advance
    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.current_token == expected {
            self.advance()
        } else {
            Err(self.unexpected(&format!("expected {:?}", expected)))
        }
    }

    fn unexpected(&self, context: &str) -> SearchqlError {
        SearchqlError::syntax(
            self.current_position,
            format!(
                "Unexpected token {:?}: {} (before '{}')",
                self.current_token,
                context,
                self.lexer.remaining()
            ),
        )
    }
}

/// Parse a query string into a parse tree
pub fn parse(input: &str) -> Result<Start> {
    QueryStringParser::new(input)?.parse()
}
