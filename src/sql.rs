//! MySQL DDL front end.
//!
//! Turns SQL text into the tagged [`Statement`] nodes consumed by the table
//! model. Only table, column, index and key statements are understood:
//! - `CREATE [TEMPORARY] TABLE`, including `LIKE`
//! - `ALTER TABLE`
//! - `DROP TABLE` and `RENAME TABLE`
//! - `CREATE INDEX` and `DROP INDEX`

mod lexer;
mod parser;
pub mod tree;

pub use lexer::{Lexer, LexerError, Token, TokenKind};
pub use parser::{ParseError, Parser, parse};
pub use tree::{NodeId, Statement};
