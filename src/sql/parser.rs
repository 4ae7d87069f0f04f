//! Recursive-descent parser for the MySQL DDL subset.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::lexer::{Lexer, LexerError, Token, TokenKind};
use super::tree::{
    AlterSpec, AlterTableDef, ColumnDef, ColumnOptionsDef, CreateDefinition, CreateIndexDef,
    CreateTableDef, CreateTableLikeDef, DatatypeDef, DefaultValue, DropIndexDef, DropTableDef,
    ForeignKeyDef, IndexDef, IndexKind, IndexOptionsDef, IndexType, KeyPart, MatchType, Position,
    ReferenceDef, ReferentialAction, RenameTableDef, SortOrder, Statement, TableOption,
    TableRename, TypeName,
};

/// SQL parser errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Lexer error.
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),
    /// Unexpected token.
    #[error("Unexpected token {found:?} at position {pos}, expected {expected}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: TokenKind,
        /// Position in input.
        pos: usize,
    },
    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: String,
    },
    /// Unknown data type keyword.
    #[error("Unknown data type '{name}' at position {pos}")]
    UnknownDataType {
        /// The word found in type position.
        name: String,
        /// Position in input.
        pos: usize,
    },
    /// Precision or scale above what the type allows.
    #[error("Precision out of range for '{name}' at position {pos}")]
    PrecisionOutOfRange {
        /// The type keyword.
        name: String,
        /// Position in input.
        pos: usize,
    },
    /// CREATE TABLE body without any column.
    #[error("No column definitions in CREATE TABLE {table}")]
    EmptyColumnList {
        /// The table being created.
        table: String,
    },
}

/// Largest `(M, D)` accepted for fixed and floating point types.
fn precision_limits(name: TypeName, args: usize) -> Option<(u64, u64)> {
    match (name, args) {
        (TypeName::Decimal, _) => Some((65, 30)),
        (TypeName::Float, 1) => Some((53, 0)),
        (TypeName::Float | TypeName::Double, _) => Some((255, 30)),
        _ => None,
    }
}

fn unexpected(expected: &str, token: Token) -> ParseError {
    if token.kind == TokenKind::Eof {
        ParseError::UnexpectedEof {
            expected: expected.into(),
        }
    } else {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: token.kind,
            pos: token.pos,
        }
    }
}

/// Parses every statement of `sql`.
///
/// # Errors
///
/// Returns an error if the input is not a sequence of supported DDL statements.
pub fn parse(sql: &str) -> Result<Vec<Statement>, ParseError> {
    Parser::new(sql).parse_all()
}

/// SQL parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
        }
    }

    /// Parse all statements from the input.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn parse_all(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        loop {
            // Skip empty statements
            while self.eat(&TokenKind::Semicolon)? {}

            if self.lexer.peek()?.kind == TokenKind::Eof {
                break;
            }

            statements.push(self.parse_statement()?);

            let token = self.lexer.next()?;
            if !matches!(token.kind, TokenKind::Semicolon | TokenKind::Eof) {
                return Err(unexpected("';' or end of input", token));
            }
        }

        Ok(statements)
    }

    /// Parse a single statement.
    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.peek_word()?.as_deref() {
            Some("create") => self.parse_create(),
            Some("alter") => self.parse_alter_table(),
            Some("drop") => self.parse_drop(),
            Some("rename") => self.parse_rename_table(),
            _ => {
                let token = self.lexer.next()?;
                Err(unexpected("CREATE, ALTER, DROP, or RENAME", token))
            }
        }
    }

    /// Parse a CREATE TABLE, CREATE TABLE ... LIKE or CREATE INDEX statement.
    fn parse_create(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("create")?;
        let temporary = self.eat_keyword("temporary")?;

        if !temporary && self.peek_any_keyword(&["unique", "fulltext", "spatial", "index"])? {
            return self.parse_create_index();
        }

        self.expect_keyword("table")?;
        let if_not_exists = if self.eat_keyword("if")? {
            self.expect_keyword("not")?;
            self.expect_keyword("exists")?;
            true
        } else {
            false
        };
        let table = self.expect_table_name()?;

        // CREATE TABLE t LIKE other
        if self.eat_keyword("like")? {
            let like = self.expect_table_name()?;
            return Ok(Statement::CreateTableLike(CreateTableLikeDef {
                table,
                like,
                temporary,
                if_not_exists,
            }));
        }

        self.expect(TokenKind::LParen)?;

        // CREATE TABLE t (LIKE other)
        if self.eat_keyword("like")? {
            let like = self.expect_table_name()?;
            self.expect(TokenKind::RParen)?;
            return Ok(Statement::CreateTableLike(CreateTableLikeDef {
                table,
                like,
                temporary,
                if_not_exists,
            }));
        }

        let mut columns_def = Vec::new();
        loop {
            if let Some(definition) = self.parse_create_definition()? {
                columns_def.push(definition);
            }
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        if !columns_def
            .iter()
            .any(|definition| matches!(definition, CreateDefinition::Column(_)))
        {
            return Err(ParseError::EmptyColumnList { table });
        }

        let table_options = self.parse_table_options(true)?;

        Ok(Statement::CreateTable(CreateTableDef {
            table,
            temporary,
            if_not_exists,
            columns_def,
            table_options,
        }))
    }

    /// Parse one entry of a CREATE TABLE body. `CHECK` constraints yield `None`.
    fn parse_create_definition(&mut self) -> Result<Option<CreateDefinition>, ParseError> {
        let symbol = self.parse_constraint_symbol()?;

        let definition = match self.peek_word()?.as_deref() {
            Some("primary") => {
                self.lexer.next()?;
                self.expect_keyword("key")?;
                CreateDefinition::PrimaryKey(self.parse_index_def(symbol)?)
            }
            Some("unique") => {
                self.lexer.next()?;
                self.eat_index_or_key()?;
                CreateDefinition::UniqueKey(self.parse_index_def(symbol)?)
            }
            Some("foreign") => {
                self.lexer.next()?;
                self.expect_keyword("key")?;
                CreateDefinition::ForeignKey(self.parse_foreign_key(symbol)?)
            }
            Some("check") => {
                self.skip_check()?;
                return Ok(None);
            }
            _ if symbol.is_some() => {
                let token = self.lexer.next()?;
                return Err(unexpected("PRIMARY KEY, UNIQUE, FOREIGN KEY, or CHECK", token));
            }
            Some("index" | "key") => {
                self.lexer.next()?;
                CreateDefinition::Index(self.parse_index_def(None)?)
            }
            Some("fulltext") => {
                self.lexer.next()?;
                self.eat_index_or_key()?;
                CreateDefinition::FulltextIndex(self.parse_index_def(None)?)
            }
            Some("spatial") => {
                self.lexer.next()?;
                self.eat_index_or_key()?;
                CreateDefinition::SpatialIndex(self.parse_index_def(None)?)
            }
            _ => CreateDefinition::Column(self.parse_column_def()?),
        };

        Ok(Some(definition))
    }

    /// Parse `[CONSTRAINT [symbol]]`.
    fn parse_constraint_symbol(&mut self) -> Result<Option<String>, ParseError> {
        if !self.eat_keyword("constraint")? {
            return Ok(None);
        }
        if self.peek_any_keyword(&["primary", "unique", "foreign", "check"])? {
            return Ok(None);
        }
        Ok(Some(self.expect_identifier()?))
    }

    /// Parse a column definition: name, data type and attributes.
    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.expect_identifier()?;
        let mut options = ColumnOptionsDef::default();
        let datatype = self.parse_datatype(&mut options)?;
        self.parse_column_options(&mut options)?;
        Ok(ColumnDef {
            name,
            datatype,
            options,
        })
    }

    /// Parse a data type. `SERIAL` also sets column attributes.
    fn parse_datatype(
        &mut self,
        options: &mut ColumnOptionsDef,
    ) -> Result<DatatypeDef, ParseError> {
        let token = self.lexer.next()?;
        let TokenKind::Word(word) = token.kind else {
            return Err(unexpected("data type", token));
        };

        let keyword = word.to_ascii_lowercase();
        let name = match keyword.as_str() {
            "double" => {
                self.eat_keyword("precision")?;
                Some(TypeName::Double)
            }
            "character" | "char" if self.eat_keyword("varying")? => Some(TypeName::Varchar),
            "national" => {
                let inner = self.expect_identifier()?.to_ascii_lowercase();
                match inner.as_str() {
                    "char" | "character" if self.eat_keyword("varying")? => Some(TypeName::Varchar),
                    other => TypeName::from_keyword(other),
                }
            }
            "long" => {
                if self.eat_keyword("varbinary")? {
                    Some(TypeName::Mediumblob)
                } else {
                    self.eat_keyword("varchar")?;
                    Some(TypeName::Mediumtext)
                }
            }
            "serial" => {
                options.nullable = Some(false);
                options.auto_increment = true;
                options.unique = true;
                let mut datatype = DatatypeDef::new(TypeName::Bigint);
                datatype.unsigned = true;
                return Ok(datatype);
            }
            other => TypeName::from_keyword(other),
        };

        let Some(name) = name else {
            return Err(ParseError::UnknownDataType {
                name: word,
                pos: token.pos,
            });
        };

        let mut datatype = DatatypeDef::new(name);

        if matches!(name, TypeName::Enum | TypeName::Set) {
            self.expect(TokenKind::LParen)?;
            loop {
                datatype.values.push(self.expect_string()?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
        } else if self.eat(&TokenKind::LParen)? {
            loop {
                datatype.args.push(self.expect_u64()?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;

            if let Some((digits, decimals)) = precision_limits(name, datatype.args.len()) {
                let args = &datatype.args;
                if args.first().is_some_and(|&m| m > digits)
                    || args.get(1).is_some_and(|&d| d > decimals)
                {
                    return Err(ParseError::PrecisionOutOfRange {
                        name: word,
                        pos: token.pos,
                    });
                }
            }
        }

        loop {
            if self.eat_keyword("unsigned")? {
                datatype.unsigned = true;
            } else if self.eat_keyword("zerofill")? {
                datatype.zerofill = true;
                datatype.unsigned = true;
            } else if self.eat_keyword("signed")? {
                datatype.unsigned = false;
            } else if name.is_textual() && self.eat_keyword("binary")? {
                // Binary collation shorthand, carries no structure
            } else {
                break;
            }
        }

        Ok(datatype)
    }

    /// Parse column attributes, in any order.
    #[allow(clippy::too_many_lines)]
    fn parse_column_options(&mut self, options: &mut ColumnOptionsDef) -> Result<(), ParseError> {
        loop {
            match self.peek_word()?.as_deref() {
                Some("not") => {
                    self.lexer.next()?;
                    self.expect_keyword("null")?;
                    options.nullable = Some(false);
                }
                Some("null") => {
                    self.lexer.next()?;
                    options.nullable = Some(true);
                }
                Some("default") => {
                    self.lexer.next()?;
                    options.default = Some(self.parse_default_value()?);
                }
                Some("on") => {
                    self.lexer.next()?;
                    self.expect_keyword("update")?;
                    options.on_update = Some(self.parse_expression_text()?);
                }
                Some("auto_increment") => {
                    self.lexer.next()?;
                    options.auto_increment = true;
                }
                Some("unique") => {
                    self.lexer.next()?;
                    self.eat_keyword("key")?;
                    options.unique = true;
                }
                Some("primary") => {
                    self.lexer.next()?;
                    self.expect_keyword("key")?;
                    options.primary_key = true;
                }
                Some("key") => {
                    self.lexer.next()?;
                    options.primary_key = true;
                }
                Some("comment") => {
                    self.lexer.next()?;
                    options.comment = Some(self.expect_string()?);
                }
                Some("character") => {
                    self.lexer.next()?;
                    self.expect_keyword("set")?;
                    options.charset = Some(self.expect_name()?);
                }
                Some("charset") => {
                    self.lexer.next()?;
                    options.charset = Some(self.expect_name()?);
                }
                Some("collate") => {
                    self.lexer.next()?;
                    options.collation = Some(self.expect_name()?);
                }
                Some("column_format") => {
                    self.lexer.next()?;
                    options.format = Some(self.expect_identifier()?.to_ascii_uppercase());
                }
                Some("storage") => {
                    self.lexer.next()?;
                    options.storage = Some(self.expect_identifier()?.to_ascii_uppercase());
                }
                Some("invisible") => {
                    self.lexer.next()?;
                    options.invisible = true;
                }
                Some("visible") => {
                    self.lexer.next()?;
                    options.invisible = false;
                }
                Some("references") => {
                    options.reference = Some(self.parse_reference()?);
                }
                Some("constraint" | "check") => {
                    self.parse_constraint_symbol()?;
                    self.skip_check()?;
                }
                Some("generated" | "as") => {
                    // Generated column expressions are not modelled
                    if self.eat_keyword("generated")? {
                        self.expect_keyword("always")?;
                    }
                    self.expect_keyword("as")?;
                    self.expect(TokenKind::LParen)?;
                    self.skip_balanced()?;
                    if !self.eat_keyword("virtual")? {
                        self.eat_keyword("stored")?;
                    }
                }
                Some("srid") => {
                    self.lexer.next()?;
                    self.expect_u64()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Parse a `DEFAULT` value.
    fn parse_default_value(&mut self) -> Result<DefaultValue, ParseError> {
        let token = self.lexer.peek()?.clone();
        let value = match token.kind {
            TokenKind::Word(word) if word.eq_ignore_ascii_case("null") => DefaultValue::Null,
            TokenKind::Word(word) if word.eq_ignore_ascii_case("true") => DefaultValue::Bool(true),
            TokenKind::Word(word) if word.eq_ignore_ascii_case("false") => {
                DefaultValue::Bool(false)
            }
            TokenKind::Word(_) | TokenKind::LParen => {
                return Ok(DefaultValue::Text(self.parse_expression_text()?));
            }
            TokenKind::StringLiteral(value) => DefaultValue::Text(value),
            TokenKind::IntegerLiteral(value) => DefaultValue::Integer(value),
            TokenKind::RealLiteral(value) => DefaultValue::Real(value),
            TokenKind::HexLiteral(digits) => DefaultValue::Text(format!("0x{digits}")),
            TokenKind::BitLiteral(digits) => DefaultValue::Text(format!("b'{digits}'")),
            TokenKind::Minus | TokenKind::Plus => {
                self.lexer.next()?;
                let negative = token.kind == TokenKind::Minus;
                let number = self.lexer.next()?;
                return match number.kind {
                    TokenKind::IntegerLiteral(v) if negative => Ok(DefaultValue::Integer(-v)),
                    TokenKind::IntegerLiteral(v) => Ok(DefaultValue::Integer(v)),
                    TokenKind::RealLiteral(v) if negative => Ok(DefaultValue::Real(-v)),
                    TokenKind::RealLiteral(v) => Ok(DefaultValue::Real(v)),
                    _ => Err(unexpected("number after sign", number)),
                };
            }
            _ => return Err(unexpected("default value", token)),
        };
        self.lexer.next()?;
        Ok(value)
    }

    /// Consume a function call, keyword or parenthesized expression and
    /// return its source text.
    fn parse_expression_text(&mut self) -> Result<String, ParseError> {
        let first = self.lexer.next()?;
        let start = first.pos;
        let mut end = self.lexer.position();

        match first.kind {
            TokenKind::LParen => end = self.skip_balanced()?,
            TokenKind::Word(_) => {
                if self.lexer.peek()?.kind == TokenKind::LParen {
                    self.lexer.next()?;
                    end = self.skip_balanced()?;
                }
            }
            TokenKind::StringLiteral(value) => return Ok(value),
            TokenKind::Eof
            | TokenKind::RParen
            | TokenKind::Comma
            | TokenKind::Semicolon => return Err(unexpected("expression", first)),
            _ => {}
        }

        Ok(self.lexer.source(start, end).to_string())
    }

    /// Skip tokens up to the `)` closing an already consumed `(`.
    ///
    /// Returns the input offset just past the closing parenthesis.
    fn skip_balanced(&mut self) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        loop {
            let token = self.lexer.next()?;
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen if depth == 0 => return Ok(self.lexer.position()),
                TokenKind::RParen => depth -= 1,
                TokenKind::Eof => return Err(unexpected("')'", token)),
                _ => {}
            }
        }
    }

    /// Skip `CHECK (expr) [[NOT] ENFORCED]`.
    fn skip_check(&mut self) -> Result<(), ParseError> {
        self.expect_keyword("check")?;
        self.expect(TokenKind::LParen)?;
        self.skip_balanced()?;
        self.eat_keyword("not")?;
        self.eat_keyword("enforced")?;
        Ok(())
    }

    /// Parse `REFERENCES t (cols) [MATCH ...] [ON DELETE ...] [ON UPDATE ...]`.
    fn parse_reference(&mut self) -> Result<ReferenceDef, ParseError> {
        self.expect_keyword("references")?;
        let table = self.expect_table_name()?;
        let columns = self.parse_key_parts()?;
        let mut reference = ReferenceDef {
            table,
            columns,
            match_type: None,
            on_delete: None,
            on_update: None,
        };

        loop {
            if self.eat_keyword("match")? {
                let token = self.lexer.next()?;
                reference.match_type = Some(match &token.kind {
                    kind if kind.is_keyword("full") => MatchType::Full,
                    kind if kind.is_keyword("partial") => MatchType::Partial,
                    kind if kind.is_keyword("simple") => MatchType::Simple,
                    _ => return Err(unexpected("FULL, PARTIAL, or SIMPLE", token)),
                });
            } else if self.eat_keyword("on")? {
                if self.eat_keyword("delete")? {
                    reference.on_delete = Some(self.parse_referential_action()?);
                } else {
                    self.expect_keyword("update")?;
                    reference.on_update = Some(self.parse_referential_action()?);
                }
            } else {
                break;
            }
        }

        Ok(reference)
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction, ParseError> {
        if self.eat_keyword("restrict")? {
            Ok(ReferentialAction::Restrict)
        } else if self.eat_keyword("cascade")? {
            Ok(ReferentialAction::Cascade)
        } else if self.eat_keyword("set")? {
            if self.eat_keyword("null")? {
                Ok(ReferentialAction::SetNull)
            } else {
                self.expect_keyword("default")?;
                Ok(ReferentialAction::SetDefault)
            }
        } else if self.eat_keyword("no")? {
            self.expect_keyword("action")?;
            Ok(ReferentialAction::NoAction)
        } else {
            let token = self.lexer.next()?;
            Err(unexpected(
                "RESTRICT, CASCADE, SET NULL, NO ACTION, or SET DEFAULT",
                token,
            ))
        }
    }

    /// Parse `(col [(len)] [ASC | DESC], ...)`.
    fn parse_key_parts(&mut self) -> Result<Vec<KeyPart>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut parts = Vec::new();
        loop {
            let mut part = KeyPart::new(self.expect_identifier()?);
            if self.eat(&TokenKind::LParen)? {
                part.length = Some(self.expect_u32()?);
                self.expect(TokenKind::RParen)?;
            }
            if self.eat_keyword("asc")? {
                part.sort = Some(SortOrder::Asc);
            } else if self.eat_keyword("desc")? {
                part.sort = Some(SortOrder::Desc);
            }
            parts.push(part);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(parts)
    }

    /// Parse `[name] [USING type] (key parts) [index options]`.
    ///
    /// The constraint symbol names the index when no name is given.
    fn parse_index_def(&mut self, symbol: Option<String>) -> Result<IndexDef, ParseError> {
        let name = self.parse_optional_index_name()?.or(symbol);
        let index_type = if self.eat_keyword("using")? {
            Some(self.parse_index_type()?)
        } else {
            None
        };
        self.parse_index_tail(name, index_type)
    }

    /// Parse `(key parts) [index options]`.
    fn parse_index_tail(
        &mut self,
        name: Option<String>,
        index_type: Option<IndexType>,
    ) -> Result<IndexDef, ParseError> {
        let columns = self.parse_key_parts()?;
        let mut index = IndexDef {
            name,
            index_type,
            columns,
            options: IndexOptionsDef::default(),
        };

        loop {
            match self.peek_word()?.as_deref() {
                Some("key_block_size") => {
                    self.lexer.next()?;
                    self.eat(&TokenKind::Equals)?;
                    index.options.key_block_size = Some(self.expect_u64()?);
                }
                Some("using") => {
                    self.lexer.next()?;
                    index.index_type = Some(self.parse_index_type()?);
                }
                Some("with") => {
                    self.lexer.next()?;
                    self.expect_keyword("parser")?;
                    index.options.parser = Some(self.expect_identifier()?);
                }
                Some("comment") => {
                    self.lexer.next()?;
                    index.options.comment = Some(self.expect_string()?);
                }
                Some("visible") => {
                    self.lexer.next()?;
                    index.options.visible = Some(true);
                }
                Some("invisible") => {
                    self.lexer.next()?;
                    index.options.visible = Some(false);
                }
                _ => break,
            }
        }

        Ok(index)
    }

    fn parse_optional_index_name(&mut self) -> Result<Option<String>, ParseError> {
        let token = self.lexer.peek()?;
        match &token.kind {
            TokenKind::Word(word) if !word.eq_ignore_ascii_case("using") => {}
            TokenKind::QuotedIdentifier(_) => {}
            _ => return Ok(None),
        }
        Ok(Some(self.expect_identifier()?))
    }

    fn parse_index_type(&mut self) -> Result<IndexType, ParseError> {
        if self.eat_keyword("btree")? {
            Ok(IndexType::Btree)
        } else if self.eat_keyword("hash")? {
            Ok(IndexType::Hash)
        } else {
            let token = self.lexer.next()?;
            Err(unexpected("BTREE or HASH", token))
        }
    }

    /// Parse `[name] (cols) REFERENCES ...` after `FOREIGN KEY`.
    fn parse_foreign_key(&mut self, symbol: Option<String>) -> Result<ForeignKeyDef, ParseError> {
        let name = self.parse_optional_index_name()?;
        let columns = self.parse_key_parts()?;
        let reference = self.parse_reference()?;
        Ok(ForeignKeyDef {
            symbol,
            name,
            columns,
            reference,
        })
    }

    /// Parse table options. Commas between options are accepted when
    /// `allow_commas` is set.
    fn parse_table_options(&mut self, allow_commas: bool) -> Result<Vec<TableOption>, ParseError> {
        let mut options = Vec::new();
        loop {
            if allow_commas && !options.is_empty() && self.lexer.peek()?.kind == TokenKind::Comma {
                self.lexer.next()?;
            }
            if self.skip_ignored_table_option()? {
                continue;
            }
            match self.parse_table_option()? {
                Some(option) => options.push(option),
                None => break,
            }
        }
        Ok(options)
    }

    /// Skip `STATS_*` options, which carry no structure.
    fn skip_ignored_table_option(&mut self) -> Result<bool, ParseError> {
        if !self.peek_any_keyword(&[
            "stats_persistent",
            "stats_auto_recalc",
            "stats_sample_pages",
        ])? {
            return Ok(false);
        }
        self.lexer.next()?;
        self.eat(&TokenKind::Equals)?;
        self.lexer.next()?;
        Ok(true)
    }

    #[allow(clippy::too_many_lines)]
    fn parse_table_option(&mut self) -> Result<Option<TableOption>, ParseError> {
        let Some(keyword) = self.peek_word()? else {
            return Ok(None);
        };

        let option = match keyword.as_str() {
            "engine" => {
                self.option_prelude()?;
                TableOption::Engine(self.expect_name()?)
            }
            "auto_increment" => {
                self.option_prelude()?;
                TableOption::AutoIncrement(self.expect_u64()?)
            }
            "avg_row_length" => {
                self.option_prelude()?;
                TableOption::AvgRowLength(self.expect_u64()?)
            }
            "default" => {
                self.lexer.next()?;
                if self.eat_keyword("collate")? {
                    self.eat(&TokenKind::Equals)?;
                    TableOption::Collation(self.expect_name()?)
                } else {
                    if !self.eat_keyword("charset")? {
                        self.expect_keyword("character")?;
                        self.expect_keyword("set")?;
                    }
                    self.eat(&TokenKind::Equals)?;
                    TableOption::Charset(self.expect_name()?)
                }
            }
            "character" => {
                self.lexer.next()?;
                self.expect_keyword("set")?;
                self.eat(&TokenKind::Equals)?;
                TableOption::Charset(self.expect_name()?)
            }
            "charset" => {
                self.option_prelude()?;
                TableOption::Charset(self.expect_name()?)
            }
            "checksum" => {
                self.option_prelude()?;
                TableOption::Checksum(self.expect_flag()?)
            }
            "collate" => {
                self.option_prelude()?;
                TableOption::Collation(self.expect_name()?)
            }
            "comment" => {
                self.option_prelude()?;
                TableOption::Comment(self.expect_string()?)
            }
            "compression" => {
                self.option_prelude()?;
                TableOption::Compression(self.expect_string()?)
            }
            "connection" => {
                self.option_prelude()?;
                TableOption::Connection(self.expect_string()?)
            }
            "data" => {
                self.lexer.next()?;
                self.expect_keyword("directory")?;
                self.eat(&TokenKind::Equals)?;
                TableOption::DataDirectory(self.expect_string()?)
            }
            "index" => {
                self.lexer.next()?;
                self.expect_keyword("directory")?;
                self.eat(&TokenKind::Equals)?;
                TableOption::IndexDirectory(self.expect_string()?)
            }
            "delay_key_write" => {
                self.option_prelude()?;
                TableOption::DelayKeyWrite(self.expect_flag()?)
            }
            "encryption" => {
                self.option_prelude()?;
                let token = self.lexer.next()?;
                match &token.kind {
                    TokenKind::StringLiteral(value) if value.eq_ignore_ascii_case("y") => {
                        TableOption::Encryption(true)
                    }
                    TokenKind::StringLiteral(value) if value.eq_ignore_ascii_case("n") => {
                        TableOption::Encryption(false)
                    }
                    _ => return Err(unexpected("'Y' or 'N'", token)),
                }
            }
            "insert_method" => {
                self.option_prelude()?;
                TableOption::InsertMethod(self.expect_identifier()?.to_ascii_uppercase())
            }
            "key_block_size" => {
                self.option_prelude()?;
                TableOption::KeyBlockSize(self.expect_u64()?)
            }
            "max_rows" => {
                self.option_prelude()?;
                TableOption::MaxRows(self.expect_u64()?)
            }
            "min_rows" => {
                self.option_prelude()?;
                TableOption::MinRows(self.expect_u64()?)
            }
            "pack_keys" => {
                self.option_prelude()?;
                let token = self.lexer.next()?;
                match &token.kind {
                    TokenKind::IntegerLiteral(value @ (0 | 1)) => {
                        TableOption::PackKeys(value.to_string())
                    }
                    kind if kind.is_keyword("default") => TableOption::PackKeys("DEFAULT".into()),
                    _ => return Err(unexpected("0, 1, or DEFAULT", token)),
                }
            }
            "password" => {
                self.option_prelude()?;
                TableOption::Password(self.expect_string()?)
            }
            "row_format" => {
                self.option_prelude()?;
                TableOption::RowFormat(self.expect_identifier()?.to_ascii_uppercase())
            }
            "tablespace" => {
                self.option_prelude()?;
                let name = self.expect_name()?;
                if self.eat_keyword("storage")? {
                    self.expect_identifier()?;
                }
                TableOption::Tablespace(name)
            }
            "union" => {
                self.option_prelude()?;
                self.expect(TokenKind::LParen)?;
                let mut tables = Vec::new();
                loop {
                    tables.push(self.expect_table_name()?);
                    if !self.eat(&TokenKind::Comma)? {
                        break;
                    }
                }
                self.expect(TokenKind::RParen)?;
                TableOption::Union(tables)
            }
            _ => return Ok(None),
        };

        Ok(Some(option))
    }

    /// Consume an option keyword and its optional `=`.
    fn option_prelude(&mut self) -> Result<(), ParseError> {
        self.lexer.next()?;
        self.eat(&TokenKind::Equals)?;
        Ok(())
    }

    /// Parse an ALTER TABLE statement.
    fn parse_alter_table(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("alter")?;
        self.eat_keyword("online")?;
        self.eat_keyword("ignore")?;
        self.expect_keyword("table")?;
        let table = self.expect_table_name()?;

        let mut specs = Vec::new();
        loop {
            specs.extend(self.parse_alter_spec()?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(Statement::AlterTable(AlterTableDef { table, specs }))
    }

    /// Parse one alter specification. Clauses without structural effect
    /// (`ALGORITHM`, `LOCK`, `FORCE`, checks) yield `None`.
    #[allow(clippy::too_many_lines)]
    fn parse_alter_spec(&mut self) -> Result<Option<AlterSpec>, ParseError> {
        let spec = match self.peek_word()?.as_deref() {
            Some("add") => {
                self.lexer.next()?;
                return self.parse_alter_add();
            }
            Some("alter") => {
                self.lexer.next()?;
                self.eat_keyword("column")?;
                let column = self.expect_identifier()?;
                if self.eat_keyword("set")? {
                    if self.eat_keyword("visible")? || self.eat_keyword("invisible")? {
                        return Ok(None);
                    }
                    self.expect_keyword("default")?;
                    AlterSpec::SetDefault {
                        column,
                        value: self.parse_default_value()?,
                    }
                } else {
                    self.expect_keyword("drop")?;
                    self.expect_keyword("default")?;
                    AlterSpec::DropDefault { column }
                }
            }
            Some("change") => {
                self.lexer.next()?;
                self.eat_keyword("column")?;
                let column = self.expect_identifier()?;
                let definition = self.parse_column_def()?;
                let position = self.parse_position()?;
                AlterSpec::ChangeColumn {
                    column,
                    definition,
                    position,
                }
            }
            Some("modify") => {
                self.lexer.next()?;
                self.eat_keyword("column")?;
                let definition = self.parse_column_def()?;
                let position = self.parse_position()?;
                AlterSpec::ModifyColumn {
                    definition,
                    position,
                }
            }
            Some("drop") => {
                self.lexer.next()?;
                if self.eat_keyword("primary")? {
                    self.expect_keyword("key")?;
                    AlterSpec::DropPrimaryKey
                } else if self.eat_keyword("foreign")? {
                    self.expect_keyword("key")?;
                    AlterSpec::DropForeignKey {
                        symbol: self.expect_identifier()?,
                    }
                } else if self.eat_index_or_key()? {
                    AlterSpec::DropIndex {
                        index: self.expect_identifier()?,
                    }
                } else if self.eat_keyword("check")? || self.eat_keyword("constraint")? {
                    self.expect_identifier()?;
                    return Ok(None);
                } else {
                    self.eat_keyword("column")?;
                    AlterSpec::DropColumn {
                        column: self.expect_identifier()?,
                    }
                }
            }
            Some("rename") => {
                self.lexer.next()?;
                if self.eat_keyword("column")? {
                    let column = self.expect_identifier()?;
                    self.expect_keyword("to")?;
                    AlterSpec::RenameColumn {
                        column,
                        to: self.expect_identifier()?,
                    }
                } else if self.eat_index_or_key()? {
                    let index = self.expect_identifier()?;
                    self.expect_keyword("to")?;
                    AlterSpec::RenameIndex {
                        index,
                        to: self.expect_identifier()?,
                    }
                } else {
                    if !self.eat_keyword("to")? {
                        self.eat_keyword("as")?;
                    }
                    AlterSpec::RenameTable {
                        to: self.expect_table_name()?,
                    }
                }
            }
            Some("convert") => {
                self.lexer.next()?;
                self.expect_keyword("to")?;
                if !self.eat_keyword("charset")? {
                    self.expect_keyword("character")?;
                    self.expect_keyword("set")?;
                }
                let mut options = Vec::from([TableOption::Charset(self.expect_name()?)]);
                if self.eat_keyword("collate")? {
                    options.push(TableOption::Collation(self.expect_name()?));
                }
                AlterSpec::SetOptions { options }
            }
            Some("algorithm" | "lock") => {
                self.option_prelude()?;
                self.expect_identifier()?;
                return Ok(None);
            }
            Some("force") => {
                self.lexer.next()?;
                return Ok(None);
            }
            _ => {
                let options = self.parse_table_options(false)?;
                if options.is_empty() {
                    let token = self.lexer.next()?;
                    return Err(unexpected("alter specification", token));
                }
                AlterSpec::SetOptions { options }
            }
        };

        Ok(Some(spec))
    }

    /// Parse what follows `ALTER TABLE t ADD`.
    fn parse_alter_add(&mut self) -> Result<Option<AlterSpec>, ParseError> {
        if self.eat_keyword("column")? {
            return self.parse_alter_add_columns().map(Some);
        }

        let symbol = self.parse_constraint_symbol()?;

        let spec = match self.peek_word()?.as_deref() {
            Some("primary") => {
                self.lexer.next()?;
                self.expect_keyword("key")?;
                AlterSpec::AddPrimaryKey {
                    key: self.parse_index_def(symbol)?,
                }
            }
            Some("unique") => {
                self.lexer.next()?;
                self.eat_index_or_key()?;
                AlterSpec::AddIndex {
                    kind: IndexKind::Unique,
                    index: self.parse_index_def(symbol)?,
                }
            }
            Some("foreign") => {
                self.lexer.next()?;
                self.expect_keyword("key")?;
                AlterSpec::AddForeignKey {
                    key: self.parse_foreign_key(symbol)?,
                }
            }
            Some("check") => {
                self.skip_check()?;
                return Ok(None);
            }
            _ if symbol.is_some() => {
                let token = self.lexer.next()?;
                return Err(unexpected("PRIMARY KEY, UNIQUE, FOREIGN KEY, or CHECK", token));
            }
            Some("index" | "key") => {
                self.lexer.next()?;
                AlterSpec::AddIndex {
                    kind: IndexKind::Index,
                    index: self.parse_index_def(None)?,
                }
            }
            Some("fulltext") => {
                self.lexer.next()?;
                self.eat_index_or_key()?;
                AlterSpec::AddIndex {
                    kind: IndexKind::Fulltext,
                    index: self.parse_index_def(None)?,
                }
            }
            Some("spatial") => {
                self.lexer.next()?;
                self.eat_index_or_key()?;
                AlterSpec::AddIndex {
                    kind: IndexKind::Spatial,
                    index: self.parse_index_def(None)?,
                }
            }
            _ => self.parse_alter_add_columns()?,
        };

        Ok(Some(spec))
    }

    /// Parse `col_def [FIRST | AFTER c]` or `(col_def, ...)`.
    fn parse_alter_add_columns(&mut self) -> Result<AlterSpec, ParseError> {
        if self.eat(&TokenKind::LParen)? {
            let mut columns = Vec::new();
            loop {
                columns.push(self.parse_column_def()?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
            return Ok(AlterSpec::AddColumns { columns });
        }

        let column = self.parse_column_def()?;
        let position = self.parse_position()?;
        Ok(AlterSpec::AddColumn { column, position })
    }

    /// Parse `[FIRST | AFTER col]`.
    fn parse_position(&mut self) -> Result<Option<Position>, ParseError> {
        if self.eat_keyword("first")? {
            Ok(Some(Position::first()))
        } else if self.eat_keyword("after")? {
            Ok(Some(Position::after(self.expect_identifier()?)))
        } else {
            Ok(None)
        }
    }

    /// Parse `CREATE [UNIQUE | FULLTEXT | SPATIAL] INDEX ...` after `CREATE`.
    fn parse_create_index(&mut self) -> Result<Statement, ParseError> {
        let kind = if self.eat_keyword("unique")? {
            IndexKind::Unique
        } else if self.eat_keyword("fulltext")? {
            IndexKind::Fulltext
        } else if self.eat_keyword("spatial")? {
            IndexKind::Spatial
        } else {
            IndexKind::Index
        };
        self.expect_keyword("index")?;

        let name = self.expect_identifier()?;
        let index_type = if self.eat_keyword("using")? {
            Some(self.parse_index_type()?)
        } else {
            None
        };
        self.expect_keyword("on")?;
        let table = self.expect_table_name()?;
        let index = self.parse_index_tail(Some(name), index_type)?;
        self.skip_algorithm_and_lock()?;

        Ok(Statement::CreateIndex(CreateIndexDef { table, kind, index }))
    }

    /// Parse a DROP TABLE or DROP INDEX statement.
    fn parse_drop(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("drop")?;
        let temporary = self.eat_keyword("temporary")?;

        if !temporary && self.eat_keyword("index")? {
            let index = self.expect_identifier()?;
            self.expect_keyword("on")?;
            let table = self.expect_table_name()?;
            self.skip_algorithm_and_lock()?;
            return Ok(Statement::DropIndex(DropIndexDef { table, index }));
        }

        if !self.eat_keyword("tables")? {
            self.expect_keyword("table")?;
        }
        let if_exists = if self.eat_keyword("if")? {
            self.expect_keyword("exists")?;
            true
        } else {
            false
        };

        let mut tables = Vec::new();
        loop {
            tables.push(self.expect_table_name()?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        if !self.eat_keyword("restrict")? {
            self.eat_keyword("cascade")?;
        }

        Ok(Statement::DropTable(DropTableDef { tables, if_exists }))
    }

    /// Parse `RENAME TABLE a TO b [, c TO d]`.
    fn parse_rename_table(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("rename")?;
        if !self.eat_keyword("tables")? {
            self.expect_keyword("table")?;
        }

        let mut renames = Vec::new();
        loop {
            let from = self.expect_table_name()?;
            self.expect_keyword("to")?;
            let to = self.expect_table_name()?;
            renames.push(TableRename { from, to });
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(Statement::RenameTable(RenameTableDef { renames }))
    }

    fn skip_algorithm_and_lock(&mut self) -> Result<(), ParseError> {
        while self.peek_any_keyword(&["algorithm", "lock"])? {
            self.option_prelude()?;
            self.expect_identifier()?;
        }
        Ok(())
    }

    /// The next token as a lowercase bare word, if it is one.
    fn peek_word(&mut self) -> Result<Option<String>, ParseError> {
        Ok(match &self.lexer.peek()?.kind {
            TokenKind::Word(word) => Some(word.to_ascii_lowercase()),
            _ => None,
        })
    }

    fn peek_any_keyword(&mut self, keywords: &[&str]) -> Result<bool, ParseError> {
        let kind = &self.lexer.peek()?.kind;
        Ok(keywords.iter().any(|keyword| kind.is_keyword(keyword)))
    }

    /// Consume the next token if it is the bare word `keyword`.
    fn eat_keyword(&mut self, keyword: &str) -> Result<bool, ParseError> {
        if self.lexer.peek()?.kind.is_keyword(keyword) {
            self.lexer.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn eat_index_or_key(&mut self) -> Result<bool, ParseError> {
        Ok(self.eat_keyword("index")? || self.eat_keyword("key")?)
    }

    /// Consume the next token if it equals `kind`.
    fn eat(&mut self, kind: &TokenKind) -> Result<bool, ParseError> {
        if self.lexer.peek()?.kind == *kind {
            self.lexer.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Expect the bare word `keyword`, ignoring case.
    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        let token = self.lexer.next()?;
        if token.kind.is_keyword(keyword) {
            Ok(())
        } else {
            Err(unexpected(&keyword.to_ascii_uppercase(), token))
        }
    }

    /// Expect a specific token kind.
    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let token = self.lexer.next()?;
        if core::mem::discriminant(&token.kind) == core::mem::discriminant(&expected) {
            Ok(token)
        } else {
            Err(unexpected(&format!("{expected:?}"), token))
        }
    }

    /// Expect an identifier and return its name.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        let token = self.lexer.next()?;
        match token.kind {
            TokenKind::Word(name) | TokenKind::QuotedIdentifier(name) => Ok(name),
            _ => Err(unexpected("identifier", token)),
        }
    }

    /// Expect a possibly schema-qualified table name and return the table part.
    fn expect_table_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_identifier()?;
        while self.eat(&TokenKind::Dot)? {
            name = self.expect_identifier()?;
        }
        Ok(name)
    }

    /// Expect an identifier or a string, as accepted for charset and engine names.
    fn expect_name(&mut self) -> Result<String, ParseError> {
        let token = self.lexer.next()?;
        match token.kind {
            TokenKind::Word(name)
            | TokenKind::QuotedIdentifier(name)
            | TokenKind::StringLiteral(name) => Ok(name),
            _ => Err(unexpected("name", token)),
        }
    }

    fn expect_string(&mut self) -> Result<String, ParseError> {
        let token = self.lexer.next()?;
        match token.kind {
            TokenKind::StringLiteral(value) => Ok(value),
            _ => Err(unexpected("string literal", token)),
        }
    }

    fn expect_u64(&mut self) -> Result<u64, ParseError> {
        let token = self.lexer.next()?;
        match token.kind {
            TokenKind::IntegerLiteral(value) if value >= 0 => Ok(value.unsigned_abs()),
            _ => Err(unexpected("unsigned integer", token)),
        }
    }

    fn expect_u32(&mut self) -> Result<u32, ParseError> {
        let token = self.lexer.next()?;
        match token.kind {
            TokenKind::IntegerLiteral(value) => {
                u32::try_from(value).map_err(|_| unexpected("prefix length", token))
            }
            _ => Err(unexpected("prefix length", token)),
        }
    }

    fn expect_flag(&mut self) -> Result<bool, ParseError> {
        let token = self.lexer.next()?;
        match token.kind {
            TokenKind::IntegerLiteral(0) => Ok(false),
            TokenKind::IntegerLiteral(1) => Ok(true),
            _ => Err(unexpected("0 or 1", token)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(sql: &str) -> Statement {
        let mut statements = parse(sql).unwrap();
        assert_eq!(statements.len(), 1);
        statements.remove(0)
    }

    fn alter_specs(sql: &str) -> Vec<AlterSpec> {
        match parse_one(sql) {
            Statement::AlterTable(def) => def.specs,
            other => panic!("Expected AlterTable, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_create_table_simple() {
        let Statement::CreateTable(def) =
            parse_one("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(64) NOT NULL)")
        else {
            panic!("Expected CreateTable");
        };
        assert_eq!(def.table, "users");
        assert_eq!(def.columns_def.len(), 2);

        let CreateDefinition::Column(id) = &def.columns_def[0] else {
            panic!("Expected column");
        };
        assert_eq!(id.name, "id");
        assert_eq!(id.datatype.name, TypeName::Int);
        assert!(id.options.primary_key);

        let CreateDefinition::Column(name) = &def.columns_def[1] else {
            panic!("Expected column");
        };
        assert_eq!(name.datatype.args, [64]);
        assert_eq!(name.options.nullable, Some(false));
    }

    #[test]
    fn test_parse_create_table_constraints() {
        let sql = "
            CREATE TEMPORARY TABLE IF NOT EXISTS `shop`.`orders` (
                id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
                person_id INT,
                note TEXT,
                CONSTRAINT pk_orders PRIMARY KEY USING BTREE (id),
                UNIQUE KEY uk_note (note(10) DESC),
                KEY (person_id),
                FULLTEXT INDEX ft_note (note) WITH PARSER ngram,
                CONSTRAINT fk_person FOREIGN KEY (person_id) REFERENCES people (id)
                    ON DELETE CASCADE ON UPDATE SET NULL,
                CHECK (id > 0)
            ) ENGINE = InnoDB, DEFAULT CHARSET = utf8mb4 COMMENT 'all orders'
        ";
        let Statement::CreateTable(def) = parse_one(sql) else {
            panic!("Expected CreateTable");
        };
        assert_eq!(def.table, "orders");
        assert!(def.temporary);
        assert!(def.if_not_exists);
        assert_eq!(def.columns_def.len(), 8);

        let CreateDefinition::PrimaryKey(pk) = &def.columns_def[3] else {
            panic!("Expected primary key");
        };
        assert_eq!(pk.name.as_deref(), Some("pk_orders"));
        assert_eq!(pk.index_type, Some(IndexType::Btree));

        let CreateDefinition::UniqueKey(uk) = &def.columns_def[4] else {
            panic!("Expected unique key");
        };
        assert_eq!(uk.columns[0].length, Some(10));
        assert_eq!(uk.columns[0].sort, Some(SortOrder::Desc));

        assert!(matches!(&def.columns_def[5], CreateDefinition::Index(i) if i.name.is_none()));
        assert!(matches!(
            &def.columns_def[6],
            CreateDefinition::FulltextIndex(i) if i.options.parser.as_deref() == Some("ngram")
        ));

        let CreateDefinition::ForeignKey(fk) = &def.columns_def[7] else {
            panic!("Expected foreign key");
        };
        assert_eq!(fk.symbol.as_deref(), Some("fk_person"));
        assert_eq!(fk.reference.table, "people");
        assert_eq!(fk.reference.on_delete, Some(ReferentialAction::Cascade));
        assert_eq!(fk.reference.on_update, Some(ReferentialAction::SetNull));

        assert_eq!(
            def.table_options,
            [
                TableOption::Engine("InnoDB".into()),
                TableOption::Charset("utf8mb4".into()),
                TableOption::Comment("all orders".into()),
            ]
        );
    }

    #[test]
    fn test_parse_column_attributes() {
        let sql = "CREATE TABLE t (
            a DECIMAL(10, 2) ZEROFILL DEFAULT -1.5 COMMENT 'amount',
            b TIMESTAMP(3) NULL DEFAULT CURRENT_TIMESTAMP(3) ON UPDATE CURRENT_TIMESTAMP(3),
            c ENUM('x', 'y') CHARACTER SET latin1 COLLATE latin1_bin DEFAULT 'x',
            d INT UNIQUE REFERENCES other (id) MATCH FULL,
            e DOUBLE PRECISION DEFAULT NULL,
            f SERIAL,
            g CHAR VARYING(5) INVISIBLE
        )";
        let Statement::CreateTable(def) = parse_one(sql) else {
            panic!("Expected CreateTable");
        };
        let columns: Vec<&ColumnDef> = def
            .columns_def
            .iter()
            .map(|definition| match definition {
                CreateDefinition::Column(column) => column,
                other => panic!("Expected column, got {other:?}"),
            })
            .collect();

        assert_eq!(columns[0].datatype.args, [10, 2]);
        assert!(columns[0].datatype.unsigned);
        assert_eq!(columns[0].options.default, Some(DefaultValue::Real(-1.5)));
        assert_eq!(columns[0].options.comment.as_deref(), Some("amount"));

        assert_eq!(
            columns[1].options.default,
            Some(DefaultValue::Text("CURRENT_TIMESTAMP(3)".into()))
        );
        assert_eq!(
            columns[1].options.on_update.as_deref(),
            Some("CURRENT_TIMESTAMP(3)")
        );

        assert_eq!(columns[2].datatype.values, ["x", "y"]);
        assert_eq!(columns[2].options.charset.as_deref(), Some("latin1"));
        assert_eq!(columns[2].options.collation.as_deref(), Some("latin1_bin"));

        let reference = columns[3].options.reference.as_ref().unwrap();
        assert!(columns[3].options.unique);
        assert_eq!(reference.table, "other");
        assert_eq!(reference.match_type, Some(MatchType::Full));

        assert_eq!(columns[4].datatype.name, TypeName::Double);
        assert_eq!(columns[4].options.default, Some(DefaultValue::Null));

        assert_eq!(columns[5].datatype.name, TypeName::Bigint);
        assert!(columns[5].options.auto_increment);
        assert!(columns[5].options.unique);

        assert_eq!(columns[6].datatype.name, TypeName::Varchar);
        assert!(columns[6].options.invisible);
    }

    #[test]
    fn test_parse_create_table_like() {
        for sql in ["CREATE TABLE b LIKE a", "create table b (like a)"] {
            assert_eq!(
                parse_one(sql),
                Statement::CreateTableLike(CreateTableLikeDef {
                    table: "b".into(),
                    like: "a".into(),
                    temporary: false,
                    if_not_exists: false,
                })
            );
        }
    }

    #[test]
    fn test_alter_add_fulltext_and_spatial_forms() {
        let specs = alter_specs(
            "ALTER TABLE people add fulltext key ftk_id ( id ( 2 ) asc , o_id ) key_block_size 1024 comment 'test';",
        );
        let [AlterSpec::AddIndex { kind, index }] = specs.as_slice() else {
            panic!("Expected a single AddIndex");
        };
        assert_eq!(*kind, IndexKind::Fulltext);
        assert_eq!(index.name.as_deref(), Some("ftk_id"));
        assert_eq!(index.columns.len(), 2);
        assert_eq!(index.columns[0].length, Some(2));
        assert_eq!(index.columns[0].sort, Some(SortOrder::Asc));
        assert_eq!(index.options.key_block_size, Some(1024));
        assert_eq!(index.options.comment.as_deref(), Some("test"));

        for sql in [
            "ALTER TABLE people add fulltext key (id);",
            "ALTER TABLE people add fulltext key(id);",
            "ALTER TABLE people add fulltext (id);",
            "ALTER TABLE people add fulltext(id);",
            "ALTER TABLE people add fulltext index(id);",
        ] {
            assert_eq!(
                alter_specs(sql),
                [AlterSpec::AddIndex {
                    kind: IndexKind::Fulltext,
                    index: IndexDef::on_columns(["id"]),
                }],
                "{sql}"
            );
        }

        for sql in [
            "ALTER TABLE people add spatial key (id);",
            "ALTER TABLE people add spatial(id);",
            "ALTER TABLE people add spatial index (id);",
        ] {
            assert_eq!(
                alter_specs(sql),
                [AlterSpec::AddIndex {
                    kind: IndexKind::Spatial,
                    index: IndexDef::on_columns(["id"]),
                }],
                "{sql}"
            );
        }

        let specs = alter_specs("ALTER TABLE people add spatial index si_id(id)key_block_size 1024;");
        let [AlterSpec::AddIndex { kind, index }] = specs.as_slice() else {
            panic!("Expected a single AddIndex");
        };
        assert_eq!(*kind, IndexKind::Spatial);
        assert_eq!(index.name.as_deref(), Some("si_id"));
        assert_eq!(index.options.key_block_size, Some(1024));
    }

    #[test]
    fn test_alter_add_primary_key_forms() {
        let specs = alter_specs(
            "ALTER TABLE people add constraint pk_id__o_id primary key using btree ( id ( 2 ), o_id ( 3 ) asc ) key_block_size 1024 comment 'test';",
        );
        let [AlterSpec::AddPrimaryKey { key }] = specs.as_slice() else {
            panic!("Expected AddPrimaryKey");
        };
        assert_eq!(key.name.as_deref(), Some("pk_id__o_id"));
        assert_eq!(key.index_type, Some(IndexType::Btree));
        assert_eq!(key.columns[1].length, Some(3));
        assert_eq!(key.columns[1].sort, Some(SortOrder::Asc));
        assert_eq!(key.options.comment.as_deref(), Some("test"));

        let specs = alter_specs(
            "ALTER TABLE people add constraint pk_id__o_id primary key(id(2),o_id(3)asc)key_block_size 1024;",
        );
        assert!(matches!(
            specs.as_slice(),
            [AlterSpec::AddPrimaryKey { key }] if key.columns.len() == 2 && key.options.key_block_size == Some(1024)
        ));

        assert_eq!(
            alter_specs("ALTER TABLE people add primary key(id);"),
            [AlterSpec::AddPrimaryKey {
                key: IndexDef::on_columns(["id"]),
            }]
        );
    }

    #[test]
    fn test_alter_column_specs() {
        let specs = alter_specs(
            "ALTER TABLE t
                ADD COLUMN c INT FIRST,
                ADD d INT AFTER c,
                ADD (e INT, f INT),
                CHANGE COLUMN c cc BIGINT,
                MODIFY d TEXT AFTER cc,
                ALTER COLUMN e SET DEFAULT 3,
                ALTER f DROP DEFAULT,
                RENAME COLUMN e TO ee,
                DROP COLUMN f,
                DROP INDEX idx,
                DROP PRIMARY KEY,
                DROP FOREIGN KEY fk,
                RENAME KEY a TO b,
                RENAME TO t2,
                ALGORITHM = INPLACE,
                ENGINE = MyISAM",
        );
        assert_eq!(specs.len(), 15);
        assert!(matches!(
            &specs[0],
            AlterSpec::AddColumn { column, position: Some(p) } if column.name == "c" && p.after.is_none()
        ));
        assert!(matches!(
            &specs[1],
            AlterSpec::AddColumn { position: Some(p), .. } if p.after.as_deref() == Some("c")
        ));
        assert!(matches!(&specs[2], AlterSpec::AddColumns { columns } if columns.len() == 2));
        assert!(matches!(
            &specs[3],
            AlterSpec::ChangeColumn { column, definition, position: None } if column == "c" && definition.name == "cc"
        ));
        assert!(matches!(&specs[4], AlterSpec::ModifyColumn { position: Some(_), .. }));
        assert_eq!(
            specs[5],
            AlterSpec::SetDefault {
                column: "e".into(),
                value: DefaultValue::Integer(3),
            }
        );
        assert_eq!(specs[6], AlterSpec::DropDefault { column: "f".into() });
        assert_eq!(
            specs[7],
            AlterSpec::RenameColumn {
                column: "e".into(),
                to: "ee".into(),
            }
        );
        assert_eq!(specs[8], AlterSpec::DropColumn { column: "f".into() });
        assert_eq!(specs[9], AlterSpec::DropIndex { index: "idx".into() });
        assert_eq!(specs[10], AlterSpec::DropPrimaryKey);
        assert_eq!(specs[11], AlterSpec::DropForeignKey { symbol: "fk".into() });
        assert_eq!(
            specs[12],
            AlterSpec::RenameIndex {
                index: "a".into(),
                to: "b".into(),
            }
        );
        assert_eq!(specs[13], AlterSpec::RenameTable { to: "t2".into() });
        assert_eq!(
            specs[14],
            AlterSpec::SetOptions {
                options: Vec::from([TableOption::Engine("MyISAM".into())]),
            }
        );
    }

    #[test]
    fn test_parse_index_and_table_statements() {
        let statements = parse(
            "CREATE UNIQUE INDEX u_name USING HASH ON people (name);
             DROP INDEX u_name ON people;
             RENAME TABLE a TO b, c TO d;
             DROP TABLE IF EXISTS b, d;",
        )
        .unwrap();
        assert_eq!(statements.len(), 4);

        let Statement::CreateIndex(create) = &statements[0] else {
            panic!("Expected CreateIndex");
        };
        assert_eq!(create.kind, IndexKind::Unique);
        assert_eq!(create.table, "people");
        assert_eq!(create.index.name.as_deref(), Some("u_name"));
        assert_eq!(create.index.index_type, Some(IndexType::Hash));

        assert_eq!(
            statements[1],
            Statement::DropIndex(DropIndexDef {
                table: "people".into(),
                index: "u_name".into(),
            })
        );
        assert!(matches!(&statements[2], Statement::RenameTable(def) if def.renames.len() == 2));
        assert!(matches!(
            &statements[3],
            Statement::DropTable(def) if def.if_exists && def.tables == ["b", "d"]
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse("SELECT 1"),
            Err(ParseError::UnexpectedToken { pos: 0, .. })
        ));
        assert!(matches!(
            parse("CREATE TABLE t (a WIDGET)"),
            Err(ParseError::UnknownDataType { name, .. }) if name == "WIDGET"
        ));
        assert!(matches!(
            parse("CREATE TABLE t (PRIMARY KEY (a))"),
            Err(ParseError::EmptyColumnList { table }) if table == "t"
        ));
        assert!(matches!(
            parse("CREATE TABLE t (a INT"),
            Err(ParseError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            parse("CREATE TABLE t (a INT) ENGINE InnoDB garbage"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_precision_limits() {
        assert!(parse("CREATE TABLE t (a DECIMAL(65,30), b FLOAT(255,30), c FLOAT(53))").is_ok());
        assert!(matches!(
            parse("CREATE TABLE t (v DECIMAL(3000000000, 0))"),
            Err(ParseError::PrecisionOutOfRange { name, pos: 18 }) if name == "DECIMAL"
        ));
        assert!(matches!(
            parse("CREATE TABLE t (v decimal(10,31))"),
            Err(ParseError::PrecisionOutOfRange { .. })
        ));
        assert!(matches!(
            parse("CREATE TABLE t (v FLOAT(54))"),
            Err(ParseError::PrecisionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_skips_comments_and_empty_statements() {
        let statements = parse(
            "-- schema dump
             ;;
             /* people */ CREATE TABLE people (id INT); # trailing
             ",
        )
        .unwrap();
        assert_eq!(statements.len(), 1);
    }
}
