//! Parse-tree nodes produced by the DDL [`Parser`](super::Parser).
//!
//! Every top-level node is an adjacently tagged `{"id": ..., "def": ...}`
//! object, so trees produced by another grammar can be decoded with
//! `serde_json` into the same closed set of variants. The `columnsDef` of a
//! CREATE TABLE node and each of its entries are `{id, def}` nodes as well;
//! an entry's `def` carries exactly one of `column`, `fulltextIndex`,
//! `spatialIndex`, `foreignKey`, `uniqueKey`, `primaryKey` or `index`.
//! Bare arrays and bare entries are accepted on input.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Discriminant of a top-level [`Statement`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// `CREATE TABLE t (...)`.
    CreateTableCommon,
    /// `CREATE TABLE t LIKE other`.
    CreateTableLike,
    /// `ALTER TABLE`.
    AlterTable,
    /// `DROP TABLE`.
    DropTable,
    /// `RENAME TABLE`.
    RenameTable,
    /// `CREATE INDEX`.
    CreateIndex,
    /// `DROP INDEX`.
    DropIndex,
}

impl NodeId {
    /// The wire identifier used in the `id` field of the node.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTableCommon => "P_CREATE_TABLE_COMMON",
            Self::CreateTableLike => "P_CREATE_TABLE_LIKE",
            Self::AlterTable => "P_ALTER_TABLE",
            Self::DropTable => "P_DROP_TABLE",
            Self::RenameTable => "P_RENAME_TABLE",
            Self::CreateIndex => "P_CREATE_INDEX",
            Self::DropIndex => "P_DROP_INDEX",
        }
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed DDL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "id", content = "def")]
pub enum Statement {
    /// CREATE TABLE with a body of create definitions.
    #[serde(rename = "P_CREATE_TABLE_COMMON")]
    CreateTable(CreateTableDef),
    /// CREATE TABLE ... LIKE.
    #[serde(rename = "P_CREATE_TABLE_LIKE")]
    CreateTableLike(CreateTableLikeDef),
    /// ALTER TABLE.
    #[serde(rename = "P_ALTER_TABLE")]
    AlterTable(AlterTableDef),
    /// DROP TABLE.
    #[serde(rename = "P_DROP_TABLE")]
    DropTable(DropTableDef),
    /// RENAME TABLE.
    #[serde(rename = "P_RENAME_TABLE")]
    RenameTable(RenameTableDef),
    /// CREATE INDEX.
    #[serde(rename = "P_CREATE_INDEX")]
    CreateIndex(CreateIndexDef),
    /// DROP INDEX.
    #[serde(rename = "P_DROP_INDEX")]
    DropIndex(DropIndexDef),
}

impl Statement {
    /// The discriminant of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::CreateTable(_) => NodeId::CreateTableCommon,
            Self::CreateTableLike(_) => NodeId::CreateTableLike,
            Self::AlterTable(_) => NodeId::AlterTable,
            Self::DropTable(_) => NodeId::DropTable,
            Self::RenameTable(_) => NodeId::RenameTable,
            Self::CreateIndex(_) => NodeId::CreateIndex,
            Self::DropIndex(_) => NodeId::DropIndex,
        }
    }
}

/// Payload of a `P_CREATE_TABLE_COMMON` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableDef {
    /// Name of the table being created.
    pub table: String,
    /// Whether `TEMPORARY` was given.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub temporary: bool,
    /// Whether `IF NOT EXISTS` was given.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub if_not_exists: bool,
    /// Create definitions, in declaration order.
    #[serde(
        serialize_with = "serialize_definitions",
        deserialize_with = "deserialize_definitions"
    )]
    pub columns_def: Vec<CreateDefinition>,
    /// Trailing table options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub table_options: Vec<TableOption>,
}

/// Payload of a `P_CREATE_TABLE_LIKE` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableLikeDef {
    /// Name of the table being created.
    pub table: String,
    /// Name of the table whose structure is copied.
    pub like: String,
    /// Whether `TEMPORARY` was given.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub temporary: bool,
    /// Whether `IF NOT EXISTS` was given.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub if_not_exists: bool,
}

/// One entry of a CREATE TABLE body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CreateDefinition {
    /// A column definition.
    Column(ColumnDef),
    /// A `FULLTEXT` index.
    FulltextIndex(IndexDef),
    /// A `SPATIAL` index.
    SpatialIndex(IndexDef),
    /// A `FOREIGN KEY` constraint.
    ForeignKey(ForeignKeyDef),
    /// A `UNIQUE` key.
    UniqueKey(IndexDef),
    /// A `PRIMARY KEY` constraint.
    PrimaryKey(IndexDef),
    /// A plain `INDEX`/`KEY`.
    Index(IndexDef),
}

/// Wire identifier of the `columnsDef` node.
const CREATE_DEFINITIONS: &str = "P_CREATE_TABLE_CREATE_DEFINITIONS";
/// Wire identifier of one create-definition entry.
const CREATE_DEFINITION: &str = "O_CREATE_TABLE_CREATE_DEFINITION";

#[derive(Serialize)]
struct TaggedRef<'a, T> {
    id: &'static str,
    def: &'a T,
}

/// A payload with or without its `{id, def}` wrapper. The `id` is not
/// checked.
#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeTagged<T> {
    Tagged { def: T },
    Bare(T),
}

impl<T> MaybeTagged<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Tagged { def } | Self::Bare(def) => def,
        }
    }
}

fn serialize_definitions<S: Serializer>(
    definitions: &[CreateDefinition],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let entries: Vec<TaggedRef<'_, CreateDefinition>> = definitions
        .iter()
        .map(|def| TaggedRef {
            id: CREATE_DEFINITION,
            def,
        })
        .collect();
    TaggedRef {
        id: CREATE_DEFINITIONS,
        def: &entries,
    }
    .serialize(serializer)
}

fn deserialize_definitions<'de, D>(deserializer: D) -> Result<Vec<CreateDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = MaybeTagged::<Vec<MaybeTagged<CreateDefinition>>>::deserialize(deserializer)?;
    Ok(entries
        .into_inner()
        .into_iter()
        .map(MaybeTagged::into_inner)
        .collect())
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Declared data type.
    pub datatype: DatatypeDef,
    /// Column attributes in any order.
    #[serde(default)]
    pub options: ColumnOptionsDef,
}

/// SQL type keyword, after alias folding (`INTEGER` is `INT`, `NUMERIC` is
/// `DECIMAL`, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    /// `BIT`
    Bit,
    /// `TINYINT`
    Tinyint,
    /// `BOOL` / `BOOLEAN`
    Boolean,
    /// `SMALLINT`
    Smallint,
    /// `MEDIUMINT`
    Mediumint,
    /// `INT` / `INTEGER`
    Int,
    /// `BIGINT`
    Bigint,
    /// `DECIMAL` / `DEC` / `NUMERIC` / `FIXED`
    Decimal,
    /// `FLOAT`
    Float,
    /// `DOUBLE` / `DOUBLE PRECISION` / `REAL`
    Double,
    /// `DATE`
    Date,
    /// `TIME`
    Time,
    /// `DATETIME`
    Datetime,
    /// `TIMESTAMP`
    Timestamp,
    /// `YEAR`
    Year,
    /// `CHAR` / `CHARACTER` / `NCHAR`
    Char,
    /// `VARCHAR` / `CHARACTER VARYING` / `NVARCHAR`
    Varchar,
    /// `BINARY`
    Binary,
    /// `VARBINARY`
    Varbinary,
    /// `TINYBLOB`
    Tinyblob,
    /// `BLOB`
    Blob,
    /// `MEDIUMBLOB` / `LONG VARBINARY`
    Mediumblob,
    /// `LONGBLOB`
    Longblob,
    /// `TINYTEXT`
    Tinytext,
    /// `TEXT`
    Text,
    /// `MEDIUMTEXT` / `LONG` / `LONG VARCHAR`
    Mediumtext,
    /// `LONGTEXT`
    Longtext,
    /// `ENUM(...)`
    Enum,
    /// `SET(...)`
    Set,
    /// `JSON`
    Json,
    /// `GEOMETRY`
    Geometry,
    /// `POINT`
    Point,
    /// `LINESTRING`
    Linestring,
    /// `POLYGON`
    Polygon,
    /// `MULTIPOINT`
    Multipoint,
    /// `MULTILINESTRING`
    Multilinestring,
    /// `MULTIPOLYGON`
    Multipolygon,
    /// `GEOMETRYCOLLECTION` / `GEOMCOLLECTION`
    Geometrycollection,
}

impl TypeName {
    /// Resolves a single type keyword, case-insensitively.
    ///
    /// Multi-word spellings (`DOUBLE PRECISION`, `CHARACTER VARYING`,
    /// `LONG VARCHAR`, `NATIONAL CHAR`) are folded by the parser.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        const KEYWORDS: &[(&str, TypeName)] = &[
            ("bit", TypeName::Bit),
            ("tinyint", TypeName::Tinyint),
            ("bool", TypeName::Boolean),
            ("boolean", TypeName::Boolean),
            ("smallint", TypeName::Smallint),
            ("mediumint", TypeName::Mediumint),
            ("int", TypeName::Int),
            ("integer", TypeName::Int),
            ("bigint", TypeName::Bigint),
            ("decimal", TypeName::Decimal),
            ("dec", TypeName::Decimal),
            ("numeric", TypeName::Decimal),
            ("fixed", TypeName::Decimal),
            ("float", TypeName::Float),
            ("double", TypeName::Double),
            ("real", TypeName::Double),
            ("date", TypeName::Date),
            ("time", TypeName::Time),
            ("datetime", TypeName::Datetime),
            ("timestamp", TypeName::Timestamp),
            ("year", TypeName::Year),
            ("char", TypeName::Char),
            ("character", TypeName::Char),
            ("nchar", TypeName::Char),
            ("varchar", TypeName::Varchar),
            ("nvarchar", TypeName::Varchar),
            ("binary", TypeName::Binary),
            ("varbinary", TypeName::Varbinary),
            ("tinyblob", TypeName::Tinyblob),
            ("blob", TypeName::Blob),
            ("mediumblob", TypeName::Mediumblob),
            ("longblob", TypeName::Longblob),
            ("tinytext", TypeName::Tinytext),
            ("text", TypeName::Text),
            ("mediumtext", TypeName::Mediumtext),
            ("long", TypeName::Mediumtext),
            ("longtext", TypeName::Longtext),
            ("enum", TypeName::Enum),
            ("set", TypeName::Set),
            ("json", TypeName::Json),
            ("geometry", TypeName::Geometry),
            ("point", TypeName::Point),
            ("linestring", TypeName::Linestring),
            ("polygon", TypeName::Polygon),
            ("multipoint", TypeName::Multipoint),
            ("multilinestring", TypeName::Multilinestring),
            ("multipolygon", TypeName::Multipolygon),
            ("geometrycollection", TypeName::Geometrycollection),
            ("geomcollection", TypeName::Geometrycollection),
        ];

        KEYWORDS
            .iter()
            .find(|(keyword, _)| keyword.eq_ignore_ascii_case(word))
            .map(|(_, name)| *name)
    }

    /// Whether the type carries a character set and collation.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(
            self,
            Self::Char
                | Self::Varchar
                | Self::Tinytext
                | Self::Text
                | Self::Mediumtext
                | Self::Longtext
                | Self::Enum
                | Self::Set
        )
    }
}

/// A data type as written in the column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatatypeDef {
    /// Type keyword.
    pub name: TypeName,
    /// Parenthesized numeric arguments: `(M)` or `(M, D)`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<u64>,
    /// Members of an `ENUM` or `SET`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// `UNSIGNED` was given.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub unsigned: bool,
    /// `ZEROFILL` was given (implies `UNSIGNED`).
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub zerofill: bool,
}

impl DatatypeDef {
    /// A bare type with no arguments.
    #[must_use]
    pub fn new(name: TypeName) -> Self {
        Self {
            name,
            args: Vec::new(),
            values: Vec::new(),
            unsigned: false,
            zerofill: false,
        }
    }
}

/// A literal default value.
///
/// `Null` is an explicit `DEFAULT NULL` and is distinct from an absent
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// `NULL`.
    Null,
    /// `TRUE` / `FALSE`.
    Bool(bool),
    /// Integer literal.
    Integer(i64),
    /// Decimal or floating literal.
    Real(f64),
    /// String literal, or a function such as `CURRENT_TIMESTAMP` kept verbatim.
    Text(String),
}

/// Deserializes a field that is present in the input, even when `null`.
///
/// Plain `Option<T>` turns a JSON `null` into `None`; defaults need to keep
/// an explicit `null` as `Some(DefaultValue::Null)`.
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Attributes following the data type of a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnOptionsDef {
    /// `NULL` (true) or `NOT NULL` (false); unset when neither was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// `DEFAULT` value.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<DefaultValue>,
    /// `ON UPDATE` expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    /// `AUTO_INCREMENT`.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub auto_increment: bool,
    /// Inline `UNIQUE [KEY]`.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub unique: bool,
    /// Inline `[PRIMARY] KEY`.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub primary_key: bool,
    /// `COMMENT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// `CHARACTER SET`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    /// `COLLATE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
    /// `COLUMN_FORMAT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `STORAGE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    /// `INVISIBLE`.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub invisible: bool,
    /// Inline `REFERENCES` clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceDef>,
}

/// Sort direction of a key part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// `ASC`
    Asc,
    /// `DESC`
    Desc,
}

/// Index algorithm given with `USING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    /// `USING BTREE`
    Btree,
    /// `USING HASH`
    Hash,
}

/// Which index collection a `CREATE INDEX` or `ALTER TABLE ADD` targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Plain index.
    Index,
    /// Unique key.
    Unique,
    /// Fulltext index.
    Fulltext,
    /// Spatial index.
    Spatial,
}

/// One column of a key: `col [(length)] [ASC|DESC]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPart {
    /// Column name.
    pub column: String,
    /// Prefix length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Sort direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl KeyPart {
    /// A key part over the whole column with no explicit direction.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            length: None,
            sort: None,
        }
    }
}

/// Options trailing the key part list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexOptionsDef {
    /// `KEY_BLOCK_SIZE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_block_size: Option<u64>,
    /// `WITH PARSER`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    /// `COMMENT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// `VISIBLE` (true) / `INVISIBLE` (false).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Primary key, unique key, plain, fulltext or spatial index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDef {
    /// Index name, or the `CONSTRAINT` symbol when no name was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `USING` algorithm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_type: Option<IndexType>,
    /// Key parts.
    pub columns: Vec<KeyPart>,
    /// Index options.
    #[serde(default)]
    pub options: IndexOptionsDef,
}

impl IndexDef {
    /// An unnamed index over the given columns.
    #[must_use]
    pub fn on_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            index_type: None,
            columns: columns.into_iter().map(KeyPart::new).collect(),
            options: IndexOptionsDef::default(),
        }
    }
}

/// `MATCH` clause of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// `MATCH FULL`
    Full,
    /// `MATCH PARTIAL`
    Partial,
    /// `MATCH SIMPLE`
    Simple,
}

/// Referential action of `ON DELETE` / `ON UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// `RESTRICT`
    #[serde(rename = "restrict")]
    Restrict,
    /// `CASCADE`
    #[serde(rename = "cascade")]
    Cascade,
    /// `SET NULL`
    #[serde(rename = "set null")]
    SetNull,
    /// `NO ACTION`
    #[serde(rename = "no action")]
    NoAction,
    /// `SET DEFAULT`
    #[serde(rename = "set default")]
    SetDefault,
}

/// `REFERENCES table (cols) [MATCH ...] [ON DELETE ...] [ON UPDATE ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDef {
    /// Referenced table.
    pub table: String,
    /// Referenced columns.
    pub columns: Vec<KeyPart>,
    /// `MATCH` clause.
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    /// `ON DELETE` action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
    /// `ON UPDATE` action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
}

/// `[CONSTRAINT [symbol]] FOREIGN KEY [name] (cols) REFERENCES ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyDef {
    /// Constraint symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Index name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Local columns.
    pub columns: Vec<KeyPart>,
    /// Referenced table and columns.
    pub reference: ReferenceDef,
}

/// A single table option, in the order written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableOption {
    /// `ENGINE`
    Engine(String),
    /// `AUTO_INCREMENT`
    AutoIncrement(u64),
    /// `AVG_ROW_LENGTH`
    AvgRowLength(u64),
    /// `[DEFAULT] CHARACTER SET` / `CHARSET`
    Charset(String),
    /// `CHECKSUM`
    Checksum(bool),
    /// `[DEFAULT] COLLATE`
    Collation(String),
    /// `COMMENT`
    Comment(String),
    /// `COMPRESSION`
    Compression(String),
    /// `CONNECTION`
    Connection(String),
    /// `DATA DIRECTORY`
    DataDirectory(String),
    /// `INDEX DIRECTORY`
    IndexDirectory(String),
    /// `DELAY_KEY_WRITE`
    DelayKeyWrite(bool),
    /// `ENCRYPTION`
    Encryption(bool),
    /// `INSERT_METHOD`
    InsertMethod(String),
    /// `KEY_BLOCK_SIZE`
    KeyBlockSize(u64),
    /// `MAX_ROWS`
    MaxRows(u64),
    /// `MIN_ROWS`
    MinRows(u64),
    /// `PACK_KEYS`
    PackKeys(String),
    /// `PASSWORD`
    Password(String),
    /// `ROW_FORMAT`
    RowFormat(String),
    /// `TABLESPACE`
    Tablespace(String),
    /// `UNION`
    Union(Vec<String>),
}

/// Target position of an added or moved column.
///
/// `after: None` is `FIRST`; `after: Some(name)` is `AFTER name`. An
/// absent position (`Option<Position>::None`) appends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column the target follows, or `None` for the first slot.
    pub after: Option<String>,
}

impl Position {
    /// `FIRST`.
    #[must_use]
    pub const fn first() -> Self {
        Self { after: None }
    }

    /// `AFTER column`.
    #[must_use]
    pub fn after(column: impl Into<String>) -> Self {
        Self {
            after: Some(column.into()),
        }
    }
}

/// Payload of a `P_ALTER_TABLE` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTableDef {
    /// Altered table.
    pub table: String,
    /// Alter specifications, applied in order.
    pub specs: Vec<AlterSpec>,
}

/// One comma-separated clause of an ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AlterSpec {
    /// `ADD [COLUMN] col [FIRST | AFTER c]`
    AddColumn {
        /// New column.
        column: ColumnDef,
        /// Requested position.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    /// `ADD [COLUMN] (col, ...)`
    AddColumns {
        /// New columns, appended in order.
        columns: Vec<ColumnDef>,
    },
    /// `ADD {INDEX | KEY}`, `ADD UNIQUE`, `ADD FULLTEXT`, `ADD SPATIAL`
    AddIndex {
        /// Target collection.
        kind: IndexKind,
        /// Index definition.
        index: IndexDef,
    },
    /// `ADD [CONSTRAINT [sym]] PRIMARY KEY`
    AddPrimaryKey {
        /// Key definition.
        key: IndexDef,
    },
    /// `ADD [CONSTRAINT [sym]] FOREIGN KEY`
    AddForeignKey {
        /// Key definition.
        key: ForeignKeyDef,
    },
    /// `ALTER [COLUMN] c SET DEFAULT v`
    SetDefault {
        /// Target column.
        column: String,
        /// New default.
        value: DefaultValue,
    },
    /// `ALTER [COLUMN] c DROP DEFAULT`
    DropDefault {
        /// Target column.
        column: String,
    },
    /// `CHANGE [COLUMN] old new_def [FIRST | AFTER c]`
    ChangeColumn {
        /// Current column name.
        column: String,
        /// Replacement definition (possibly renamed).
        definition: ColumnDef,
        /// Requested position; unset keeps the current slot.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    /// `MODIFY [COLUMN] def [FIRST | AFTER c]`
    ModifyColumn {
        /// Replacement definition.
        definition: ColumnDef,
        /// Requested position; unset keeps the current slot.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    /// `RENAME COLUMN a TO b`
    RenameColumn {
        /// Current name.
        column: String,
        /// New name.
        to: String,
    },
    /// `DROP [COLUMN] c`
    DropColumn {
        /// Dropped column.
        column: String,
    },
    /// `DROP {INDEX | KEY} n`
    DropIndex {
        /// Dropped index.
        index: String,
    },
    /// `DROP PRIMARY KEY`
    DropPrimaryKey,
    /// `DROP FOREIGN KEY s`
    DropForeignKey {
        /// Dropped constraint symbol.
        symbol: String,
    },
    /// `RENAME {INDEX | KEY} a TO b`
    RenameIndex {
        /// Current name.
        index: String,
        /// New name.
        to: String,
    },
    /// `RENAME [TO | AS] t`
    RenameTable {
        /// New table name.
        to: String,
    },
    /// Table options.
    SetOptions {
        /// Options, in the order written.
        options: Vec<TableOption>,
    },
}

/// Payload of a `P_DROP_TABLE` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTableDef {
    /// Dropped tables.
    pub tables: Vec<String>,
    /// Whether `IF EXISTS` was given.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub if_exists: bool,
}

/// One `a TO b` pair of a RENAME TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRename {
    /// Current name.
    pub from: String,
    /// New name.
    pub to: String,
}

/// Payload of a `P_RENAME_TABLE` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameTableDef {
    /// Renames, applied in order.
    pub renames: Vec<TableRename>,
}

/// Payload of a `P_CREATE_INDEX` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndexDef {
    /// Indexed table.
    pub table: String,
    /// Target collection.
    pub kind: IndexKind,
    /// Index definition.
    pub index: IndexDef,
}

/// Payload of a `P_DROP_INDEX` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropIndexDef {
    /// Table holding the index.
    pub table: String,
    /// Dropped index.
    pub index: String,
}
