//! Canonical data types and the value bounds derived from them.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::sql::tree::{DatatypeDef, TypeName};

/// Canonical, lowercase type name.
///
/// Integer types of every size collapse to [`DatatypeKind::Int`] and are
/// told apart by [`Datatype::width`]; the text and blob families collapse
/// the same way on [`Datatype::length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatatypeKind {
    /// Integers: `TINYINT` through `BIGINT`.
    Int,
    /// Fixed-point `DECIMAL`.
    Decimal,
    /// Single-precision `FLOAT`.
    Float,
    /// Double-precision `DOUBLE`.
    Double,
    /// `BIT(M)`.
    Bit,
    /// `BOOLEAN`.
    Boolean,
    /// `DATE`.
    Date,
    /// `TIME`.
    Time,
    /// `DATETIME`.
    Datetime,
    /// `TIMESTAMP`.
    Timestamp,
    /// `YEAR`.
    Year,
    /// `CHAR(M)`.
    Char,
    /// `VARCHAR(M)`.
    Varchar,
    /// `BINARY(M)`.
    Binary,
    /// `VARBINARY(M)`.
    Varbinary,
    /// The `TEXT` family.
    Text,
    /// The `BLOB` family.
    Blob,
    /// `ENUM(...)`.
    Enum,
    /// `SET(...)`.
    Set,
    /// `JSON`.
    Json,
    /// `GEOMETRY`.
    Geometry,
    /// `POINT`.
    Point,
    /// `LINESTRING`.
    Linestring,
    /// `POLYGON`.
    Polygon,
    /// `MULTIPOINT`.
    Multipoint,
    /// `MULTILINESTRING`.
    Multilinestring,
    /// `MULTIPOLYGON`.
    Multipolygon,
    /// `GEOMETRYCOLLECTION`.
    Geometrycollection,
}

/// A column data type.
///
/// Only the fields meaningful for [`Datatype::datatype`] are set; the
/// others stay `None` (or empty) and are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datatype {
    /// Canonical type name.
    pub datatype: DatatypeKind,
    /// Storage size in bytes, for integers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u8>,
    /// Total digits for fixed and floating point types, display width for
    /// integers, digits for `YEAR`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digits: Option<u32>,
    /// Digits after the decimal point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    /// Maximum length in characters, bytes or bits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Fractional seconds precision for time types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fractional: Option<u8>,
    /// Members of an enum or set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Whether a numeric type is unsigned.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub is_unsigned: bool,
}

const TINYTEXT_LENGTH: u64 = 255;
const TEXT_LENGTH: u64 = 65_535;
const MEDIUMTEXT_LENGTH: u64 = 16_777_215;
const LONGTEXT_LENGTH: u64 = 4_294_967_295;

/// `FLOAT(p)` with a precision above this is stored as `DOUBLE`.
const FLOAT_MAX_PRECISION: u64 = 24;

impl Datatype {
    /// A bare data type with no size attributes.
    #[must_use]
    pub fn new(datatype: DatatypeKind) -> Self {
        Self {
            datatype,
            width: None,
            digits: None,
            decimals: None,
            length: None,
            fractional: None,
            values: Vec::new(),
            is_unsigned: false,
        }
    }

    /// An integer type stored in `width` bytes.
    #[must_use]
    pub fn int(width: u8) -> Self {
        Self {
            width: Some(width),
            ..Self::new(DatatypeKind::Int)
        }
    }

    /// A variable-length string of at most `length` characters.
    #[must_use]
    pub fn varchar(length: u64) -> Self {
        Self {
            length: Some(length),
            ..Self::new(DatatypeKind::Varchar)
        }
    }

    /// Marks a numeric type as unsigned.
    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.is_unsigned = true;
        self
    }

    /// Builds the canonical data type from its parse-tree definition,
    /// filling in the MySQL defaults for omitted sizes.
    #[must_use]
    pub fn from_def(def: &DatatypeDef) -> Self {
        let first = def.args.first().copied();
        let second = def.args.get(1).copied();

        let mut datatype = match def.name {
            TypeName::Tinyint => Self::int(1),
            TypeName::Smallint => Self::int(2),
            TypeName::Mediumint => Self::int(3),
            TypeName::Int => Self::int(4),
            TypeName::Bigint => Self::int(8),
            TypeName::Boolean => Self::new(DatatypeKind::Boolean),
            TypeName::Decimal => Self {
                digits: Some(first.map_or(10, saturating_u32)),
                decimals: Some(second.map_or(0, saturating_u32)),
                ..Self::new(DatatypeKind::Decimal)
            },
            TypeName::Float => match (first, second) {
                (Some(digits), Some(decimals)) => Self {
                    digits: Some(saturating_u32(digits)),
                    decimals: Some(saturating_u32(decimals)),
                    ..Self::new(DatatypeKind::Float)
                },
                (Some(precision), None) if precision > FLOAT_MAX_PRECISION => {
                    Self::new(DatatypeKind::Double)
                }
                _ => Self::new(DatatypeKind::Float),
            },
            TypeName::Double => Self {
                digits: first.filter(|_| second.is_some()).map(saturating_u32),
                decimals: second.map(saturating_u32),
                ..Self::new(DatatypeKind::Double)
            },
            TypeName::Bit => Self {
                length: Some(first.unwrap_or(1)),
                ..Self::new(DatatypeKind::Bit)
            },
            TypeName::Date => Self::new(DatatypeKind::Date),
            TypeName::Time => Self::with_fractional(DatatypeKind::Time, first),
            TypeName::Datetime => Self::with_fractional(DatatypeKind::Datetime, first),
            TypeName::Timestamp => Self::with_fractional(DatatypeKind::Timestamp, first),
            TypeName::Year => Self {
                digits: Some(first.map_or(4, saturating_u32)),
                ..Self::new(DatatypeKind::Year)
            },
            TypeName::Char => Self::with_length(DatatypeKind::Char, Some(first.unwrap_or(1))),
            TypeName::Varchar => Self::with_length(DatatypeKind::Varchar, first),
            TypeName::Binary => Self::with_length(DatatypeKind::Binary, Some(first.unwrap_or(1))),
            TypeName::Varbinary => Self::with_length(DatatypeKind::Varbinary, first),
            TypeName::Tinytext => Self::with_length(DatatypeKind::Text, Some(TINYTEXT_LENGTH)),
            TypeName::Text => {
                Self::with_length(DatatypeKind::Text, Some(first.unwrap_or(TEXT_LENGTH)))
            }
            TypeName::Mediumtext => {
                Self::with_length(DatatypeKind::Text, Some(MEDIUMTEXT_LENGTH))
            }
            TypeName::Longtext => Self::with_length(DatatypeKind::Text, Some(LONGTEXT_LENGTH)),
            TypeName::Tinyblob => Self::with_length(DatatypeKind::Blob, Some(TINYTEXT_LENGTH)),
            TypeName::Blob => {
                Self::with_length(DatatypeKind::Blob, Some(first.unwrap_or(TEXT_LENGTH)))
            }
            TypeName::Mediumblob => {
                Self::with_length(DatatypeKind::Blob, Some(MEDIUMTEXT_LENGTH))
            }
            TypeName::Longblob => Self::with_length(DatatypeKind::Blob, Some(LONGTEXT_LENGTH)),
            TypeName::Enum => Self {
                values: def.values.clone(),
                ..Self::new(DatatypeKind::Enum)
            },
            TypeName::Set => Self {
                values: def.values.clone(),
                ..Self::new(DatatypeKind::Set)
            },
            TypeName::Json => Self::new(DatatypeKind::Json),
            TypeName::Geometry => Self::new(DatatypeKind::Geometry),
            TypeName::Point => Self::new(DatatypeKind::Point),
            TypeName::Linestring => Self::new(DatatypeKind::Linestring),
            TypeName::Polygon => Self::new(DatatypeKind::Polygon),
            TypeName::Multipoint => Self::new(DatatypeKind::Multipoint),
            TypeName::Multilinestring => Self::new(DatatypeKind::Multilinestring),
            TypeName::Multipolygon => Self::new(DatatypeKind::Multipolygon),
            TypeName::Geometrycollection => Self::new(DatatypeKind::Geometrycollection),
        };

        if datatype.datatype == DatatypeKind::Int {
            datatype.digits = first.map(saturating_u32);
        }
        if datatype.is_numeric() {
            datatype.is_unsigned = def.unsigned || def.zerofill;
        }

        datatype
    }

    fn with_fractional(datatype: DatatypeKind, fractional: Option<u64>) -> Self {
        Self {
            fractional: Some(fractional.map_or(0, |f| u8::try_from(f).unwrap_or(u8::MAX))),
            ..Self::new(datatype)
        }
    }

    fn with_length(datatype: DatatypeKind, length: Option<u64>) -> Self {
        Self {
            length,
            ..Self::new(datatype)
        }
    }

    /// Whether the type is an integer, fixed-point or floating-point number.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.datatype,
            DatatypeKind::Int | DatatypeKind::Decimal | DatatypeKind::Float | DatatypeKind::Double
        )
    }

    /// Computes the value constraints implied by this type.
    #[must_use]
    pub fn projection(&self) -> DatatypeProjection {
        let mut projection = DatatypeProjection::default();

        match self.datatype {
            DatatypeKind::Int => {
                if let Some((min, max)) =
                    self.width.and_then(|w| integer_bounds(w, self.is_unsigned))
                {
                    projection.min = Some(min);
                    projection.max = Some(max);
                }
            }
            DatatypeKind::Decimal | DatatypeKind::Float => {
                if let Some(limit) =
                    self.digits.and_then(|d| nines(d, self.decimals.unwrap_or(0)))
                {
                    projection.min = Some(if self.is_unsigned { 0.0 } else { -limit });
                    projection.max = Some(limit);
                }
            }
            DatatypeKind::Date => projection.format = Some(ValueFormat::Date),
            DatatypeKind::Time => projection.format = Some(ValueFormat::Time),
            DatatypeKind::Datetime => projection.format = Some(ValueFormat::DateTime),
            DatatypeKind::Year => {
                projection.pattern = Some(format!(r"^\d{{1,{}}}$", self.digits.unwrap_or(4)));
            }
            DatatypeKind::Char
            | DatatypeKind::Varchar
            | DatatypeKind::Binary
            | DatatypeKind::Varbinary
            | DatatypeKind::Text => projection.max_length = self.length,
            DatatypeKind::Enum => projection.allowed.clone_from(&self.values),
            DatatypeKind::Set => projection.pattern = Some(set_pattern(&self.values)),
            _ => {}
        }

        projection
    }
}

fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Bounds of an integer stored in `width` bytes.
///
/// Unsigned: `[0, 2^(8w)]`. Signed: `min = -2^(8w)/2`, `max = -min - 1`.
#[allow(clippy::cast_precision_loss)]
fn integer_bounds(width: u8, unsigned: bool) -> Option<(f64, f64)> {
    if width == 0 || width > 8 {
        return None;
    }
    let span = 1u128 << (8 * u32::from(width));
    if unsigned {
        Some((0.0, span as f64))
    } else {
        let half = span / 2;
        Some((-(half as f64), (half - 1) as f64))
    }
}

/// Integer nines beyond which the value is not a finite `f64`.
const MAX_INTEGER_NINES: u32 = 308;
/// Fractional nines past this count no longer change the nearest `f64`.
const MAX_FRACTION_NINES: u32 = 40;

/// The largest value with `digits - decimals` integer nines and `decimals`
/// fractional nines, or `None` when it is not a finite `f64`.
fn nines(digits: u32, decimals: u32) -> Option<f64> {
    let decimals = decimals.min(digits);
    let integer_nines = digits - decimals;
    if integer_nines > MAX_INTEGER_NINES {
        return None;
    }
    let integer = "9".repeat(usize::try_from(integer_nines).ok()?);
    let fraction = "9".repeat(usize::try_from(decimals.min(MAX_FRACTION_NINES)).ok()?);
    let literal = match (integer.is_empty(), fraction.is_empty()) {
        (true, true) => return None,
        (false, true) => integer,
        (true, false) => format!("0.{fraction}"),
        (false, false) => format!("{integer}.{fraction}"),
    };
    literal.parse().ok()
}

/// A pattern matching any comma-joined, order-preserving, repetition-free
/// subsequence of `values`, including the empty one.
///
/// For `[a, b, c]` the alternation is `a(?:,b)?(?:,c)?|b(?:,c)?|c`.
fn set_pattern(values: &[String]) -> String {
    let escaped: Vec<String> = values.iter().map(|v| escape_regex(v)).collect();
    let mut alternatives = Vec::with_capacity(escaped.len());
    for (i, head) in escaped.iter().enumerate() {
        let mut alternative = head.clone();
        for tail in &escaped[i + 1..] {
            alternative.push_str("(?:,");
            alternative.push_str(tail);
            alternative.push_str(")?");
        }
        alternatives.push(alternative);
    }
    format!("^(?:{})?$", alternatives.join("|"))
}

/// Escapes the characters that are special in both ECMA-262 and Rust regexes.
fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Well-known string format of a temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueFormat {
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    DateTime,
}

impl ValueFormat {
    /// JSON Schema `format` keyword value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date-time",
        }
    }
}

/// Value constraints derived from a [`Datatype`].
///
/// Formatters map these onto their own keywords.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatatypeProjection {
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Upper bound.
    pub max: Option<f64>,
    /// Temporal format hint.
    pub format: Option<ValueFormat>,
    /// Regular expression the textual value must match.
    pub pattern: Option<String>,
    /// Maximum length.
    pub max_length: Option<u64>,
    /// Allowed values.
    pub allowed: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn def(name: TypeName, args: &[u64]) -> DatatypeDef {
        let mut def = DatatypeDef::new(name);
        def.args = args.to_vec();
        def
    }

    #[test]
    fn test_integer_widths_and_bounds() {
        let tiny = Datatype::from_def(&def(TypeName::Tinyint, &[]));
        assert_eq!(tiny.width, Some(1));
        assert_eq!(tiny.digits, None);
        let projection = tiny.projection();
        assert_eq!(projection.min, Some(-128.0));
        assert_eq!(projection.max, Some(127.0));

        let mut unsigned = def(TypeName::Smallint, &[5]);
        unsigned.unsigned = true;
        let small = Datatype::from_def(&unsigned);
        assert_eq!(small.digits, Some(5));
        assert!(small.is_unsigned);
        let projection = small.projection();
        assert_eq!(projection.min, Some(0.0));
        assert_eq!(projection.max, Some(65536.0));

        let big = Datatype::from_def(&def(TypeName::Bigint, &[])).projection();
        assert_eq!(big.min, Some(-9_223_372_036_854_775_808.0));
    }

    #[test]
    fn test_decimal_defaults_and_bounds() {
        let decimal = Datatype::from_def(&def(TypeName::Decimal, &[]));
        assert_eq!(decimal.digits, Some(10));
        assert_eq!(decimal.decimals, Some(0));

        let money = Datatype::from_def(&def(TypeName::Decimal, &[5, 2])).projection();
        assert_eq!(money.min, Some(-999.99));
        assert_eq!(money.max, Some(999.99));

        let fraction = Datatype::from_def(&def(TypeName::Decimal, &[2, 2])).projection();
        assert_eq!(fraction.min, Some(-0.99));
    }

    #[test]
    fn test_oversized_precision_is_bounded() {
        let wide = Datatype::from_def(&def(TypeName::Decimal, &[300, 0])).projection();
        assert!(wide.max.is_some_and(f64::is_finite));

        let huge = Datatype::from_def(&def(TypeName::Decimal, &[3_000_000_000, 0])).projection();
        assert_eq!(huge.min, None);
        assert_eq!(huge.max, None);

        let deep = Datatype::from_def(&def(TypeName::Decimal, &[3_000_000_000, 2_999_999_999]));
        assert_eq!(deep.projection().max, Some(10.0));
    }

    #[test]
    fn test_float_precision_and_double() {
        assert_eq!(
            Datatype::from_def(&def(TypeName::Float, &[30])).datatype,
            DatatypeKind::Double
        );
        let float = Datatype::from_def(&def(TypeName::Float, &[7, 3]));
        assert_eq!(float.projection().min, Some(-9999.999));

        let double = Datatype::from_def(&def(TypeName::Double, &[7, 3]));
        assert_eq!(double.digits, Some(7));
        assert_eq!(double.projection().min, None);
    }

    #[test]
    fn test_only_relevant_fields_are_set() {
        let varchar = Datatype::from_def(&def(TypeName::Varchar, &[50]));
        assert_eq!(varchar, Datatype::varchar(50));

        let mut unsigned_text = def(TypeName::Text, &[]);
        unsigned_text.unsigned = true;
        let text = Datatype::from_def(&unsigned_text);
        assert_eq!(text.length, Some(65_535));
        assert!(!text.is_unsigned);

        let value = serde_json::to_value(Datatype::from_def(&def(TypeName::Datetime, &[3]))).unwrap();
        assert_eq!(value, serde_json::json!({"datatype": "datetime", "fractional": 3}));
    }

    #[test]
    fn test_temporal_and_textual_projections() {
        assert_eq!(
            Datatype::from_def(&def(TypeName::Datetime, &[])).projection().format,
            Some(ValueFormat::DateTime)
        );
        assert_eq!(
            Datatype::from_def(&def(TypeName::Timestamp, &[3])).projection(),
            DatatypeProjection::default()
        );
        assert_eq!(
            Datatype::from_def(&def(TypeName::Year, &[])).projection().pattern.as_deref(),
            Some(r"^\d{1,4}$")
        );
        assert_eq!(
            Datatype::from_def(&def(TypeName::Char, &[])).projection().max_length,
            Some(1)
        );
        assert_eq!(
            Datatype::from_def(&def(TypeName::Longtext, &[])).projection().max_length,
            Some(4_294_967_295)
        );
    }

    #[test]
    fn test_enum_projection() {
        let mut enum_def = DatatypeDef::new(TypeName::Enum);
        enum_def.values = vec!["small".to_string(), "large".to_string()];
        let projection = Datatype::from_def(&enum_def).projection();
        assert_eq!(projection.allowed, ["small", "large"]);
    }

    #[test]
    fn test_set_pattern_shape() {
        let values = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(
            set_pattern(&values),
            "^(?:a(?:,b)?(?:,c)?|b(?:,c)?|c)?$"
        );
        assert_eq!(escape_regex("x.y(z)"), r"x\.y\(z\)");
    }
}
