//! Table-level options.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::sql::tree::TableOption;

/// Table options, one slot per option. A repeated option keeps the last value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    /// Storage engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Next `AUTO_INCREMENT` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoincrement: Option<u64>,
    /// Average row length hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_row_length: Option<u64>,
    /// Default character set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    /// Live checksum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<bool>,
    /// Default collation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
    /// Table comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Page compression algorithm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
    /// Connection string of a federated table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    /// Data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_directory: Option<String>,
    /// Index directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_directory: Option<String>,
    /// Delayed key writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_key_write: Option<bool>,
    /// Page encryption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<bool>,
    /// Insert method of a merge table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_method: Option<String>,
    /// Key block size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_block_size: Option<u64>,
    /// Maximum rows hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u64>,
    /// Minimum rows hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rows: Option<u64>,
    /// Index packing: `0`, `1` or `DEFAULT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_keys: Option<String>,
    /// `.frm` password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Physical row format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_format: Option<String>,
    /// Tablespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablespace: Option<String>,
    /// Underlying tables of a merge table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub union: Vec<String>,
}

impl TableOptions {
    /// Collects options in the order written.
    #[must_use]
    pub fn from_def(options: &[TableOption]) -> Self {
        let mut collected = Self::default();
        collected.merge(options);
        collected
    }

    /// Applies options on top of the current ones.
    pub fn merge(&mut self, options: &[TableOption]) {
        for option in options {
            self.apply(option.clone());
        }
    }

    fn apply(&mut self, option: TableOption) {
        match option {
            TableOption::Engine(v) => self.engine = Some(v),
            TableOption::AutoIncrement(v) => self.autoincrement = Some(v),
            TableOption::AvgRowLength(v) => self.avg_row_length = Some(v),
            TableOption::Charset(v) => self.charset = Some(v),
            TableOption::Checksum(v) => self.checksum = Some(v),
            TableOption::Collation(v) => self.collation = Some(v),
            TableOption::Comment(v) => self.comment = Some(v),
            TableOption::Compression(v) => self.compression = Some(v),
            TableOption::Connection(v) => self.connection = Some(v),
            TableOption::DataDirectory(v) => self.data_directory = Some(v),
            TableOption::IndexDirectory(v) => self.index_directory = Some(v),
            TableOption::DelayKeyWrite(v) => self.delay_key_write = Some(v),
            TableOption::Encryption(v) => self.encryption = Some(v),
            TableOption::InsertMethod(v) => self.insert_method = Some(v),
            TableOption::KeyBlockSize(v) => self.key_block_size = Some(v),
            TableOption::MaxRows(v) => self.max_rows = Some(v),
            TableOption::MinRows(v) => self.min_rows = Some(v),
            TableOption::PackKeys(v) => self.pack_keys = Some(v),
            TableOption::Password(v) => self.password = Some(v),
            TableOption::RowFormat(v) => self.row_format = Some(v),
            TableOption::Tablespace(v) => self.tablespace = Some(v),
            TableOption::Union(v) => self.union = v,
        }
    }

    /// Whether no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_value_wins() {
        let options = TableOptions::from_def(&[
            TableOption::Engine("MyISAM".into()),
            TableOption::Comment("people".into()),
            TableOption::Engine("InnoDB".into()),
        ]);
        assert_eq!(options.engine.as_deref(), Some("InnoDB"));
        assert_eq!(options.comment.as_deref(), Some("people"));
        assert!(!options.is_empty());
        assert!(TableOptions::from_def(&[]).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let options = TableOptions::from_def(&[
            TableOption::AutoIncrement(5),
            TableOption::Charset("utf8mb4".into()),
        ]);
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"autoincrement": 5, "charset": "utf8mb4"})
        );
    }
}
