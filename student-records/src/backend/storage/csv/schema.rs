//! Table layouts for the four student data files.
//!
//! Each table is a headerless, comma-delimited file with one record per line.
//! The profile table keeps the student ID in its last column; the other three
//! lead with it.
//!
//! Fields are never quoted. A comma is only allowed in the last column of a
//! table that absorbs overflow, and no field may contain a line break.

use csv::StringRecord;

use crate::backend::error::{Result, StudentRecordsError};

/// Field delimiter shared by every table
pub const FIELD_DELIMITER: u8 = b',';

/// Describes the shape of one table on disk
#[derive(Debug, PartialEq, Eq)]
pub struct TableSchema {
    /// Human-readable table name used in logs and errors
    pub name: &'static str,
    /// File name inside the data directory
    pub file_name: &'static str,
    /// Ordered column names
    pub columns: &'static [&'static str],
    /// Index of the column holding the student ID
    pub key_column: usize,
    /// When set, extra delimiters on a line belong to the last column.
    /// Lines written without quoting (`1234567,Math,Art`) read back as two fields.
    pub trailing_absorbs_overflow: bool,
}

pub const PROFILE_TABLE: TableSchema = TableSchema {
    name: "profile",
    file_name: "students.txt",
    columns: &["first_name", "last_name", "age", "gender", "student_id"],
    key_column: 4,
    trailing_absorbs_overflow: false,
};

pub const CREDENTIAL_TABLE: TableSchema = TableSchema {
    name: "credential",
    file_name: "passwords.txt",
    columns: &["student_id", "password"],
    key_column: 0,
    trailing_absorbs_overflow: true,
};

pub const SUBJECT_TABLE: TableSchema = TableSchema {
    name: "subject",
    file_name: "subjects.txt",
    columns: &["student_id", "subjects"],
    key_column: 0,
    trailing_absorbs_overflow: true,
};

pub const SPORT_TABLE: TableSchema = TableSchema {
    name: "sport",
    file_name: "sports.txt",
    columns: &["student_id", "description"],
    key_column: 0,
    trailing_absorbs_overflow: true,
};

/// All tables, in the order deletions are applied
pub const ALL_TABLES: [&TableSchema; 4] = [
    &PROFILE_TABLE,
    &CREDENTIAL_TABLE,
    &SUBJECT_TABLE,
    &SPORT_TABLE,
];

/// One parsed line of a table, always holding exactly `arity()` fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

impl TableSchema {
    /// Number of fields in a well-formed record
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Check that a record can be written as a single unquoted line
    pub(crate) fn check_fields<S: AsRef<str>>(&self, fields: &[S]) -> Result<()> {
        if fields.len() != self.arity() {
            return Err(StudentRecordsError::Validation(format!(
                "{} table expects {} fields, got {}",
                self.name,
                self.arity(),
                fields.len()
            )));
        }

        let delimiter = char::from(FIELD_DELIMITER);
        for (index, field) in fields.iter().enumerate() {
            let field = field.as_ref();
            if field.contains(&['\n', '\r'][..]) {
                return Err(StudentRecordsError::Validation(format!(
                    "{} cannot contain a line break",
                    self.columns[index]
                )));
            }
            let absorbs = self.trailing_absorbs_overflow && index == self.arity() - 1;
            if !absorbs && field.contains(delimiter) {
                return Err(StudentRecordsError::Validation(format!(
                    "{} cannot contain '{}'",
                    self.columns[index], delimiter
                )));
            }
        }
        Ok(())
    }

    /// Turn a raw CSV line into a record, or `None` if the line is malformed
    pub(crate) fn normalize(&self, raw: &StringRecord) -> Option<Record> {
        let arity = self.arity();
        if raw.len() < arity || (raw.len() > arity && !self.trailing_absorbs_overflow) {
            return None;
        }

        let mut fields: Vec<String> = raw.iter().take(arity - 1).map(str::to_string).collect();
        let separator = char::from(FIELD_DELIMITER).to_string();
        fields.push(raw.iter().skip(arity - 1).collect::<Vec<_>>().join(&separator));

        Some(Record::new(fields))
    }

    /// The student ID of a well-formed record
    pub fn key_of<'a>(&self, record: &'a Record) -> Option<&'a str> {
        record.get(self.key_column)
    }
}
