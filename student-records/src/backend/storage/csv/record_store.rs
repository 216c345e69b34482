//! # Record Store
//!
//! Append, scan and filtered-rewrite over a single flat table file.
//!
//! Appends open the file in append mode and write exactly one line. Scans are
//! lazy and re-open the file every time they are started. Deletion rewrites
//! the table into a sibling `.tmp` file and renames it over the table file, so a
//! failure mid-write never truncates the live table.
//!
//! Quoting is off in both directions, so every line is split on each comma
//! exactly as it was written. Lines that are not valid UTF-8 count as
//! malformed.

use csv::{
    ByteRecord, ByteRecordsIntoIter, QuoteStyle, Reader, ReaderBuilder, StringRecord, Terminator,
    WriterBuilder,
};
use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use super::schema::{Record, TableSchema, FIELD_DELIMITER};
use crate::backend::error::Result;

/// A single table backed by one file
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    schema: &'static TableSchema,
}

impl RecordStore {
    pub fn new<P: AsRef<Path>>(path: P, schema: &'static TableSchema) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            schema,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    /// Create the table file (and its directory) if it does not exist yet.
    /// Returns true when a file was created.
    pub fn initialize_if_absent(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&self.path)?;

        info!("Created empty {} table at {:?}", self.schema.name, self.path);
        Ok(true)
    }

    /// Append one record as a new line
    pub fn append<S: AsRef<str>>(&self, fields: &[S]) -> Result<()> {
        self.schema.check_fields(fields)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut csv_writer = Self::writer_builder().from_writer(BufWriter::new(file));
        csv_writer.write_record(fields.iter().map(|field| field.as_ref()))?;
        csv_writer.flush()?;

        debug!("Appended record to {} table", self.schema.name);
        Ok(())
    }

    /// Lazily iterate over every well-formed record.
    ///
    /// A missing file reads as an empty table. Malformed lines are skipped
    /// with a warning.
    pub fn scan(&self) -> Result<RecordIter> {
        if !self.path.exists() {
            debug!("No {} table at {:?}, scanning as empty", self.schema.name, self.path);
            return Ok(RecordIter {
                records: None,
                schema: self.schema,
            });
        }

        Ok(RecordIter {
            records: Some(self.reader()?.into_byte_records()),
            schema: self.schema,
        })
    }

    /// Every record whose key column equals `key`, in file order
    pub fn find_by_key(&self, key: &str) -> Result<Vec<Record>> {
        let schema = self.schema;
        self.scan()?
            .filter(|result| match result {
                Ok(record) => schema.key_of(record) == Some(key),
                Err(_) => true,
            })
            .collect()
    }

    /// Every record in the table, in file order
    pub fn read_all(&self) -> Result<Vec<Record>> {
        self.scan()?.collect()
    }

    /// Rewrite the table without the records whose key column equals `key`.
    ///
    /// Malformed lines are carried over verbatim. Returns the number of
    /// records removed.
    pub fn rewrite_excluding(&self, key: &str) -> Result<usize> {
        if !self.path.exists() {
            debug!("No {} table at {:?}, nothing to rewrite", self.schema.name, self.path);
            return Ok(0);
        }

        let temp_path = self.path.with_extension("tmp");
        let outcome = self.write_filtered(key, &temp_path).and_then(|removed| {
            fs::rename(&temp_path, &self.path)?;
            Ok(removed)
        });

        match outcome {
            Ok(removed) => {
                info!("Removed {} record(s) from {} table", removed, self.schema.name);
                Ok(removed)
            }
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }

    fn write_filtered(&self, key: &str, temp_path: &Path) -> Result<usize> {
        let mut csv_reader = self.reader()?;
        let mut csv_writer =
            Self::writer_builder().from_writer(BufWriter::new(File::create(temp_path)?));

        let mut removed = 0;
        for result in csv_reader.byte_records() {
            let raw = result?;
            let matches = self
                .parse(&raw)
                .map_or(false, |record| self.schema.key_of(&record) == Some(key));

            if matches {
                removed += 1;
            } else {
                csv_writer.write_byte_record(&raw)?;
            }
        }

        csv_writer.flush()?;
        Ok(removed)
    }

    fn parse(&self, raw: &ByteRecord) -> Option<Record> {
        let text = StringRecord::from_byte_record(raw.clone()).ok()?;
        self.schema.normalize(&text)
    }

    fn reader(&self) -> Result<Reader<BufReader<File>>> {
        let file = File::open(&self.path)?;
        Ok(ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .delimiter(FIELD_DELIMITER)
            .from_reader(BufReader::new(file)))
    }

    fn writer_builder() -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(FIELD_DELIMITER)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'));
        builder
    }
}

/// Lazy sequence of records from one pass over a table file
pub struct RecordIter {
    records: Option<ByteRecordsIntoIter<BufReader<File>>>,
    schema: &'static TableSchema,
}

impl Iterator for RecordIter {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let records = self.records.as_mut()?;
        loop {
            let raw = match records.next()? {
                Ok(raw) => raw,
                Err(e) => return Some(Err(e.into())),
            };

            let line = raw.position().map(|p| p.line()).unwrap_or_default();
            let field_count = raw.len();
            let text = match StringRecord::from_byte_record(raw) {
                Ok(text) => text,
                Err(_) => {
                    warn!(
                        "Skipping malformed line {} in {} table: not valid UTF-8",
                        line, self.schema.name
                    );
                    continue;
                }
            };

            match self.schema.normalize(&text) {
                Some(record) => return Some(Ok(record)),
                None => warn!(
                    "Skipping malformed line {} in {} table: expected {} fields, found {}",
                    line,
                    self.schema.name,
                    self.schema.arity(),
                    field_count
                ),
            }
        }
    }
}
