// ==============================================================================
// parsers/table.rs - Feature Table Reader
// ==============================================================================
// Description: Reader for tab-delimited feature tables (plain or gzipped) that
//              supplies the header schema and per-row records to templates
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Format: Tab-delimited text, first non-comment row is the header
// Example:
//   # exported feature table
//   locus_tag    gene    type    product
//   b0001    thrL    CDS    thr operon leader peptide
//   b0002    thrA    CDS    aspartokinase I
// ==============================================================================

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::schema::Header;

/// Errors that can occur while reading a feature table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid row at line {line}: {details}")]
    InvalidRow { line: u64, details: String },

    #[error("Table has no header row")]
    MissingHeader,
}

/// Streaming reader over the rows of a feature table
pub struct TableReader {
    header: Header,
    records: StringRecordsIntoIter<Box<dyn Read>>,
}

impl TableReader {
    /// Open a table file, decompressing it when the name ends in `.gz`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        info!("Opening feature table: {:?}", path);

        let file = BufReader::new(File::open(path)?);
        let is_gzip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

        let source: Box<dyn Read> = if is_gzip {
            debug!("Reading gzip-compressed table");
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };

        Self::from_reader(source)
    }

    /// Read a table from any byte source
    pub fn from_reader(source: Box<dyn Read>) -> Result<Self, TableError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .quoting(false)
            .comment(Some(b'#'))
            .flexible(false)
            .from_reader(source);

        let names = reader.headers()?.clone();
        if names.is_empty() {
            return Err(TableError::MissingHeader);
        }
        let header = Header::new(names.iter().map(str::trim));
        debug!("Table header: {} columns", header.len());

        Ok(Self {
            header,
            records: reader.into_records(),
        })
    }

    /// Column schema used to compile templates for this table
    pub fn header(&self) -> &Header {
        &self.header
    }
}

impl Iterator for TableReader {
    type Item = Result<StringRecord, TableError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.records.next()?;
        Some(result.map_err(|e| {
            if let csv::ErrorKind::UnequalLengths { pos, expected_len, len } = e.kind() {
                return TableError::InvalidRow {
                    line: pos.as_ref().map_or(0, |p| p.line()),
                    details: format!("Expected {} tab-delimited fields, found {}", expected_len, len),
                };
            }
            TableError::CsvError(e)
        }))
    }
}
