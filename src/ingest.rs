//! CSV ingestion for the three source tables.
//!
//! Loaders decode rows straight into the record types via serde. No
//! cleaning happens here: duplicates, free-text gender values, and
//! textual dates all land in the tables exactly as the source provides
//! them, for the cleaning pass to fix.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::model::{Customer, InventoryItem, Sale};

/// Options for reading source CSV files.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Delimiter character.
    pub delimiter: u8,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Whether to trim whitespace around fields and headers.
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            trim: true,
        }
    }
}

fn read_records<R: DeserializeOwned>(
    reader: impl Read,
    options: &CsvOptions,
) -> Result<Vec<R>> {
    let trim = if options.trim {
        csv::Trim::All
    } else {
        csv::Trim::None
    };
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .trim(trim)
        .from_reader(reader);

    let mut records = Vec::new();
    for record in csv_reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

fn read_records_from_path<R: DeserializeOwned>(
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> Result<Vec<R>> {
    let file = File::open(path)?;
    read_records(BufReader::new(file), options)
}

/// Read customer rows from any reader.
pub fn customers_from_reader(reader: impl Read, options: &CsvOptions) -> Result<Vec<Customer>> {
    read_records(reader, options)
}

/// Read customer rows from a CSV file.
pub fn customers_from_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Vec<Customer>> {
    read_records_from_path(path, options)
}

/// Read sale rows from any reader.
pub fn sales_from_reader(reader: impl Read, options: &CsvOptions) -> Result<Vec<Sale>> {
    read_records(reader, options)
}

/// Read sale rows from a CSV file.
pub fn sales_from_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Vec<Sale>> {
    read_records_from_path(path, options)
}

/// Read inventory rows from any reader.
pub fn inventory_from_reader(
    reader: impl Read,
    options: &CsvOptions,
) -> Result<Vec<InventoryItem>> {
    read_records(reader, options)
}

/// Read inventory rows from a CSV file.
pub fn inventory_from_path(
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> Result<Vec<InventoryItem>> {
    read_records_from_path(path, options)
}
