//! JSON file provider

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::file::{FileConfigProvider, FileFormat};
use crate::error::BoxError;

/// JSON decoding via `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl FileFormat for JsonFormat {
    const KIND: &'static str = "json";
    const IMPORT_NAME: &'static str = "json-cfg";
    const DEFAULT_DATA_SOURCE_KEY: &'static str = "external-configuration-json";

    type Reader = BufReader<File>;

    fn open(path: &Path) -> Result<Self::Reader, BoxError> {
        Ok(BufReader::new(File::open(path)?))
    }

    fn decode<T: DeserializeOwned>(reader: &mut Self::Reader) -> Result<T, BoxError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Provider reading `T` from a JSON file
pub type JsonConfigProvider<T> = FileConfigProvider<T, JsonFormat>;
