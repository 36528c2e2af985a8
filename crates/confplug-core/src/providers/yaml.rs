//! YAML file provider

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::file::{FileConfigProvider, FileFormat};
use crate::error::BoxError;

/// YAML decoding via `serde_yaml`
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl FileFormat for YamlFormat {
    const KIND: &'static str = "yaml";
    const IMPORT_NAME: &'static str = "yaml-cfg";
    const DEFAULT_DATA_SOURCE_KEY: &'static str = "external-configuration-yaml";

    type Reader = BufReader<File>;

    fn open(path: &Path) -> Result<Self::Reader, BoxError> {
        Ok(BufReader::new(File::open(path)?))
    }

    fn decode<T: DeserializeOwned>(reader: &mut Self::Reader) -> Result<T, BoxError> {
        Ok(serde_yaml::from_reader(reader)?)
    }
}

/// Provider reading `T` from a YAML file
pub type YamlConfigProvider<T> = FileConfigProvider<T, YamlFormat>;
