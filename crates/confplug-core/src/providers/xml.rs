//! XML file provider

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::file::{FileConfigProvider, FileFormat};
use crate::error::BoxError;

/// XML decoding via `quick-xml`'s serde support
///
/// The root element name is not checked; its children map onto the
/// fields of the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlFormat;

impl FileFormat for XmlFormat {
    const KIND: &'static str = "xml";
    const IMPORT_NAME: &'static str = "xml-cfg";
    const DEFAULT_DATA_SOURCE_KEY: &'static str = "external-configuration-xml";

    type Reader = BufReader<File>;

    fn open(path: &Path) -> Result<Self::Reader, BoxError> {
        Ok(BufReader::new(File::open(path)?))
    }

    fn decode<T: DeserializeOwned>(reader: &mut Self::Reader) -> Result<T, BoxError> {
        Ok(quick_xml::de::from_reader(reader)?)
    }
}

/// Provider reading `T` from an XML file
pub type XmlConfigProvider<T> = FileConfigProvider<T, XmlFormat>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ConfigProvider, ProviderContext};
    use crate::settings::{keys, MemorySettings};
    use serde::{Deserialize, Serialize};
    use std::error::Error as StdError;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Endpoint {
        host: String,
        port: u16,
        secure: bool,
    }

    fn context_for(dir: &Path) -> ProviderContext {
        ProviderContext::new(Arc::new(
            MemorySettings::new()
                .with(keys::RESOURCE_DIRECTORY, dir.to_string_lossy())
                .with(XmlFormat::DEFAULT_DATA_SOURCE_KEY, "endpoint.xml"),
        ))
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let expected = Endpoint {
            host: "db.internal".to_string(),
            port: 5432,
            secure: true,
        };
        let xml = quick_xml::se::to_string(&expected).unwrap();
        fs::write(dir.path().join("endpoint.xml"), xml).unwrap();

        let provider = XmlConfigProvider::<Endpoint>::new(context_for(dir.path())).unwrap();
        assert_eq!(provider.configuration(), &expected);
        assert_eq!(provider.kind(), "xml");
        assert_eq!(provider.data_source_key(), "external-configuration-xml");
    }

    #[test]
    fn test_reads_handwritten_document() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("endpoint.xml"),
            "<?xml version=\"1.0\"?>\n<Endpoint>\n  <host>localhost</host>\n  <port>80</port>\n  <secure>false</secure>\n</Endpoint>\n",
        )
        .unwrap();

        let provider = XmlConfigProvider::<Endpoint>::new(context_for(dir.path())).unwrap();
        assert_eq!(provider.configuration().host, "localhost");
        assert_eq!(provider.configuration().port, 80);
    }

    #[test]
    fn test_malformed_payload_keeps_decoder_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("endpoint.xml"), "<Endpoint><host>x</host><port>many</port></Endpoint>").unwrap();

        let err = XmlConfigProvider::<Endpoint>::new(context_for(dir.path())).unwrap_err();
        let cause = StdError::source(&err).unwrap();
        assert!(cause.downcast_ref::<quick_xml::de::DeError>().is_some());
    }
}
