use crate::error::{CodecError, Result, ShelfError};
use crate::logger::{ConsoleLogger, Logger};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// On-disk encoding of records. Decides both the serializer and the file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// File suffix appended to resource names, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => ".json",
            Format::Yaml => ".yaml",
        }
    }

    /// Serialize a value in human-readable form, terminated by a newline.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let mut bytes = match self {
            Format::Json => {
                let mut buf = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
                value
                    .serialize(&mut ser)
                    .map_err(|e| ShelfError::Serialize(CodecError::Json(e)))?;
                buf
            }
            Format::Yaml => serde_yaml::to_string(value)
                .map_err(|e| ShelfError::Serialize(CodecError::Yaml(e)))?
                .into_bytes(),
        };
        if bytes.last() != Some(&b'\n') {
            bytes.push(b'\n');
        }
        Ok(bytes)
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self {
            Format::Json => serde_json::from_slice(bytes)
                .map_err(|e| ShelfError::Deserialize(CodecError::Json(e))),
            Format::Yaml => serde_yaml::from_slice(bytes)
                .map_err(|e| ShelfError::Deserialize(CodecError::Yaml(e))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::Yaml => f.write_str("yaml"),
        }
    }
}

/// How reads relate to concurrent writes within the same collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Consistency {
    /// Reads take no lock. Thanks to rename-based writes a reader sees either
    /// the old or the new record, never a torn one, but which is unspecified.
    #[default]
    BestEffort,
    /// Reads hold the collection lock in shared mode, so they never overlap a
    /// write or delete on the same collection.
    Strict,
}

/// Construction-time settings for a [`Store`](crate::Store).
#[derive(Clone)]
pub struct Options {
    pub logger: Arc<dyn Logger>,
    pub format: Format,
    pub consistency: Consistency,
}

impl Options {
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = consistency;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            logger: Arc::new(ConsoleLogger::default()),
            format: Format::default(),
            consistency: Consistency::default(),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("format", &self.format)
            .field("consistency", &self.consistency)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Address {
        city: String,
        pincode: u32,
    }

    #[test]
    fn test_json_encoding_is_tab_indented_with_newline() {
        let addr = Address {
            city: "jaipur".into(),
            pincode: 410063,
        };
        let bytes = Format::Json.encode(&addr).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "{\n\t\"city\": \"jaipur\",\n\t\"pincode\": 410063\n}\n"
        );
    }

    #[test]
    fn test_yaml_encoding_ends_with_single_newline() {
        let addr = Address {
            city: "udaipur".into(),
            pincode: 1,
        };
        let text = String::from_utf8(Format::Yaml.encode(&addr).unwrap()).unwrap();
        assert!(text.ends_with("pincode: 1\n"));
        assert!(!text.ends_with("\n\n"));

        let back: Address = Format::Yaml.decode(text.as_bytes()).unwrap();
        assert_eq!(back.city, "udaipur");
    }

    #[test]
    fn test_decode_wrong_shape_is_deserialize_error() {
        let err = Format::Json
            .decode::<Address>(b"{\"city\": 3}")
            .unwrap_err();
        assert!(matches!(err, ShelfError::Deserialize(CodecError::Json(_))));
    }

    #[test]
    fn test_encode_unrepresentable_value_is_serialize_error() {
        use std::collections::HashMap;
        // JSON object keys must be strings
        let mut map = HashMap::new();
        map.insert(vec![1u8], "x");
        let err = Format::Json.encode(&map).unwrap_err();
        assert!(matches!(err, ShelfError::Serialize(_)));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(Format::Json.extension(), ".json");
        assert_eq!(Format::Yaml.extension(), ".yaml");
        assert_eq!(Format::default(), Format::Json);
        assert_eq!(Format::Yaml.to_string(), "yaml");
    }

    #[test]
    fn test_options_builder() {
        let opts = Options::default()
            .with_format(Format::Yaml)
            .with_consistency(Consistency::Strict);
        assert_eq!(opts.format, Format::Yaml);
        assert_eq!(opts.consistency, Consistency::Strict);
        assert_eq!(Options::default().consistency, Consistency::BestEffort);
    }
}
