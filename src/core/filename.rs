use regex::Regex;
use std::sync::LazyLock;

use super::config::FilenamePattern;
use super::error::FolioError;
use super::types::{ArchiveKey, DecodedName};

/// Decodes archive names of the form
/// `<PREFIX><LETTER><DDD>-<NUMBER><IDENTITY{11}>.<EXT>`.
///
/// The number takes every digit before the trailing 11 identity digits.
/// Names that do not match are classified as unparseable, never rejected
/// with an error.
#[derive(Debug, Clone)]
pub struct FilenameDecoder {
    regex: Regex,
}

static DEFAULT_DECODER: LazyLock<FilenameDecoder> = LazyLock::new(|| {
    FilenameDecoder::new(&FilenamePattern::default()).expect("default filename pattern compiles")
});

impl FilenameDecoder {
    /// Build a decoder for the given prefix and extension.
    pub fn new(pattern: &FilenamePattern) -> Result<Self, FolioError> {
        let expr = format!(
            r"(?i)^{}([A-Z][0-9]{{3}})-([0-9]+)([0-9]{{11}})\.{}$",
            regex::escape(&pattern.prefix),
            regex::escape(&pattern.extension)
        );
        let regex = Regex::new(&expr)
            .map_err(|e| FolioError::Config(format!("invalid filename pattern: {e}")))?;
        Ok(Self { regex })
    }

    /// Decode one archive name.
    pub fn decode(&self, name: &str) -> DecodedName {
        let Some(caps) = self.regex.captures(name) else {
            return DecodedName::Unparseable(name.to_string());
        };
        // More digits than fit in u64 is not a number we can place in a range.
        let Ok(number) = caps[2].parse::<u64>() else {
            return DecodedName::Unparseable(name.to_string());
        };
        DecodedName::Parsed(ArchiveKey {
            series: caps[1].to_ascii_uppercase(),
            number,
            identity: caps[3].to_string(),
            source_name: name.to_string(),
        })
    }

    /// Decode every name, keeping input order.
    pub fn decode_all<S: AsRef<str>>(&self, names: &[S]) -> Vec<DecodedName> {
        names.iter().map(|n| self.decode(n.as_ref())).collect()
    }
}

/// Decode an archive name with the default `FACTURA…zip` pattern.
pub fn decode_archive_name(name: &str) -> DecodedName {
    DEFAULT_DECODER.decode(name)
}
