//! Strategy selection and whole-input extraction
//!
//! A [`Strategy`] picks how document boundaries are found. Either way the result
//! is a [`HeaderSource`] that yields one [`DocumentHeader`] per document, which
//! [`extract_identifiers`] drives to the end of the input.
//!
//! Extraction is all or nothing: the first error aborts the run and no
//! identifiers are returned.

pub mod config;
pub mod loader;

pub use config::{ConfigRegistry, ScanConfig, ScanMode};
pub use loader::{LoadError, StreamLoader};

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use tracing::debug;

use crate::gvk::decoding::DocumentDecoder;
use crate::gvk::error::ExtractionError;
use crate::gvk::extract::{extract, Identifier};
use crate::gvk::header::DocumentHeader;
use crate::gvk::reader::DocumentReader;

/// How document boundaries are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Scan lines for true boundaries, then decode each document on its own
    Reader,
    /// Parse the whole stream in one pass
    Decoder,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Reader, Strategy::Decoder];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Reader => "reader",
            Strategy::Decoder => "decoder",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Reader => "Boundary-aware line reader, then per-document decode",
            Strategy::Decoder => "Single-pass structural decoder",
        }
    }

    /// Header source for `text` using this strategy
    pub fn source<'a>(&self, text: &'a str) -> Box<dyn HeaderSource + 'a> {
        match self {
            Strategy::Reader => Box::new(ReaderSource::new(DocumentReader::from_text(text))),
            Strategy::Decoder => Box::new(DocumentDecoder::new(text)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown strategy '{}' (expected reader or decoder)", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Anything that yields document headers one at a time
pub trait HeaderSource {
    /// The next document's header, or `None` once the input is exhausted
    fn next_header(&mut self) -> Result<Option<DocumentHeader>, ExtractionError>;
}

impl HeaderSource for DocumentDecoder<'_> {
    fn next_header(&mut self) -> Result<Option<DocumentHeader>, ExtractionError> {
        Ok(self.decode_next()?)
    }
}

/// Reader strategy as a [`HeaderSource`]
///
/// Documents holding nothing but blank lines, comments and directives are skipped,
/// matching the decoder.
pub struct ReaderSource<R> {
    reader: DocumentReader<R>,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: DocumentReader<R>) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> HeaderSource for ReaderSource<R> {
    fn next_header(&mut self) -> Result<Option<DocumentHeader>, ExtractionError> {
        while let Some(document) = self.reader.read()? {
            if document.is_blank() {
                debug!(start_line = document.start_line(), "skipping blank document");
                continue;
            }
            return Ok(Some(document.header()?));
        }
        Ok(None)
    }
}

/// Drive `source` to the end, extracting one identifier per document
pub fn collect_identifiers(
    source: &mut dyn HeaderSource,
) -> Result<Vec<Identifier>, ExtractionError> {
    let mut identifiers = Vec::new();
    while let Some(header) = source.next_header()? {
        identifiers.push(extract(&header));
    }
    Ok(identifiers)
}

/// Extract every document's identifier with the given strategy
pub fn extract_identifiers(
    text: &str,
    strategy: Strategy,
) -> Result<Vec<Identifier>, ExtractionError> {
    let mut source = strategy.source(text);
    let identifiers = collect_identifiers(source.as_mut())?;
    debug!(
        strategy = strategy.name(),
        documents = identifiers.len(),
        "extraction finished"
    );
    Ok(identifiers)
}

/// Run both strategies and require them to agree.
///
/// When both fail the reader's error is returned; when only one fails, or both
/// succeed with different identifiers, the result is a
/// [`Disagreement`](ExtractionError::Disagreement).
pub fn cross_check(text: &str) -> Result<Vec<Identifier>, ExtractionError> {
    let by_reader = extract_identifiers(text, Strategy::Reader);
    let by_decoder = extract_identifiers(text, Strategy::Decoder);

    match (by_reader, by_decoder) {
        (Ok(reader), Ok(decoder)) if reader == decoder => Ok(reader),
        (Err(reader), Err(_)) => Err(reader),
        (reader, decoder) => Err(ExtractionError::Disagreement {
            reader: describe(&reader),
            decoder: describe(&decoder),
        }),
    }
}

fn describe(result: &Result<Vec<Identifier>, ExtractionError>) -> String {
    match result {
        Ok(identifiers) => {
            let listed: Vec<String> = identifiers.iter().map(|id| id.to_string()).collect();
            format!("[{}]", listed.join("; "))
        }
        Err(err) => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gvk::error::ParseError;
    use crate::gvk::testing::SAMPLE;

    #[test]
    fn test_strategy_names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!(
            "frame".parse::<Strategy>(),
            Err(UnknownStrategy("frame".to_string()))
        );
    }

    #[test]
    fn test_sample_with_each_strategy() {
        let expected = vec![
            Identifier::new("", "foo", "bar"),
            Identifier::new("", "test", "test"),
            Identifier::new("", "yup", "aha"),
        ];
        for strategy in Strategy::ALL {
            assert_eq!(extract_identifiers(SAMPLE, strategy).unwrap(), expected);
        }
    }

    #[test]
    fn test_cross_check_agrees_on_sample() {
        assert_eq!(cross_check(SAMPLE).unwrap().len(), 3);
    }

    #[test]
    fn test_cross_check_returns_shared_error() {
        let err = cross_check("kind: a\nvalue: \"open\n---\nkind: b\n").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Parse(ParseError::UnterminatedQuote { line: 2 })
        ));
    }

    #[test]
    fn test_reader_source_skips_blank_documents() {
        let text = "---\n# header comment\n---\nkind: A\n---\n\n";
        let mut source = ReaderSource::new(DocumentReader::from_text(text));
        assert_eq!(
            source.next_header().unwrap(),
            Some(DocumentHeader::new("", "A"))
        );
        assert!(source.next_header().unwrap().is_none());
    }

    #[test]
    fn test_errors_discard_earlier_identifiers() {
        for strategy in Strategy::ALL {
            assert!(extract_identifiers("kind: ok\n---\n- not a mapping\n", strategy).is_err());
        }
    }

    #[test]
    fn test_describe_lists_identifiers() {
        let described = describe(&Ok(vec![Identifier::new("g", "v", "k")]));
        assert_eq!(described, "[g/v, Kind=k]");
    }
}
