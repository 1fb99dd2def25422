//! Feedlinks engine: decoding, feed link extraction and the single-run pipeline.
mod decode;
mod extract;
mod persist;
mod pipeline;
mod settings;

pub use decode::{decode_document, DecodeError, DecodedDocument, TextEncoding};
pub use extract::{FeedExtractor, LinkTagExtractor};
pub use persist::{AtomicFileWriter, PersistError};
pub use pipeline::{run_extraction, run_extraction_with, RunError, RunSummary};
pub use settings::{RunSettings, INPUT_FILENAME, OUTPUT_FILENAME};
