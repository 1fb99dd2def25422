use std::fs;
use std::io;
use std::path::PathBuf;

use feedlinks_logging::{feed_debug, feed_info, feed_warn};
use thiserror::Error;

use crate::decode::{decode_document, TextEncoding};
use crate::extract::{FeedExtractor, LinkTagExtractor};
use crate::persist::{AtomicFileWriter, PersistError};
use crate::settings::RunSettings;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to read {path:?}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize feeds: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub encoding: TextEncoding,
    pub lossy: bool,
    pub rss_count: usize,
    pub atom_count: usize,
    pub output_path: PathBuf,
}

/// Read the input file, extract its feed links and write them as JSON.
pub fn run_extraction(settings: &RunSettings) -> Result<RunSummary, RunError> {
    run_extraction_with(settings, &LinkTagExtractor)
}

pub fn run_extraction_with(
    settings: &RunSettings,
    extractor: &dyn FeedExtractor,
) -> Result<RunSummary, RunError> {
    let input_path = settings.input_path();
    let bytes = fs::read(&input_path).map_err(|source| RunError::ReadInput {
        path: input_path.clone(),
        source,
    })?;
    feed_debug!("Read {} bytes from {:?}", bytes.len(), input_path);

    let decoded = decode_document(&bytes);
    if decoded.lossy {
        feed_warn!(
            "{:?} is not valid in any candidate encoding; undecodable bytes were dropped",
            input_path
        );
    } else {
        feed_debug!("Decoded {:?} as {}", input_path, decoded.encoding);
    }

    let feeds = extractor.extract(&decoded.text);
    let json = feeds.to_json(settings.style)?;

    let writer = AtomicFileWriter::new(settings.working_dir.clone());
    let output_path = writer.write(&settings.output_filename, &json)?;
    feed_info!(
        "Wrote {} rss and {} atom links to {:?}",
        feeds.rss().len(),
        feeds.atom().len(),
        output_path
    );

    Ok(RunSummary {
        encoding: decoded.encoding,
        lossy: decoded.lossy,
        rss_count: feeds.rss().len(),
        atom_count: feeds.atom().len(),
        output_path,
    })
}
