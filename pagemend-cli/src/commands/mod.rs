//! CLI command implementations

pub mod fix;
pub mod serve;

pub use fix::FixArgs;
pub use serve::ServeArgs;

use std::sync::Arc;

use pagemend_core::{Config, Pipeline};
use pagemend_gemini::GeminiCompleter;
use pagemend_kb::TermIndex;

/// Assemble a pipeline from configuration.
///
/// Missing API keys are not fatal; the pipeline then runs with canned
/// fixes only.
pub(crate) fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let knowledge = match &config.knowledge.corpus_path {
        Some(path) => TermIndex::from_file(
            path,
            config.knowledge.chunk_size,
            config.knowledge.chunk_overlap,
        )
        .map_err(|e| anyhow::anyhow!("Failed to index corpus {}: {}", path.display(), e))?,
        None => TermIndex::embedded(),
    };

    let mut pipeline =
        Pipeline::new(Arc::new(knowledge)).with_top_k(config.knowledge.top_k);

    match GeminiCompleter::from_config(&config.completion) {
        Ok(completer) => {
            pipeline = pipeline.with_completer(Arc::new(completer));
        }
        Err(pagemend_gemini::Error::NoKeys) => {
            tracing::warn!("no API keys configured, falling back to canned fixes");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(pipeline)
}
