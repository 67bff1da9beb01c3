use std::path::{Path, PathBuf};
use std::sync::Arc;

use lexcrawl_core::{CrawlOutcome, FailureStage};
use lexcrawl_logging::{crawl_debug, crawl_info, crawl_warn};

use crate::config::{Clock, ConfigError, EngineConfig};
use crate::decode::decode_html;
use crate::extract::{ContentExtractor, ExtractionError, Extractor};
use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::persist::PersistError;
use crate::render::MarkdownRenderer;
use crate::sink::FileSink;
use crate::FetchError;

/// First failing stage of a document run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("network: {0}")]
    Network(#[from] FetchError),
    #[error("extraction: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("write: {0}")]
    Write(#[from] PersistError),
}

impl PipelineError {
    pub fn stage(&self) -> FailureStage {
        match self {
            PipelineError::Network(_) => FailureStage::Network,
            PipelineError::Extraction(_) => FailureStage::Extraction,
            PipelineError::Write(_) => FailureStage::Write,
        }
    }

    /// The failure without the stage prefix.
    pub fn reason(&self) -> String {
        match self {
            PipelineError::Network(err) => err.to_string(),
            PipelineError::Extraction(err) => err.to_string(),
            PipelineError::Write(err) => err.to_string(),
        }
    }
}

/// One URL in, one outcome out. Implementations never panic on bad input.
#[async_trait::async_trait]
pub trait DocumentPipeline: Send + Sync {
    async fn process(&self, url: &str, output_dir: &Path) -> CrawlOutcome;
}

/// fetch → decode/extract → render → write, short-circuiting on the first error.
pub struct SingleDocumentPipeline {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    renderer: MarkdownRenderer,
    sink: FileSink,
    clock: Clock,
}

impl SingleDocumentPipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        renderer: MarkdownRenderer,
        sink: FileSink,
        clock: Clock,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            renderer,
            sink,
            clock,
        }
    }

    /// Pipeline over the real HTTP client, configured from `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fetcher = ReqwestFetcher::new(config.fetch.clone())?;
        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(ContentExtractor::new(config.extract)),
            MarkdownRenderer::new(config.source_label.clone()),
            FileSink::new(),
            config.clock.clone(),
        ))
    }

    /// Single-document entry point: the written path, or the typed failure.
    pub async fn run(&self, url: &str, output_dir: &Path) -> Result<PathBuf, PipelineError> {
        let fetched = self.fetcher.fetch(url).await?;
        crawl_debug!(
            "Fetched {} ({} bytes, {} attempt(s), content-type {:?})",
            fetched.metadata.final_url,
            fetched.metadata.byte_len,
            fetched.metadata.attempts,
            fetched.metadata.content_type
        );

        let decoded = decode_html(&fetched.bytes, fetched.metadata.content_type.as_deref())
            .map_err(ExtractionError::from)?;
        let doc = self.extractor.extract(&decoded.html, url)?;
        crawl_debug!(
            "Extracted {} block(s) from {} (encoding {}), title {:?}",
            doc.body.len(),
            url,
            decoded.encoding_label,
            doc.title
        );

        let rendered = self.renderer.render(&doc, (self.clock)());
        let path = self.sink.write(&rendered, output_dir)?;
        crawl_debug!("Wrote {:?}", path);
        Ok(path)
    }
}

#[async_trait::async_trait]
impl DocumentPipeline for SingleDocumentPipeline {
    async fn process(&self, url: &str, output_dir: &Path) -> CrawlOutcome {
        match self.run(url, output_dir).await {
            Ok(path) => {
                crawl_info!("Saved {} -> {:?}", url, path);
                CrawlOutcome::success(url, path)
            }
            Err(err) => {
                crawl_warn!("Failed {} at {} stage: {}", url, err.stage(), err.reason());
                CrawlOutcome::failure(url, err.stage(), err.reason())
            }
        }
    }
}
