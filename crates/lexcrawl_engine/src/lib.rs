//! Lexcrawl engine: fetch, extract, render and persist legal documents.
mod batch;
mod boilerplate;
mod config;
mod decode;
mod extract;
mod fetch;
mod filename;
mod persist;
mod pipeline;
mod render;
mod score;
mod sink;
mod types;

pub use batch::BatchOrchestrator;
pub use boilerplate::{is_boilerplate, is_placeholder_title};
pub use config::{
    system_clock, Clock, ConfigError, EngineConfig, DEFAULT_DELAY, DEFAULT_OUTPUT_DIR,
};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use extract::{
    Block, ContentExtractor, ExtractSettings, ExtractedDocument, ExtractionError, Extractor,
    DEFAULT_LINK_PENALTY, DEFAULT_MIN_CONTENT_CHARS, DEFAULT_NEAR_EQUAL_TOLERANCE,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use filename::{document_filename, document_slug, FILENAME_TIMESTAMP_FORMAT};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{DocumentPipeline, PipelineError, SingleDocumentPipeline};
pub use render::{
    render_body, FrontMatter, MarkdownRenderer, RenderedDocument, CRAWLED_AT_FORMAT,
    DEFAULT_SOURCE_LABEL,
};
pub use score::{collect_candidates, content_score, select_root, Candidate, TextWeight};
pub use sink::{FileSink, DEFAULT_MAX_SEQUENCE};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
