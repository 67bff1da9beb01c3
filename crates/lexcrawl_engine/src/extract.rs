use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{Html, Selector};

use crate::boilerplate::{is_boilerplate, is_placeholder_title};
use crate::decode::DecodeError;
use crate::score::{collect_candidates, select_root};

/// Minimum visible characters (whitespace excluded) in the selected region.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 5;
/// Candidates scoring within this fraction of the best count as a tie.
pub const DEFAULT_NEAR_EQUAL_TOLERANCE: f64 = 0.05;
/// Weight subtracted per character of link text.
pub const DEFAULT_LINK_PENALTY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractSettings {
    pub min_content_chars: usize,
    pub near_equal_tolerance: f64,
    pub link_penalty: f64,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            near_equal_tolerance: DEFAULT_NEAR_EQUAL_TOLERANCE,
            link_penalty: DEFAULT_LINK_PENALTY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    ListItem(String),
}

impl Block {
    pub fn text(&self) -> &str {
        match self {
            Block::Heading { text, .. } => text,
            Block::Paragraph(text) | Block::ListItem(text) => text,
        }
    }
}

/// Main content of a page as ordered blocks. Never holds navigation,
/// script or style text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub title: String,
    pub body: Vec<Block>,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("no main content region found")]
    NoContentRegion,
    #[error("main content too short: {chars} visible chars, need at least {min}")]
    BelowThreshold { chars: usize, min: usize },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str, source_url: &str) -> Result<ExtractedDocument, ExtractionError>;
}

/// Greedy largest-text-block extractor.
///
/// - drops boilerplate subtrees (navigation, chrome, scripts, ads, hidden nodes)
/// - scores the remaining containers by visible text and picks the heaviest,
///   preferring the most specific container on a near tie
/// - flattens the chosen region into headings, paragraphs and list items.
#[derive(Debug, Default, Clone)]
pub struct ContentExtractor {
    settings: ExtractSettings,
}

impl ContentExtractor {
    pub fn new(settings: ExtractSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExtractSettings {
        &self.settings
    }
}

impl Extractor for ContentExtractor {
    fn extract(&self, html: &str, source_url: &str) -> Result<ExtractedDocument, ExtractionError> {
        let doc = Html::parse_document(html);
        let candidates = collect_candidates(&doc, self.settings.link_penalty);
        let root = select_root(&candidates, self.settings.near_equal_tolerance)
            .ok_or(ExtractionError::NoContentRegion)?;

        if root.weight.text_chars < self.settings.min_content_chars {
            return Err(ExtractionError::BelowThreshold {
                chars: root.weight.text_chars,
                min: self.settings.min_content_chars,
            });
        }

        let node = doc
            .tree
            .get(root.node)
            .ok_or(ExtractionError::NoContentRegion)?;
        let mut builder = BlockBuilder::default();
        builder.visit_node(node);
        let body = builder.finish();
        if body.is_empty() {
            return Err(ExtractionError::NoContentRegion);
        }

        let title = page_title(&doc)
            .or_else(|| {
                body.iter().find_map(|block| match block {
                    Block::Heading { text, .. } => Some(text.clone()),
                    _ => None,
                })
            })
            .unwrap_or_default();

        Ok(ExtractedDocument {
            title,
            body,
            source_url: source_url.to_string(),
        })
    }
}

fn page_title(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    doc.select(&selector)
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .filter(|t| !is_placeholder_title(t))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum Leaf {
    Heading(u8),
    ListItem,
}

/// Walks the content root and emits one block per heading, list item or
/// run of inline text between block boundaries.
#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    buffer: String,
    leaves: Vec<Leaf>,
}

impl BlockBuilder {
    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }

    fn visit_node(&mut self, node: NodeRef<'_, Node>) {
        match node.value() {
            Node::Text(text) => self.append_text(text),
            Node::Element(element) => {
                if is_boilerplate(element) {
                    return;
                }
                let tag = element.name().to_ascii_lowercase();
                self.visit_element(node, &tag);
            }
            Node::Document | Node::Fragment => self.visit_children(node),
            _ => {}
        }
    }

    fn visit_element(&mut self, node: NodeRef<'_, Node>, tag: &str) {
        if let Some(level) = heading_level(tag) {
            self.open(Leaf::Heading(level));
            self.visit_children(node);
            self.close();
            return;
        }
        match tag {
            "li" => {
                self.open(Leaf::ListItem);
                self.visit_children(node);
                self.close();
            }
            "br" | "hr" => self.boundary(),
            "p" | "div" | "section" | "article" | "main" | "blockquote" | "pre" | "table"
            | "thead" | "tbody" | "tfoot" | "tr" | "td" | "th" | "caption" | "ul" | "ol"
            | "dl" | "dt" | "dd" | "figure" | "figcaption" | "address" | "center"
            | "details" | "summary" => {
                self.boundary();
                self.visit_children(node);
                self.boundary();
            }
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: NodeRef<'_, Node>) {
        for child in node.children() {
            self.visit_node(child);
        }
    }

    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                self.push_space();
            } else {
                self.buffer.push(ch);
            }
        }
    }

    fn push_space(&mut self) {
        if !self.buffer.is_empty() && !self.buffer.ends_with(' ') {
            self.buffer.push(' ');
        }
    }

    /// Paragraph break at top level; a plain space inside a heading or list item.
    fn boundary(&mut self) {
        if self.leaves.is_empty() {
            self.flush();
        } else {
            self.push_space();
        }
    }

    fn open(&mut self, leaf: Leaf) {
        self.flush();
        self.leaves.push(leaf);
    }

    fn close(&mut self) {
        self.flush();
        self.leaves.pop();
    }

    fn flush(&mut self) {
        let text = self.buffer.trim();
        if !text.is_empty() {
            let text = text.to_string();
            let block = match self.leaves.last() {
                Some(Leaf::Heading(level)) => Block::Heading {
                    level: *level,
                    text,
                },
                Some(Leaf::ListItem) => Block::ListItem(text),
                None => Block::Paragraph(text),
            };
            self.blocks.push(block);
        }
        self.buffer.clear();
    }
}
