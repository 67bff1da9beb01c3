use std::borrow::Cow;

use chrono::{DateTime, Utc};

use crate::{Block, ExtractedDocument};

/// Origin label written to every document's front matter.
pub const DEFAULT_SOURCE_LABEL: &str = "legal-publications";
/// `crawled_at` layout, always in UTC.
pub const CRAWLED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fixed-key metadata block. Keys are written in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub url: String,
    pub crawled_at: String,
    pub source: String,
}

impl FrontMatter {
    pub fn to_yaml(&self) -> String {
        format!(
            "---\ntitle: {title}\nurl: {url}\ncrawled_at: {crawled_at}\nsource: {source}\n---\n",
            title = quote_yaml(&self.title),
            url = yaml_scalar(&self.url),
            crawled_at = self.crawled_at,
            source = yaml_scalar(&self.source),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub front_matter: FrontMatter,
    pub content: String,
    pub captured_at: DateTime<Utc>,
}

impl RenderedDocument {
    /// The on-disk form: front matter, one blank line, body.
    pub fn to_markdown(&self) -> String {
        format!(
            "{frontmatter}\n{body}",
            frontmatter = self.front_matter.to_yaml(),
            body = self.content
        )
    }
}

/// Pure renderer; the same document and timestamp always give the same bytes.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    source_label: String,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_LABEL)
    }
}

impl MarkdownRenderer {
    pub fn new(source_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
        }
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn render(&self, doc: &ExtractedDocument, captured_at: DateTime<Utc>) -> RenderedDocument {
        RenderedDocument {
            front_matter: FrontMatter {
                title: doc.title.clone(),
                url: doc.source_url.clone(),
                crawled_at: captured_at.format(CRAWLED_AT_FORMAT).to_string(),
                source: self.source_label.clone(),
            },
            content: render_body(&doc.body),
            captured_at,
        }
    }
}

/// Blocks to Markdown. List items sit on consecutive lines, everything else
/// is separated by a blank line.
pub fn render_body(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut previous: Option<&Block> = None;
    for block in blocks {
        if let Some(prev) = previous {
            let tight = matches!(prev, Block::ListItem(_)) && matches!(block, Block::ListItem(_));
            out.push_str(if tight { "\n" } else { "\n\n" });
        }
        match block {
            Block::Heading { level, text } => {
                let level = usize::from((*level).clamp(1, 6));
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(text);
            }
            Block::Paragraph(text) => out.push_str(&escape_block_start(text)),
            Block::ListItem(text) => {
                out.push_str("- ");
                out.push_str(&escape_block_start(text));
            }
        }
        previous = Some(block);
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Plain scalar when YAML reads it back unchanged, double-quoted otherwise.
fn yaml_scalar(value: &str) -> String {
    let plain = single_line(value);
    if needs_quotes(&plain) {
        quote_yaml(value)
    } else {
        plain
    }
}

fn needs_quotes(value: &str) -> bool {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
        '`',
    ];
    value.is_empty()
        || value.starts_with(INDICATORS)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.ends_with(':')
        || value.contains(": ")
        || value.contains(" #")
}

fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Backslash-escapes a leading marker that would turn text into a heading,
/// quote, list item or rule.
fn escape_block_start(text: &str) -> Cow<'_, str> {
    if text.starts_with(['#', '>', '-', '+', '*', '_', '=']) {
        return Cow::Owned(format!("\\{text}"));
    }
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if (1..=9).contains(&digits) {
        let rest = &text[digits..];
        if rest.starts_with(['.', ')'])
            && rest[1..].chars().next().map_or(true, char::is_whitespace)
        {
            return Cow::Owned(format!("{}\\{}", &text[..digits], rest));
        }
    }
    Cow::Borrowed(text)
}

fn quote_yaml(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
