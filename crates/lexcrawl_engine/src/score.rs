//! Content scoring: ranks container elements by how much visible text they hold.

use std::ops::AddAssign;

use ego_tree::{NodeId, NodeRef};
use scraper::node::{Element, Node};
use scraper::Html;

use crate::boilerplate::is_boilerplate;

const CANDIDATE_TAGS: &[&str] = &[
    "body", "main", "article", "section", "div", "td", "blockquote",
];

/// Visible text inside a subtree, boilerplate excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextWeight {
    /// Non-whitespace characters.
    pub text_chars: usize,
    /// The part of `text_chars` that sits inside `<a>` elements.
    pub link_chars: usize,
}

impl AddAssign for TextWeight {
    fn add_assign(&mut self, rhs: Self) {
        self.text_chars += rhs.text_chars;
        self.link_chars += rhs.link_chars;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub node: NodeId,
    pub depth: usize,
    /// Pre-order position; lower means earlier in the document.
    pub order: usize,
    pub weight: TextWeight,
    pub score: f64,
}

/// Text length minus a penalty for link text, so link farms rank below prose.
pub fn content_score(weight: TextWeight, link_penalty: f64) -> f64 {
    weight.text_chars as f64 - link_penalty * weight.link_chars as f64
}

/// Score every container element of the document in one pass.
pub fn collect_candidates(doc: &Html, link_penalty: f64) -> Vec<Candidate> {
    let mut collector = Collector {
        candidates: Vec::new(),
        next_order: 0,
        link_penalty,
    };
    collector.measure(doc.tree.root(), 0, false);
    collector.candidates
}

/// Pick the highest-scoring candidate, preferring the deepest one among those
/// within `tolerance` (a fraction of the best score) of it.
pub fn select_root(candidates: &[Candidate], tolerance: f64) -> Option<&Candidate> {
    let best = candidates
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score).then(b.order.cmp(&a.order)))?;
    if best.score <= 0.0 {
        return Some(best);
    }
    let floor = best.score * (1.0 - tolerance.clamp(0.0, 1.0));
    candidates
        .iter()
        .filter(|c| c.score >= floor)
        .max_by(|a, b| a.depth.cmp(&b.depth).then(b.order.cmp(&a.order)))
}

struct Collector {
    candidates: Vec<Candidate>,
    next_order: usize,
    link_penalty: f64,
}

impl Collector {
    fn measure(&mut self, node: NodeRef<'_, Node>, depth: usize, in_link: bool) -> TextWeight {
        match node.value() {
            Node::Text(text) => {
                let chars = text.chars().filter(|c| !c.is_whitespace()).count();
                TextWeight {
                    text_chars: chars,
                    link_chars: if in_link { chars } else { 0 },
                }
            }
            Node::Element(element) => {
                if is_boilerplate(element) {
                    return TextWeight::default();
                }
                let order = self.next_order;
                self.next_order += 1;
                let in_link = in_link || element.name().eq_ignore_ascii_case("a");
                let mut weight = TextWeight::default();
                for child in node.children() {
                    weight += self.measure(child, depth + 1, in_link);
                }
                if is_candidate(element) {
                    self.candidates.push(Candidate {
                        node: node.id(),
                        depth,
                        order,
                        weight,
                        score: content_score(weight, self.link_penalty),
                    });
                }
                weight
            }
            Node::Document | Node::Fragment => {
                let mut weight = TextWeight::default();
                for child in node.children() {
                    weight += self.measure(child, depth, in_link);
                }
                weight
            }
            _ => TextWeight::default(),
        }
    }
}

fn is_candidate(element: &Element) -> bool {
    let tag = element.name();
    CANDIDATE_TAGS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(tag))
        || element
            .attr("role")
            .is_some_and(|role| role.trim().eq_ignore_ascii_case("main"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::ElementRef;

    fn tag_of(doc: &Html, candidate: &Candidate) -> String {
        let node = doc.tree.get(candidate.node).unwrap();
        ElementRef::wrap(node).unwrap().value().name().to_string()
    }

    fn pick(html: &str) -> String {
        let doc = Html::parse_document(html);
        let candidates = collect_candidates(&doc, 0.5);
        let root = select_root(&candidates, 0.05).unwrap();
        tag_of(&doc, root)
    }

    #[test]
    fn score_penalizes_link_text() {
        let plain = TextWeight {
            text_chars: 100,
            link_chars: 0,
        };
        let linky = TextWeight {
            text_chars: 100,
            link_chars: 80,
        };
        assert_eq!(content_score(plain, 0.5), 100.0);
        assert_eq!(content_score(linky, 0.5), 60.0);
    }

    #[test]
    fn boilerplate_text_does_not_count() {
        let doc = Html::parse_document(
            "<body><nav>Home About Contact</nav><article><p>Judgment text</p></article></body>",
        );
        let candidates = collect_candidates(&doc, 0.5);
        let body = candidates.iter().find(|c| tag_of(&doc, c) == "body").unwrap();
        assert_eq!(body.weight.text_chars, "Judgmenttext".len());
    }

    #[test]
    fn deeper_container_wins_a_tie_with_its_wrapper() {
        assert_eq!(
            pick("<body><div id=\"wrap\"><article><p>Only text here</p></article></div></body>"),
            "article"
        );
    }

    #[test]
    fn wrapper_wins_when_it_holds_clearly_more_text() {
        let html = "<body>\
            <div class=\"doc\"><p>First half of the ruling, long enough to matter.</p></div>\
            <div class=\"doc\"><p>Second half of the ruling, long enough to matter.</p></div>\
            </body>";
        assert_eq!(pick(html), "body");
    }

    #[test]
    fn link_heavy_block_loses_to_prose() {
        let html = "<body>\
            <div><a href=\"/1\">Link one two three four five six</a><a href=\"/2\">Link seven eight nine ten</a></div>\
            <div><p>The court held that the contract was void for lack of form.</p></div>\
            </body>";
        let doc = Html::parse_document(html);
        let candidates = collect_candidates(&doc, 0.5);
        let divs: Vec<_> = candidates
            .iter()
            .filter(|c| tag_of(&doc, c) == "div")
            .collect();
        assert_eq!(divs.len(), 2);
        assert!(divs[1].score > divs[0].score);
    }

    #[test]
    fn empty_candidate_list_selects_nothing() {
        assert!(select_root(&[], 0.05).is_none());
    }
}
