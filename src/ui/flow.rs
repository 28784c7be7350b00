//! Flow the displayed part of a [`Dom`] into wrapped terminal lines.
//!
//! Block elements start new lines, inline text is whitespace-collapsed and
//! word-wrapped to the content width, `pre` keeps its line breaks. Elements
//! with `display: none` (and everything under them) are skipped, so the flow
//! always reflects the controller's current visibility state.

use std::collections::HashMap;

use unicode_width::UnicodeWidthStr;

use crate::dom::{Dom, NodeId, NodeKind};
use crate::highlight::HIGHLIGHT_CLASS;

const SKIPPED_TAGS: &[&str] = &[
    "head", "script", "style", "title", "meta", "link", "input", "nav", "button", "textarea",
    "template",
];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "div", "dl", "dt",
    "fieldset", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "html", "li", "main", "ol", "p", "pre", "section", "summary", "table", "tr", "ul",
];

/// How a run of text should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Heading(u8),
    Strong,
    Emphasis,
    Code,
    Link,
    /// A search-match marker.
    Highlight,
    /// List bullets and rules.
    Decoration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSpan {
    pub text: String,
    pub kind: SpanKind,
    /// The in-page `<a href="#...">` this text belongs to.
    pub link: Option<NodeId>,
}

/// An in-page link and the first line it appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowLink {
    pub line: usize,
    pub anchor: NodeId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowLine {
    pub indent: u16,
    /// Inside an element carrying an inline border (an emphasized method).
    pub framed: bool,
    pub spans: Vec<FlowSpan>,
}

impl FlowLine {
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|span| span.text.trim().is_empty())
    }
}

/// The flowed document, where each block or `id`-carrying element starts,
/// and the in-page links it shows.
#[derive(Debug, Clone, Default)]
pub struct FlowDocument {
    lines: Vec<FlowLine>,
    anchors: HashMap<NodeId, usize>,
    links: Vec<FlowLink>,
}

impl FlowDocument {
    /// Flow the subtree under `root` at `width` columns.
    pub fn build(dom: &Dom, root: NodeId, width: u16) -> Self {
        let mut builder = Builder {
            dom,
            width: usize::from(width).max(12),
            lines: Vec::new(),
            anchors: HashMap::new(),
            run: Vec::new(),
            run_ctx: None,
            pending_prefix: None,
        };
        let ctx = Ctx {
            indent: 0,
            framed: false,
            kind: SpanKind::Plain,
            pre: false,
            link: None,
        };
        builder.walk(root, ctx);
        builder.flush();
        while builder.lines.last().is_some_and(FlowLine::is_blank) {
            builder.lines.pop();
        }
        let links = collect_links(&builder.lines);
        Self {
            lines: builder.lines,
            anchors: builder.anchors,
            links,
        }
    }

    pub fn lines(&self) -> &[FlowLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// First line of a block element or an element with an `id`, if it
    /// produced any output position.
    pub fn line_of(&self, node: NodeId) -> Option<usize> {
        self.anchors.get(&node).copied()
    }

    /// In-page links in document order, one entry per link element.
    pub fn links(&self) -> &[FlowLink] {
        &self.links
    }

    /// The whole flow as plain text, one line per row.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                format!(
                    "{}{}",
                    " ".repeat(usize::from(line.indent)),
                    line.text().trim_end()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy)]
struct Ctx {
    indent: u16,
    framed: bool,
    kind: SpanKind,
    pre: bool,
    link: Option<NodeId>,
}

struct Builder<'a> {
    dom: &'a Dom,
    width: usize,
    lines: Vec<FlowLine>,
    anchors: HashMap<NodeId, usize>,
    run: Vec<FlowSpan>,
    run_ctx: Option<Ctx>,
    pending_prefix: Option<&'static str>,
}

impl Builder<'_> {
    fn walk(&mut self, node: NodeId, ctx: Ctx) {
        let dom = self.dom;
        match dom.kind(node) {
            NodeKind::Text(text) => self.push_text(text, ctx),
            NodeKind::Document => {
                for &child in dom.children(node) {
                    self.walk(child, ctx);
                }
            }
            NodeKind::Element(element) => {
                let tag = element.tag();
                if SKIPPED_TAGS.contains(&tag) || element.style("display") == Some("none") {
                    return;
                }
                let block = BLOCK_TAGS.contains(&tag);
                let child_ctx = self.child_ctx(node, tag, ctx);

                if tag == "br" {
                    self.flush();
                    return;
                }
                if block {
                    self.flush();
                    if matches!(tag, "h1" | "h2" | "h3")
                        && self.lines.last().is_some_and(|line| !line.is_blank())
                    {
                        self.lines.push(FlowLine::default());
                    }
                    self.anchors.insert(node, self.lines.len());
                } else if element.id().is_some() {
                    self.anchors.entry(node).or_insert(self.lines.len());
                }
                if tag == "hr" {
                    self.lines.push(FlowLine {
                        indent: ctx.indent,
                        framed: ctx.framed,
                        spans: vec![FlowSpan {
                            text: "\u{2500}".repeat(self.width.saturating_sub(usize::from(ctx.indent))),
                            kind: SpanKind::Decoration,
                            link: None,
                        }],
                    });
                    return;
                }
                if tag == "li" {
                    self.pending_prefix = Some("\u{2022} ");
                }

                for &child in dom.children(node) {
                    self.walk(child, child_ctx);
                }

                if block {
                    self.flush();
                }
            }
        }
    }

    fn child_ctx(&self, node: NodeId, tag: &str, ctx: Ctx) -> Ctx {
        let mut next = ctx;
        if self.dom.style(node, "border").is_some() {
            next.framed = true;
        }
        match tag {
            "ul" | "ol" | "blockquote" | "dd" => next.indent += 2,
            "pre" => next.pre = true,
            "a" if self
                .dom
                .attr(node, "href")
                .is_some_and(|href| href.len() > 1 && href.starts_with('#')) =>
            {
                next.link = Some(node);
            }
            _ => {}
        }
        if ctx.kind == SpanKind::Highlight {
            return next;
        }
        next.kind = if self.dom.has_class(node, HIGHLIGHT_CLASS) {
            SpanKind::Highlight
        } else {
            match tag {
                "h1" => SpanKind::Heading(1),
                "h2" => SpanKind::Heading(2),
                "h3" => SpanKind::Heading(3),
                "h4" => SpanKind::Heading(4),
                "h5" => SpanKind::Heading(5),
                "h6" => SpanKind::Heading(6),
                "strong" | "b" | "th" => SpanKind::Strong,
                "em" | "i" => SpanKind::Emphasis,
                "code" | "kbd" | "samp" | "pre" => SpanKind::Code,
                "a" => SpanKind::Link,
                _ => ctx.kind,
            }
        };
        next
    }

    fn push_span(&mut self, text: String, ctx: Ctx) {
        if self.run_ctx.is_none() {
            self.run_ctx = Some(ctx);
        }
        self.run.push(FlowSpan {
            text,
            kind: ctx.kind,
            link: ctx.link,
        });
    }

    fn push_text(&mut self, text: &str, ctx: Ctx) {
        if ctx.pre {
            let mut segments = text.split('\n').peekable();
            while let Some(segment) = segments.next() {
                if !segment.is_empty() {
                    self.push_span(segment.replace('\t', "    "), ctx);
                }
                if segments.peek().is_some() {
                    self.flush_preformatted(ctx);
                }
            }
            return;
        }

        let mut collapsed = String::with_capacity(text.len());
        let mut last_space = self
            .run
            .last()
            .is_none_or(|span| span.text.ends_with(' '));
        for ch in text.chars() {
            if ch.is_whitespace() && ch != '\u{a0}' {
                if !last_space {
                    collapsed.push(' ');
                    last_space = true;
                }
            } else {
                collapsed.push(ch);
                last_space = false;
            }
        }
        if !collapsed.is_empty() {
            self.push_span(collapsed, ctx);
        }
    }

    fn flush_preformatted(&mut self, ctx: Ctx) {
        let spans = std::mem::take(&mut self.run);
        self.lines.push(FlowLine {
            indent: ctx.indent,
            framed: ctx.framed,
            spans,
        });
    }

    /// Wrap the pending inline run into lines.
    fn flush(&mut self) {
        let run = std::mem::take(&mut self.run);
        let Some(ctx) = self.run_ctx.take() else {
            return;
        };
        if run.iter().all(|span| span.text.trim().is_empty()) {
            return;
        }
        if ctx.pre {
            self.lines.push(FlowLine {
                indent: ctx.indent,
                framed: ctx.framed,
                spans: run,
            });
            return;
        }

        let prefix = self.pending_prefix.take();
        let prefix_width = prefix.map_or(0, UnicodeWidthStr::width);
        let available = self
            .width
            .saturating_sub(usize::from(ctx.indent) + prefix_width)
            .max(8);

        let mut current = FlowLine {
            indent: ctx.indent,
            framed: ctx.framed,
            spans: prefix
                .map(|text| FlowSpan {
                    text: text.to_string(),
                    kind: SpanKind::Decoration,
                    link: None,
                })
                .into_iter()
                .collect(),
        };
        let mut used = 0usize;
        let continuation_indent = ctx.indent + u16::try_from(prefix_width).unwrap_or(0);

        for word in split_words(&run) {
            let word_width: usize = word.iter().map(|span| span.text.width()).sum();
            let is_space = word.len() == 1 && word[0].text == " ";
            if is_space {
                if used > 0 && used < available {
                    push_span(&mut current.spans, " ", word[0].kind, word[0].link);
                    used += 1;
                }
                continue;
            }
            if used > 0 && used + word_width > available {
                trim_trailing_space(&mut current.spans);
                self.lines.push(std::mem::replace(
                    &mut current,
                    FlowLine {
                        indent: continuation_indent,
                        framed: ctx.framed,
                        spans: Vec::new(),
                    },
                ));
                used = 0;
            }
            for piece in word {
                push_span(&mut current.spans, &piece.text, piece.kind, piece.link);
            }
            used += word_width;
        }
        trim_trailing_space(&mut current.spans);
        if !current.is_blank() {
            self.lines.push(current);
        }
    }
}

/// Group spans into words (runs without spaces) and single-space separators.
fn split_words(run: &[FlowSpan]) -> Vec<Vec<FlowSpan>> {
    let mut words: Vec<Vec<FlowSpan>> = Vec::new();
    let mut current: Vec<FlowSpan> = Vec::new();
    for span in run {
        let mut parts = span.text.split(' ').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                current.push(FlowSpan {
                    text: part.to_string(),
                    kind: span.kind,
                    link: span.link,
                });
            }
            if parts.peek().is_some() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                words.push(vec![FlowSpan {
                    text: " ".to_string(),
                    kind: span.kind,
                    link: span.link,
                }]);
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn push_span(spans: &mut Vec<FlowSpan>, text: &str, kind: SpanKind, link: Option<NodeId>) {
    if let Some(last) = spans.last_mut()
        && last.kind == kind
        && last.link == link
    {
        last.text.push_str(text);
        return;
    }
    spans.push(FlowSpan {
        text: text.to_string(),
        kind,
        link,
    });
}

fn collect_links(lines: &[FlowLine]) -> Vec<FlowLink> {
    let mut links: Vec<FlowLink> = Vec::new();
    for (line, flow_line) in lines.iter().enumerate() {
        for anchor in flow_line.spans.iter().filter_map(|span| span.link) {
            if !links.iter().any(|link| link.anchor == anchor) {
                links.push(FlowLink { line, anchor });
            }
        }
    }
    links
}

fn trim_trailing_space(spans: &mut Vec<FlowSpan>) {
    while let Some(last) = spans.last_mut() {
        let trimmed_len = last.text.trim_end_matches(' ').len();
        if trimmed_len == 0 {
            spans.pop();
            continue;
        }
        last.text.truncate(trimmed_len);
        break;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn flow(html: &str, width: u16) -> FlowDocument {
        let dom = parse_html(html).unwrap();
        FlowDocument::build(&dom, dom.root(), width)
    }

    #[test]
    fn test_blocks_start_new_lines_and_whitespace_collapses() {
        let doc = flow("<div>  one\n   two </div><p>three</p>", 80);
        let text: Vec<String> = doc.lines().iter().map(FlowLine::text).collect();
        assert_eq!(text, ["one two", "three"]);
    }

    #[test]
    fn test_hidden_elements_are_skipped() {
        let doc = flow(
            r#"<section style="display:none"><p>secret</p></section><p>shown</p>"#,
            80,
        );
        assert_eq!(doc.plain_text(), "shown");
    }

    #[test]
    fn test_long_text_wraps_at_width() {
        let doc = flow("<p>alpha beta gamma delta epsilon</p>", 16);
        for line in doc.lines() {
            assert!(line.text().width() <= 16, "{:?}", line.text());
        }
        assert!(doc.line_count() > 1);
        assert_eq!(
            doc.plain_text().split_whitespace().collect::<Vec<_>>(),
            ["alpha", "beta", "gamma", "delta", "epsilon"]
        );
    }

    #[test]
    fn test_highlight_spans_keep_their_kind_inside_words() {
        let doc = flow(
            r#"<h3>get_<span class="highlight">video</span>_info</h3>"#,
            80,
        );
        let spans = &doc.lines()[0].spans;
        assert_eq!(doc.lines()[0].text(), "get_video_info");
        assert!(spans
            .iter()
            .any(|span| span.kind == SpanKind::Highlight && span.text == "video"));
    }

    #[test]
    fn test_list_items_get_bullets_and_indent() {
        let doc = flow("<ul><li>first</li><li>second</li></ul>", 80);
        assert_eq!(doc.lines()[0].text(), "\u{2022} first");
        assert_eq!(doc.lines()[0].indent, 2);
        assert_eq!(doc.lines()[1].text(), "\u{2022} second");
    }

    #[test]
    fn test_anchor_points_at_block_start() {
        let dom = parse_html(r#"<p>intro</p><section id="s"><h2>Title</h2></section>"#).unwrap();
        let doc = FlowDocument::build(&dom, dom.root(), 80);
        let section = dom.by_id("s").unwrap();
        let line = doc.line_of(section).unwrap();
        let first_text = doc.lines()[line..]
            .iter()
            .find(|l| !l.is_blank())
            .map(FlowLine::text);
        assert_eq!(first_text.as_deref(), Some("Title"));
    }

    #[test]
    fn test_inline_elements_with_id_are_anchors() {
        let dom = parse_html(r#"<p>one</p><p>two <span id="mark">here</span></p>"#).unwrap();
        let doc = FlowDocument::build(&dom, dom.root(), 80);
        let mark = dom.by_id("mark").unwrap();
        assert_eq!(doc.line_of(mark), Some(1));
    }

    #[test]
    fn test_in_page_links_are_collected_once_each() {
        let dom = parse_html(
            r##"<p>see <a href="#usage">the usage notes</a> and <a href="https://example.com">docs</a></p>
            <p>or <a href="#">top</a> then <a href="#quota">quota</a></p>"##,
        )
        .unwrap();
        let doc = FlowDocument::build(&dom, dom.root(), 12);

        let anchors: Vec<Option<&str>> = doc
            .links()
            .iter()
            .map(|link| dom.attr(link.anchor, "href"))
            .collect();
        assert_eq!(anchors, [Some("#usage"), Some("#quota")]);
        assert_eq!(doc.links()[0].line, 0);

        let usage = doc.links()[0].anchor;
        let text: String = doc
            .lines()
            .iter()
            .flat_map(|line| &line.spans)
            .filter(|span| span.link == Some(usage))
            .map(|span| span.text.as_str())
            .collect();
        assert_eq!(text.split_whitespace().collect::<Vec<_>>(), ["the", "usage", "notes"]);
    }

    #[test]
    fn test_bordered_elements_are_framed() {
        let doc = flow(
            r#"<div style="border: 2px solid #ff0000"><p>hit</p></div><p>miss</p>"#,
            80,
        );
        assert!(doc.lines()[0].framed);
        assert!(!doc.lines()[1].framed);
    }

    #[test]
    fn test_pre_keeps_line_breaks() {
        let doc = flow("<pre>a  b\nc</pre>", 80);
        let text: Vec<String> = doc.lines().iter().map(FlowLine::text).collect();
        assert_eq!(text, ["a  b", "c"]);
    }
}
