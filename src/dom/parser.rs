//! Tolerant HTML parser.
//!
//! Handles the subset of HTML a static documentation page uses: elements,
//! attributes (quoted, unquoted, bare), comments, doctype declarations,
//! raw-text elements (`script`, `style`, `textarea`, `title`), void elements
//! and character references. Unknown end tags are ignored; unclosed elements
//! are closed at end of input. A stray `<` that does not start a tag is text.

use thiserror::Error;

use super::{Dom, NodeId};

/// Errors produced while parsing a page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unclosed comment starting at byte {0}")]
    UnclosedComment(usize),
    #[error("unclosed tag starting at byte {0}")]
    UnclosedTag(usize),
    #[error("unclosed quoted attribute value in tag at byte {0}")]
    UnclosedAttribute(usize),
    #[error("missing </{tag}> for raw text element at byte {at}")]
    UnclosedRawText { tag: String, at: usize },
}

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "title"];

/// Parse a full page into a [`Dom`].
///
/// # Errors
///
/// Returns a [`ParseError`] for unterminated comments, tags, quoted
/// attribute values or raw-text elements.
pub fn parse_html(html: &str) -> Result<Dom, ParseError> {
    let mut dom = Dom::new();
    let mut stack: Vec<NodeId> = vec![dom.root()];
    let bytes = html.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'<' {
                i += 1;
            }
            push_text(&mut dom, &stack, &html[start..i]);
            continue;
        }

        if html[i..].starts_with("<!--") {
            let end = html[i + 4..]
                .find("-->")
                .ok_or(ParseError::UnclosedComment(i))?;
            i = i + 4 + end + 3;
            continue;
        }

        if html[i..].starts_with("<!") || html[i..].starts_with("<?") {
            let end = html[i..].find('>').ok_or(ParseError::UnclosedTag(i))?;
            i += end + 1;
            continue;
        }

        if html[i..].starts_with("</") {
            let (tag, next) = parse_end_tag(html, i)?;
            i = next;
            close_element(&dom, &mut stack, &tag);
            continue;
        }

        if !bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic) {
            // Not a tag, keep the '<' as text.
            push_text(&mut dom, &stack, "<");
            i += 1;
            continue;
        }

        let start = parse_start_tag(html, i)?;
        i = start.next;
        let tag = start.tag;

        // Implicitly close an open <li> or <p> when a sibling of the same kind starts.
        if matches!(tag.as_str(), "li" | "p")
            && stack
                .last()
                .is_some_and(|top| dom.tag_name(*top) == Some(tag.as_str()))
        {
            stack.pop();
        }

        let parent = stack.last().copied().unwrap_or_else(|| dom.root());
        let node = dom.create_element(&tag);
        for (name, value) in &start.attrs {
            dom.set_attr(node, name, value);
        }
        dom.append_child(parent, node);

        if RAW_TEXT_TAGS.contains(&tag.as_str()) && !start.self_closing {
            let close = find_end_tag(html, i, &tag).ok_or_else(|| ParseError::UnclosedRawText {
                tag: tag.clone(),
                at: i,
            })?;
            let body = &html[i..close];
            if !body.is_empty() {
                let text = if tag == "script" || tag == "style" {
                    body.to_string()
                } else {
                    decode_character_references(body)
                };
                let text = dom.create_text(text);
                dom.append_child(node, text);
            }
            if tag == "textarea" {
                let value = dom.text_content(node);
                dom.set_value(node, &value);
            }
            let (_, next) = parse_end_tag(html, close)?;
            i = next;
            continue;
        }

        if !start.self_closing && !VOID_TAGS.contains(&tag.as_str()) {
            stack.push(node);
        }
    }

    Ok(dom)
}

fn push_text(dom: &mut Dom, stack: &[NodeId], raw: &str) {
    if raw.is_empty() {
        return;
    }
    let parent = stack.last().copied().unwrap_or_else(|| dom.root());
    let text = dom.create_text(decode_character_references(raw));
    dom.append_child(parent, text);
}

fn close_element(dom: &Dom, stack: &mut Vec<NodeId>, tag: &str) {
    let Some(depth) = stack
        .iter()
        .skip(1)
        .rposition(|node| dom.tag_name(*node) == Some(tag))
    else {
        return;
    };
    // rposition over the skipped iterator is relative to index 1.
    stack.truncate(depth + 1);
}

struct StartTag {
    tag: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
    next: usize,
}

fn parse_start_tag(html: &str, at: usize) -> Result<StartTag, ParseError> {
    let bytes = html.as_bytes();
    let mut i = at + 1;
    let tag_start = i;
    while i < bytes.len() && is_name_byte(bytes[i]) {
        i += 1;
    }
    let tag = html[tag_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closing = false;
    loop {
        skip_whitespace(bytes, &mut i);
        match bytes.get(i) {
            None => return Err(ParseError::UnclosedTag(at)),
            Some(b'>') => {
                i += 1;
                break;
            }
            Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                self_closing = true;
                i += 2;
                break;
            }
            Some(b'/') => {
                i += 1;
                continue;
            }
            Some(_) => {}
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let name = html[name_start..i].to_ascii_lowercase();
        skip_whitespace(bytes, &mut i);

        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_whitespace(bytes, &mut i);
            parse_attr_value(html, &mut i, at)?
        } else {
            String::new()
        };
        if !name.is_empty() {
            attrs.push((name, value));
        }
    }

    Ok(StartTag {
        tag,
        attrs,
        self_closing,
        next: i,
    })
}

fn parse_attr_value(html: &str, i: &mut usize, tag_at: usize) -> Result<String, ParseError> {
    let bytes = html.as_bytes();
    match bytes.get(*i) {
        None => Err(ParseError::UnclosedTag(tag_at)),
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            let start = *i + 1;
            let len = html[start..]
                .find(char::from(quote))
                .ok_or(ParseError::UnclosedAttribute(tag_at))?;
            *i = start + len + 1;
            Ok(decode_character_references(&html[start..start + len]))
        }
        Some(_) => {
            let start = *i;
            while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && bytes[*i] != b'>' {
                *i += 1;
            }
            Ok(decode_character_references(&html[start..*i]))
        }
    }
}

fn parse_end_tag(html: &str, at: usize) -> Result<(String, usize), ParseError> {
    let bytes = html.as_bytes();
    let mut i = at + 2;
    skip_whitespace(bytes, &mut i);
    let tag_start = i;
    while i < bytes.len() && is_name_byte(bytes[i]) {
        i += 1;
    }
    let tag = html[tag_start..i].to_ascii_lowercase();
    let close = html[i..].find('>').ok_or(ParseError::UnclosedTag(at))?;
    Ok((tag, i + close + 1))
}

fn find_end_tag(html: &str, from: usize, tag: &str) -> Option<usize> {
    let needle = format!("</{tag}");
    let lower = html[from..].to_ascii_lowercase();
    lower.find(&needle).map(|offset| from + offset)
}

fn skip_whitespace(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

const fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

/// Decode named and numeric character references.
///
/// Unknown references are kept verbatim.
pub fn decode_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }
    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| decode_reference(&rest[1..semi]).map(|ch| (ch, semi)));
        if let Some((ch, semi)) = decoded {
            out.push(ch);
            rest = &rest[semi + 1..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = if let Some(hex) = numeric
            .strip_prefix('x')
            .or_else(|| numeric.strip_prefix('X'))
        {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            numeric.parse::<u32>().ok()?
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('\u{a9}'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        "hellip" => Some('\u{2026}'),
        _ => None,
    }
}
