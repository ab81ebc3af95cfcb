//! Markup serialization.
//!
//! The serialized content string is plain HTML. Undo snapshots store it and
//! `get_content`/`set_content` exchange it.

use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};

use crate::error::{EditorError, Result};
use crate::tree::{ContentTree, NodeData, NodeId, NodeKind};

/// Serialize the children of `node` (not `node` itself).
pub fn serialize_children(tree: &ContentTree, node: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(node) {
        write_node(tree, child, &mut out);
    }
    out
}

/// Serialize `node` including its own tag.
pub fn serialize_node(tree: &ContentTree, node: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, node, &mut out);
    out
}

fn write_node(tree: &ContentTree, node: NodeId, out: &mut String) {
    match tree.data(node) {
        NodeData::Text(rope) => {
            for chunk in rope.chunks() {
                out.push_str(&encode_text(chunk));
            }
        }
        NodeData::Element(el) => {
            out.push('<');
            out.push_str(el.tag());
            for (name, value) in el.attributes() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&encode_double_quoted_attribute(value));
                out.push('"');
            }
            out.push('>');
            if tree.kind(node) == NodeKind::VoidElement {
                return;
            }
            for &child in tree.children(node) {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(el.tag());
            out.push('>');
        }
        NodeData::Fragment => {
            for &child in tree.children(node) {
                write_node(tree, child, out);
            }
        }
    }
}

struct StartTag {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
}

/// Parse `html` into a new detached fragment owned by `tree`.
///
/// The parser is lenient in the way hosts expect pasted content to be handled: stray end tags
/// are dropped and elements still open at the end of input are closed implicitly. Only an
/// unterminated tag or comment is an error, and nothing parsed before it is kept.
pub fn parse_fragment(tree: &mut ContentTree, html: &str) -> Result<NodeId> {
    let fragment = tree.create_fragment();
    if let Err(err) = parse_into(tree, fragment, html) {
        tree.release(fragment);
        return Err(err);
    }
    Ok(fragment)
}

fn parse_into(tree: &mut ContentTree, fragment: NodeId, html: &str) -> Result<()> {
    let mut open: Vec<NodeId> = vec![fragment];
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];
        let parent = open.last().copied().unwrap_or(fragment);

        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body
                .find("-->")
                .ok_or_else(|| markup_error(pos, "unterminated comment"))?;
            pos += 4 + end + 3;
        } else if rest.starts_with("</") {
            let close = rest
                .find('>')
                .ok_or_else(|| markup_error(pos, "unterminated end tag"))?;
            let name = rest[2..close].trim();
            if let Some(depth) = open.iter().rposition(|&n| tree.has_tag(n, name)) {
                open.truncate(depth);
            }
            pos += close + 1;
        } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
        {
            let (consumed, tag) = parse_start_tag(rest).map_err(|m| markup_error(pos, m))?;
            let element = tree.create_element(&tag.name);
            if let Some(data) = tree.element_mut(element) {
                for (name, value) in &tag.attributes {
                    data.set_attribute(name, value.as_str());
                }
            }
            tree.append_child(parent, element)?;
            if !tag.self_closing && tree.kind(element) == NodeKind::Element {
                open.push(element);
            }
            pos += consumed;
        } else {
            let end = if rest.starts_with('<') {
                rest[1..].find('<').map_or(rest.len(), |i| i + 1)
            } else {
                rest.find('<').unwrap_or(rest.len())
            };
            let text = decode_html_entities(&rest[..end]);
            append_text(tree, parent, &text)?;
            pos += end;
        }
    }
    Ok(())
}

fn append_text(tree: &mut ContentTree, parent: NodeId, text: &str) -> Result<()> {
    match tree.last_child(parent) {
        Some(last) if tree.kind(last) == NodeKind::Text => {
            let length = tree.text_len(last);
            tree.insert_text(last, length, text)
        }
        _ => {
            let node = tree.create_text(text);
            tree.append_child(parent, node)
        }
    }
}

fn markup_error(offset: usize, message: &str) -> EditorError {
    EditorError::Markup {
        offset,
        message: message.to_string(),
    }
}

fn scan(bytes: &[u8], mut i: usize, accept: impl Fn(u8) -> bool) -> usize {
    while i < bytes.len() && accept(bytes[i]) {
        i += 1;
    }
    i
}

fn skip_whitespace(bytes: &[u8], i: usize) -> usize {
    scan(bytes, i, |b| b.is_ascii_whitespace())
}

// All delimiters are ASCII, so every slice boundary below falls on a char boundary.
fn parse_start_tag(input: &str) -> std::result::Result<(usize, StartTag), &'static str> {
    let bytes = input.as_bytes();
    let name_end = scan(bytes, 1, |b| {
        !b.is_ascii_whitespace() && b != b'/' && b != b'>'
    });
    let name = input[1..name_end].to_ascii_lowercase();
    let mut attributes = Vec::new();
    let mut i = name_end;

    loop {
        i = skip_whitespace(bytes, i);
        match bytes.get(i) {
            None => return Err("unterminated start tag"),
            Some(b'>') => {
                return Ok((
                    i + 1,
                    StartTag {
                        name,
                        attributes,
                        self_closing: false,
                    },
                ));
            }
            Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                return Ok((
                    i + 2,
                    StartTag {
                        name,
                        attributes,
                        self_closing: true,
                    },
                ));
            }
            Some(_) => {
                let attr_end = scan(bytes, i, |b| {
                    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/')
                });
                if attr_end == i {
                    i += 1;
                    continue;
                }
                let attr_name = input[i..attr_end].to_ascii_lowercase();
                i = skip_whitespace(bytes, attr_end);

                if bytes.get(i) != Some(&b'=') {
                    attributes.push((attr_name, String::new()));
                    continue;
                }
                i = skip_whitespace(bytes, i + 1);
                let raw = match bytes.get(i) {
                    Some(&quote @ (b'"' | b'\'')) => {
                        let close = input[i + 1..]
                            .find(quote as char)
                            .ok_or("unterminated attribute value")?;
                        let value = &input[i + 1..i + 1 + close];
                        i += close + 2;
                        value
                    }
                    _ => {
                        let end = scan(bytes, i, |b| !b.is_ascii_whitespace() && b != b'>');
                        let value = &input[i..end];
                        i = end;
                        value
                    }
                };
                attributes.push((attr_name, decode_html_entities(raw).into_owned()));
            }
        }
    }
}
