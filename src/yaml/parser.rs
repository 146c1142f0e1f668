//! Reader for the Unity flavor of YAML.
//!
//! Unity scene files are a restricted YAML dialect: a directive prologue,
//! then one document per serialized object, each headed by
//! `--- !u!<class> &<fileID>`. Bodies are 2-space block mappings whose
//! leaf values are flow mappings (`{x: 0, y: 1, z: 0}`), flow sequences
//! (`[]`), plain scalars, or block sequences whose `- ` items sit at the
//! same indent as their key. This reader covers exactly that shape and
//! rejects everything else.

use crate::util::{Error, Result};

use super::node::{MappingEntries, Node};

/// Namespace prefix carried by every Unity object tag.
pub const UNITY_TAG_PREFIX: &str = "tag:unity3d.com,2011:";

/// One decoded document: resolved tag, numeric class id, anchor handle,
/// and the root node.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Full composite tag, e.g. `tag:unity3d.com,2011:4`.
    pub tag: String,
    /// Numeric suffix of the tag; selects the record kind.
    pub class_id: i32,
    /// Anchor handle, unique within the document set.
    pub anchor: i64,
    /// Root mapping of the document body.
    pub root: Node,
}

#[derive(Clone, Copy)]
struct Line<'a> {
    number: usize,
    indent: usize,
    text: &'a str,
}

/// Decode all documents of a scene file.
pub fn parse_documents(source: &str) -> Result<Vec<Document>> {
    // `!u!` resolves to the Unity namespace even without a %TAG directive.
    let mut tag_handles: Vec<(String, String)> =
        vec![("!u!".to_string(), UNITY_TAG_PREFIX.to_string())];

    let mut documents = Vec::new();
    let mut header: Option<(usize, &str)> = None;
    let mut body: Vec<Line<'_>> = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let number = idx + 1;
        let line = raw.trim_end();
        if line.trim_start().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        if line.starts_with('%') {
            let mut parts = line.split_whitespace();
            if parts.next() == Some("%TAG") {
                if let (Some(handle), Some(prefix)) = (parts.next(), parts.next()) {
                    tag_handles.retain(|(h, _)| h != handle);
                    tag_handles.push((handle.to_string(), prefix.to_string()));
                }
            }
            // %YAML and unknown directives carry no information we need.
            continue;
        }

        if line.starts_with("---") {
            if let Some((header_line, header_rest)) = header.take() {
                documents.push(finish_document(header_line, header_rest, &body, &tag_handles)?);
            }
            body.clear();
            header = Some((number, line[3..].trim()));
            continue;
        }

        if header.is_none() {
            return Err(Error::malformed(number, "content before first document marker"));
        }

        let indent = line.len() - line.trim_start_matches(' ').len();
        let text = &line[indent..];
        if text.starts_with('\t') {
            return Err(Error::malformed(number, "tab indentation is not allowed"));
        }
        body.push(Line { number, indent, text });
    }

    if let Some((header_line, header_rest)) = header.take() {
        documents.push(finish_document(header_line, header_rest, &body, &tag_handles)?);
    }

    Ok(documents)
}

fn finish_document(
    header_line: usize,
    header_rest: &str,
    body: &[Line<'_>],
    tag_handles: &[(String, String)],
) -> Result<Document> {
    let mut tag: Option<String> = None;
    let mut anchor: Option<i64> = None;

    for token in header_rest.split_whitespace() {
        if token.starts_with('!') {
            tag = resolve_tag(token, tag_handles);
        } else if let Some(text) = token.strip_prefix('&') {
            anchor = Some(
                text.parse::<i64>()
                    .map_err(|_| Error::MissingAnchor { line: header_line })?,
            );
        } else if token == "stripped" {
            // Prefab-instance remnant marker; the body is simply shorter.
        } else {
            return Err(Error::malformed(header_line, "unexpected token in document header"));
        }
    }

    let tag = tag.ok_or(Error::MissingTag { line: header_line })?;
    let class_id = tag
        .strip_prefix(UNITY_TAG_PREFIX)
        .and_then(|suffix| suffix.parse::<i32>().ok())
        .ok_or(Error::MissingTag { line: header_line })?;
    let anchor = anchor.ok_or(Error::MissingAnchor { line: header_line })?;

    let root = if body.is_empty() {
        Node::empty_mapping()
    } else {
        let mut parser = BlockParser { lines: body, pos: 0 };
        let root = parser.parse_node(body[0].indent)?;
        if let Some(line) = parser.peek() {
            return Err(Error::malformed(line.number, "unexpected trailing content"));
        }
        root
    };

    Ok(Document { tag, class_id, anchor, root })
}

/// Resolve a short tag like `!u!4` against the known tag handles.
/// The longest matching handle wins.
fn resolve_tag(token: &str, tag_handles: &[(String, String)]) -> Option<String> {
    tag_handles
        .iter()
        .filter(|(handle, _)| token.starts_with(handle.as_str()))
        .max_by_key(|(handle, _)| handle.len())
        .map(|(handle, prefix)| format!("{}{}", prefix, &token[handle.len()..]))
}

struct BlockParser<'a> {
    lines: &'a [Line<'a>],
    pos: usize,
}

impl<'a> BlockParser<'a> {
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn parse_node(&mut self, indent: usize) -> Result<Node> {
        match self.peek() {
            Some(line) if is_item(line.text) => self.parse_sequence(indent),
            Some(_) => self.parse_mapping(indent),
            None => Ok(Node::Scalar(String::new())),
        }
    }

    fn parse_mapping(&mut self, indent: usize) -> Result<Node> {
        let mut entries = MappingEntries::new();
        while let Some(line) = self.peek() {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(Error::malformed(line.number, "unexpected indentation"));
            }
            if is_item(line.text) {
                return Err(Error::malformed(line.number, "sequence item where a key was expected"));
            }
            let (key, rest) = split_entry(line.text)
                .ok_or_else(|| Error::malformed(line.number, "expected 'key: value'"))?;
            self.advance();
            let value = if rest.is_empty() {
                self.parse_nested_value(indent)?
            } else {
                parse_inline_value(&rest, line.number)?
            };
            entries.push((key, value));
        }
        Ok(Node::Mapping(entries))
    }

    /// Value of a `key:` with nothing after the colon: a deeper block, a
    /// same-indent block sequence (the Unity layout), or an empty scalar.
    fn parse_nested_value(&mut self, key_indent: usize) -> Result<Node> {
        match self.peek() {
            Some(line) if line.indent == key_indent && is_item(line.text) => {
                self.parse_sequence(key_indent)
            }
            Some(line) if line.indent > key_indent => self.parse_node(line.indent),
            _ => Ok(Node::Scalar(String::new())),
        }
    }

    fn parse_sequence(&mut self, indent: usize) -> Result<Node> {
        let mut items = Vec::new();
        while let Some(line) = self.peek() {
            if line.indent != indent || !is_item(line.text) {
                if line.indent > indent {
                    return Err(Error::malformed(line.number, "unexpected indentation"));
                }
                break;
            }
            let content = line.text[1..].trim_start().to_string();
            self.advance();
            items.push(self.parse_item(&content, indent, line.number)?);
        }
        Ok(Node::Sequence(items))
    }

    fn parse_item(&mut self, content: &str, indent: usize, number: usize) -> Result<Node> {
        if content.is_empty() {
            return match self.peek() {
                Some(line) if line.indent > indent => self.parse_node(line.indent),
                _ => Ok(Node::Scalar(String::new())),
            };
        }
        if content.starts_with('{') || content.starts_with('[') {
            return parse_flow(content, number);
        }
        if let Some((key, rest)) = split_entry(content) {
            // Mapping item: first entry inline, any further keys on the
            // following lines at the item's content column.
            let item_col = indent + 2;
            let mut entries = MappingEntries::new();
            let first = if rest.is_empty() {
                self.parse_nested_value(item_col)?
            } else {
                parse_inline_value(&rest, number)?
            };
            entries.push((key, first));
            if let Some(line) = self.peek() {
                if line.indent == item_col && !is_item(line.text) {
                    if let Node::Mapping(more) = self.parse_mapping(item_col)? {
                        entries.extend(more);
                    }
                }
            }
            return Ok(Node::Mapping(entries));
        }
        Ok(Node::Scalar(unquote(content)))
    }
}

fn is_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

/// Split `key: value` at the first colon followed by a space or end of
/// line. Returns `(key, rest)` with `rest` empty for a bare `key:`.
fn split_entry(text: &str) -> Option<(String, String)> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b':' && (i + 1 == bytes.len() || bytes[i + 1] == b' ') {
            let key = text[..i].trim_end();
            if key.is_empty() {
                return None;
            }
            let rest = if i + 1 < text.len() { text[i + 1..].trim() } else { "" };
            return Some((key.to_string(), rest.to_string()));
        }
    }
    None
}

fn parse_inline_value(rest: &str, number: usize) -> Result<Node> {
    if rest.starts_with('{') || rest.starts_with('[') {
        parse_flow(rest, number)
    } else {
        Ok(Node::Scalar(unquote(rest)))
    }
}

/// Strip surrounding quotes from a block scalar.
fn unquote(text: &str) -> String {
    let text = text.trim();
    if text.len() >= 2 {
        if text.starts_with('"') && text.ends_with('"') {
            return text[1..text.len() - 1]
                .replace("\\\"", "\"")
                .replace("\\\\", "\\");
        }
        if text.starts_with('\'') && text.ends_with('\'') {
            return text[1..text.len() - 1].replace("''", "'");
        }
    }
    text.to_string()
}

/// Cursor over one flow value (`{...}`, `[...]`, quoted or bare scalar).
struct Flow {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

fn parse_flow(text: &str, line: usize) -> Result<Node> {
    let mut flow = Flow { chars: text.chars().collect(), pos: 0, line };
    let node = flow.parse_value()?;
    flow.skip_ws();
    if flow.peek().is_some() {
        return Err(Error::malformed(line, "trailing characters after flow value"));
    }
    Ok(node)
}

impl Flow {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while self.peek() == Some(' ') {
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> Result<Node> {
        self.skip_ws();
        match self.peek() {
            Some('{') => self.parse_mapping(),
            Some('[') => self.parse_sequence(),
            Some('"') | Some('\'') => Ok(Node::Scalar(self.parse_quoted()?)),
            _ => Ok(Node::Scalar(self.parse_bare())),
        }
    }

    fn parse_mapping(&mut self) -> Result<Node> {
        self.pos += 1; // '{'
        let mut entries = MappingEntries::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(Error::malformed(self.line, "unterminated flow mapping")),
                _ => {}
            }
            let key = self.parse_key()?;
            self.skip_ws();
            if self.peek() != Some(':') {
                return Err(Error::malformed(self.line, "expected ':' in flow mapping"));
            }
            self.pos += 1;
            let value = self.parse_value()?;
            entries.push((key, value));
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                Some('}') => {}
                _ => return Err(Error::malformed(self.line, "expected ',' or '}' in flow mapping")),
            }
        }
        Ok(Node::Mapping(entries))
    }

    fn parse_sequence(&mut self) -> Result<Node> {
        self.pos += 1; // '['
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(Error::malformed(self.line, "unterminated flow sequence")),
                _ => {}
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                Some(']') => {}
                _ => return Err(Error::malformed(self.line, "expected ',' or ']' in flow sequence")),
            }
        }
        Ok(Node::Sequence(items))
    }

    fn parse_key(&mut self) -> Result<String> {
        self.skip_ws();
        match self.peek() {
            Some('"') | Some('\'') => self.parse_quoted(),
            _ => {
                let mut key = String::new();
                while let Some(c) = self.peek() {
                    if matches!(c, ':' | ',' | '}' | ']') {
                        break;
                    }
                    key.push(c);
                    self.pos += 1;
                }
                Ok(key.trim_end().to_string())
            }
        }
    }

    fn parse_bare(&mut self) -> String {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if matches!(c, ',' | '}' | ']') {
                break;
            }
            value.push(c);
            self.pos += 1;
        }
        value.trim().to_string()
    }

    fn parse_quoted(&mut self) -> Result<String> {
        let Some(quote) = self.bump() else {
            return Err(Error::malformed(self.line, "unterminated quoted scalar"));
        };
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(Error::malformed(self.line, "unterminated quoted scalar")),
                Some(c) if c == quote => {
                    // '' inside a single-quoted scalar is an escaped quote.
                    if quote == '\'' && self.peek() == Some('\'') {
                        value.push('\'');
                        self.pos += 1;
                        continue;
                    }
                    break;
                }
                Some('\\') if quote == '"' => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(other) => value.push(other),
                    None => {
                        return Err(Error::malformed(self.line, "unterminated quoted scalar"))
                    }
                },
                Some(c) => value.push(c),
            }
        }
        Ok(value)
    }
}
