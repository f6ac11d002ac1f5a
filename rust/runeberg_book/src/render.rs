use markup5ever_rcdom::{Handle, NodeData};

/// Quotes are escaped in text too, so `=""` can only come from an attribute.
fn esc_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn esc_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text(tag: &str) -> bool {
    matches!(
        tag,
        "iframe" | "noembed" | "noframes" | "plaintext" | "script" | "style" | "xmp"
    )
}

/// The parser drops a newline directly after these start tags, so it has to be written back.
fn eats_leading_newline(tag: &str) -> bool {
    matches!(tag, "pre" | "listing" | "textarea")
}

fn starts_with_newline(node: &Handle) -> bool {
    match node.children.borrow().first().map(|c| &c.data) {
        Some(NodeData::Text { contents }) => contents.borrow().starts_with('\n'),
        _ => false,
    }
}

fn serialize_node(out: &mut String, node: &Handle, raw_text: bool) {
    match &node.data {
        NodeData::Document => {
            for c in node.children.borrow().iter() {
                serialize_node(out, c, false);
            }
        }
        NodeData::Doctype { name, .. } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Text { contents } => {
            let text = contents.borrow();
            if raw_text {
                out.push_str(&text);
            } else {
                out.push_str(&esc_text(&text));
            }
        }
        NodeData::Comment { contents } => {
            out.push_str("<!--");
            out.push_str(contents);
            out.push_str("-->");
        }
        NodeData::ProcessingInstruction { .. } => {}
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let tag: &str = &name.local;
            out.push('<');
            out.push_str(tag);
            for a in attrs.borrow().iter() {
                out.push(' ');
                if let Some(prefix) = &a.name.prefix {
                    out.push_str(prefix);
                    out.push(':');
                }
                out.push_str(&a.name.local);
                out.push_str("=\"");
                out.push_str(&esc_attr(&a.value));
                out.push('"');
            }

            if is_void(tag) {
                out.push_str("/>");
                return;
            }
            out.push('>');

            if eats_leading_newline(tag) && starts_with_newline(node) {
                out.push('\n');
            }

            let raw = is_raw_text(tag);
            if let Some(contents) = template_contents.borrow().as_ref() {
                for c in contents.children.borrow().iter() {
                    serialize_node(out, c, raw);
                }
            }
            for c in node.children.borrow().iter() {
                serialize_node(out, c, raw);
            }

            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

/// Serialize a node and its subtree; void elements come out as `<br/>`.
pub fn render_node(node: &Handle) -> String {
    let mut out = String::new();
    serialize_node(&mut out, node, false);
    out
}
