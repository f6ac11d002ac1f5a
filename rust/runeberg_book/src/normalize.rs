//! Turns dialect markup into a canonical body fragment.
//!
//! Runeberg's htmlish markup lacks most closing tags and uses a handful of
//! custom tags and attribute shorthands. After the string rewrites in
//! [`crate::preprocess`] the text is parsed as a full HTML document, the body
//! subtree is corrected in one depth-first walk, and the result is rendered
//! back and checked for leftovers.

use crate::error::{ConvertError, Result};
use crate::preprocess::rewrite_dialect;
use crate::render::render_node;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{Attribute, LocalName, Namespace, QualName};
use lazy_static::lazy_static;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;

lazy_static! {
    // Text followed by a simple open tag (want: `text <strong>`), with some
    // typographic exceptions. Whitespace here is ASCII whitespace only.
    static ref SPACE_BEFORE_INLINE: Regex =
        Regex::new(r#"([^\t\n\x0C\r >’»])(<[a-z0-9_ ="]+>)"#).unwrap();
    static ref BREAK_ON_OWN_LINE: Regex = Regex::new(r"(.+)(<br/>)").unwrap();
}

/// A correction applied to every node of the body subtree.
pub trait NodeRule {
    fn apply(&self, node: &Handle, parent: Option<&Handle>);
}

fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn is_element(node: &Handle, tag: &str) -> bool {
    element_name(node) == Some(tag)
}

/// `align` on `p`/`div` becomes a `center` class token.
pub struct CenterAlignment;

impl NodeRule for CenterAlignment {
    fn apply(&self, node: &Handle, _parent: Option<&Handle>) {
        let NodeData::Element { name, attrs, .. } = &node.data else {
            return;
        };
        if !matches!(&*name.local, "p" | "div") {
            return;
        }

        let mut attrs = attrs.borrow_mut();
        let before = attrs.len();
        attrs.retain(|a| &*a.name.local != "align");
        if attrs.len() == before {
            return;
        }

        match attrs.iter_mut().find(|a| &*a.name.local == "class") {
            Some(class) => {
                if !class.value.is_empty() {
                    class.value.push_slice(",");
                }
                class.value.push_slice("center");
            }
            None => attrs.push(Attribute {
                name: QualName::new(None, Namespace::from(""), LocalName::from("class")),
                value: StrTendril::from_slice("center"),
            }),
        }
    }
}

/// Paragraph text loses its trailing newlines.
pub struct TrimParagraphText;

impl NodeRule for TrimParagraphText {
    fn apply(&self, node: &Handle, parent: Option<&Handle>) {
        let NodeData::Text { contents } = &node.data else {
            return;
        };
        if !parent.is_some_and(|p| is_element(p, "p")) {
            return;
        }
        let mut contents = contents.borrow_mut();
        let trimmed = StrTendril::from_slice(contents.trim_end_matches('\n'));
        *contents = trimmed;
    }
}

/// Root-relative links point back at the origin site.
pub struct AbsoluteLinks<'a> {
    pub origin: &'a str,
}

impl NodeRule for AbsoluteLinks<'_> {
    fn apply(&self, node: &Handle, _parent: Option<&Handle>) {
        let NodeData::Element { name, attrs, .. } = &node.data else {
            return;
        };
        if &*name.local != "a" {
            return;
        }
        let mut attrs = attrs.borrow_mut();
        if let Some(href) = attrs.iter_mut().find(|a| &*a.name.local == "href") {
            if href.value.starts_with('/') {
                let absolute = format!("{}{}", self.origin.trim_end_matches('/'), &*href.value);
                href.value = StrTendril::from_slice(&absolute);
            }
        }
    }
}

/// Apply every rule to `node` in order, then recurse into its children.
pub fn walk(node: &Handle, parent: Option<&Handle>, rules: &[&dyn NodeRule]) {
    for rule in rules {
        rule.apply(node, parent);
    }
    for child in node.children.borrow().iter() {
        walk(child, Some(node), rules);
    }
}

fn find_body(node: &Handle) -> Option<Handle> {
    if is_element(node, "body") {
        return Some(node.clone());
    }
    for child in node.children.borrow().iter() {
        if let Some(body) = find_body(child) {
            return Some(body);
        }
    }
    None
}

fn fix_spacing(body: &str) -> String {
    let body = body.replace("</p><", "</p>\n\n<");
    let body = SPACE_BEFORE_INLINE.replace_all(&body, "${1} ${2}");
    BREAK_ON_OWN_LINE
        .replace_all(&body, "${1}\n${2}")
        .into_owned()
}

/// Normalize one chapter (or front matter) of dialect markup into a body fragment.
pub fn normalize_markup(input: &str, origin: &str) -> Result<String> {
    let prepared = rewrite_dialect(input);
    let dom = parse_document(RcDom::default(), Default::default()).one(prepared.as_str());
    let body = find_body(&dom.document).ok_or_else(|| {
        ConvertError::StructuralViolation("missing <body> in the node tree".to_string())
    })?;

    let links = AbsoluteLinks { origin };
    let rules: [&dyn NodeRule; 3] = [&CenterAlignment, &TrimParagraphText, &links];
    walk(&body, None, &rules);

    let rendered = render_node(&body);
    let inner = rendered.strip_prefix("<body>").unwrap_or(&rendered);
    let inner = inner.strip_suffix("</body>").unwrap_or(inner);
    let out = fix_spacing(&format!("\n{inner}\n"));

    if out.contains(r#"="""#) {
        return Err(ConvertError::StructuralViolation(
            r#"found ="" in body, an htmlish tag with an unhandled attribute"#.to_string(),
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ORIGIN;
    use crate::error::ErrorKind;

    fn norm(input: &str) -> String {
        normalize_markup(input, DEFAULT_ORIGIN).unwrap()
    }

    #[test]
    fn align_becomes_center_class() {
        assert_eq!(norm("<p align=center>Mitt"), "\n<p class=\"center\">Mitt</p>\n");
        assert_eq!(
            norm(r#"<div class="foo" align="center">x</div>"#),
            "\n<div class=\"foo,center\">x</div>\n"
        );
        assert_eq!(norm("<p class=\"\" align=center>x"), "\n<p class=\"center\">x</p>\n");
        assert_eq!(
            norm("<p class=\"foo\" align=center>x"),
            "\n<p class=\"foo,center\">x</p>\n"
        );
    }

    #[test]
    fn align_elsewhere_is_untouched() {
        let out = norm("<table><tr><td align=right>1</td></tr></table>");
        assert!(out.contains(r#"<td align="right">1</td>"#));
    }

    #[test]
    fn paragraph_text_is_trimmed_and_separated() {
        let out = norm("\n<p>Ett stycke.\n\n<p>Ett till.\n");
        assert_eq!(out, "\n<p>Ett stycke.</p>\n\n<p>Ett till.</p>\n");
    }

    #[test]
    fn relative_links_become_absolute() {
        let out = norm(r#"<a href="/drglas/">bok</a> <a href="http://x.org/">x</a>"#);
        assert!(out.contains(r#"<a href="https://runeberg.org/drglas/">bok</a>"#));
        assert!(out.contains(r#"<a href="http://x.org/">x</a>"#));
    }

    #[test]
    fn footnote_reads_as_bracketed_label() {
        let out = norm("<p>Text<footnote>abc</footnote>");
        assert!(out.contains(r#"<span class="footnote"> [fotnot: abc]</span>"#));
        // Text directly before an inline open tag gets separated.
        assert!(out.contains(r#"Text <span class="footnote">"#));
    }

    #[test]
    fn typographic_characters_skip_the_space() {
        let out = norm("<p>»<i>citat</i>« och ’<b>x</b>");
        assert!(out.contains("»<i>citat</i>"));
        assert!(out.contains("’<b>x</b>"));
    }

    #[test]
    fn hard_breaks_start_their_own_line() {
        let out = norm("<p>rad ett<br>rad två<br>");
        assert_eq!(out, "\n<p>rad ett<br/>rad två\n<br/></p>\n");
    }

    #[test]
    fn unhandled_attribute_is_fatal() {
        let err = normalize_markup("<p>Text <hi b>fet</hi></p>", DEFAULT_ORIGIN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
        assert!(err.to_string().contains(r#"="""#));
    }

    #[test]
    fn empty_quotes_in_prose_are_not_an_attribute() {
        let out = norm("<p>Han skrev a=\"\" i koden.\n");
        assert_eq!(out, "\n<p>Han skrev a=&#34;&#34; i koden.</p>\n");

        let err = normalize_markup("<p>Han skrev a=\"\" <hi b>fet</hi>\n", DEFAULT_ORIGIN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    }

    #[test]
    fn frameset_document_has_no_body() {
        let err = normalize_markup("<frameset><frame src=a.html></frameset>", DEFAULT_ORIGIN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    }

    #[test]
    fn renormalizing_is_stable() {
        let once = norm(
            "<h1>Kapitel</h1>\n<p align=center><sc>Inledning</sc>\n\n<p>Med<footnote>not</footnote> text.\n<table c>\n<td 2r>x\n</table>\n",
        );
        let twice = norm(&once);
        assert_eq!(twice.trim(), once.trim());
    }
}
