//! String-level rewrites of the archive's custom tags, run before tree parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ALIGN_SHORTHAND: Regex = Regex::new(r"(<table|<td) ([a-z]+)>").unwrap();
    static ref COLSPAN_SHORTHAND: Regex = Regex::new(r"(<td) ([1-9]+)([a-z]+)>").unwrap();
}

/// Two em spaces; XHTML has no named entity to stand in for a tab.
pub const TAB: &str = "\u{2003}\u{2003}";

const INLINE_TAGS: [(&str, &str, &str, &str); 4] = [
    ("<sp>", "</sp>", r#"<span class="spaced">"#, "</span>"),
    ("<sc>", "</sc>", r#"<span class="smallcaps">"#, "</span>"),
    ("<big>", "</big>", r#"<span class="big">"#, "</span>"),
    (
        "<footnote>",
        "</footnote>",
        r#"<span class="footnote"> [fotnot: "#,
        "]</span>",
    ),
];

pub fn rewrite_dialect(input: &str) -> String {
    let mut s = input.to_string();

    for (open, close, open_to, close_to) in INLINE_TAGS {
        s = s.replace(open, open_to).replace(close, close_to);
    }

    s = s.replace("<tab>", TAB);

    // `<td c>` → `<td class="_c">`, `<td 2r>` → `<td colspan="2" class="_r">`
    s = ALIGN_SHORTHAND
        .replace_all(&s, r#"${1} class="_${2}">"#)
        .into_owned();
    s = COLSPAN_SHORTHAND
        .replace_all(&s, r#"${1} colspan="${2}" class="_${3}">"#)
        .into_owned();

    // Rows are never opened explicitly.
    s.replace("\n<td", "\n<tr><td")
}
