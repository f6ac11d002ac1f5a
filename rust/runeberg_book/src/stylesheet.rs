/// Stylesheet shared by every section; covers the classes the normalizer emits.
pub const STYLESHEET: &str = r#"
p {
  text-indent: 0;
  margin-top: 0;
}

p + p {
  margin-top: 1.5ex;
}

h1, h2, h3,
p.center, div.center {
  text-align: center;
}

hr {
  border: 1px solid black;
}

span.spaced {
  letter-spacing: 0.1rem;
}

span.smallcaps {
  font-variant: small-caps;
}

span.big {
  font-size: 130%;
}

span.footnote {
  font-size: 80%;
}

td._c {
  text-align: center;
}
td._r {
  text-align: right;
}
"#;
