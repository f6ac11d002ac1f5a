use runeberg_book::{Converter, ErrorKind, Settings};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn zip_with(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opt = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, data) in members {
        zip.start_file(*name, opt).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn converter() -> Converter {
    Converter::new(Settings::default()).unwrap()
}

const KORKARLEN_META: &[u8] = b"TITLE: K\xf6rkarlen\nTITLEKEY: korkarlen\nAUTHORKEY: lagersel\nLANGUAGE: sv\n";
const DUBBELMORD_META: &[u8] = b"TITLE: Ett dubbelmord\nTITLEKEY: dubbelmord\nAUTHORKEY: lagersel\nLANGUAGE: sv\n";
const DRGLAS_META: &[u8] = b"TITLE: Doktor Glas\nTITLEKEY: drglas\nAUTHORKEY: soderhj\nLANGUAGE: sv\n";
const COVER: &[u8] = "<h1>Omslag</h1>\n<p>Av Selma Lagerlöf\n".as_bytes();

/// A paginated book with the given `Articles.lst` and page files.
fn paginated(meta: &[u8], articles: &str, pages: &[(&str, &str)]) -> Vec<u8> {
    let names: Vec<String> = pages.iter().map(|(id, _)| format!("Pages/{id}.txt")).collect();
    let mut members: Vec<(&str, &[u8])> = vec![
        ("Metadata", meta),
        ("index.html", COVER),
        ("Pages.lst", &b"0001\n"[..]),
        ("Articles.lst", articles.as_bytes()),
    ];
    for (name, (_, text)) in names.iter().zip(pages) {
        members.push((name.as_str(), text.as_bytes()));
    }
    zip_with(&members)
}

#[test]
fn paginated_book_with_override() {
    let data = paginated(
        KORKARLEN_META,
        "index|Körkarlen|0001\n|I. Första kapitlet|0002-0003\n|II|0004\n",
        &[
            ("0002", "<chapter name=\"1\">\nFörsta kapitlet\n</chapter>\n\nDet var en gång.\n"),
            ("0003", "sade hon.\n\nNytt stycke.\n"),
            ("0004", "Andra kapitlet börjar.\n"),
        ],
    );
    let book = converter().convert(&data).unwrap();

    assert_eq!(book.title, "Körkarlen");
    assert_eq!(book.title_key, "korkarlen");
    assert_eq!(book.author, "Selma Lagerlöf");
    assert_eq!(book.language, "sv");
    assert_eq!(book.url, "https://runeberg.org/korkarlen/");
    assert_eq!(book.year.as_deref(), Some("1912"));
    assert!(!book.paragraph_heuristic_unconfirmed);

    assert_eq!(book.chapter_titles(), vec!["Titelsida", "I. Första kapitlet", "II"]);
    assert_eq!(
        book.chapters[1].body,
        "\n<h1>Första kapitlet</h1>\n\n<p>Det var en gång.\nsade hon.</p>\n\n<p>Nytt stycke.</p>\n"
    );
    // Capitalized page start opens a paragraph under the override.
    assert_eq!(book.chapters[2].body, "\n<p>Andra kapitlet börjar.</p>\n");
}

#[test]
fn front_matter_comes_first_with_provenance() {
    let data = paginated(KORKARLEN_META, "|I|0001\n", &[("0001", "\nText.\n")]);
    let book = converter().convert(&data).unwrap();

    let (title, body) = book.sections().next().unwrap();
    assert_eq!(title, "Titelsida");
    assert!(body.contains("<h1>Omslag</h1>"));
    assert!(body.contains("<p>Av Selma Lagerlöf</p>"));
    assert!(body.contains(
        r#"Projekt Runeberg: <a href="https://runeberg.org/korkarlen/">https://runeberg.org/korkarlen/</a>."#
    ));
}

#[test]
fn settings_change_origin_and_front_matter_title() {
    let settings = Settings::from_toml_str(
        "origin = \"https://mirror.example.org/\"\nfront_matter_title = \"Cover\"\n",
    )
    .unwrap();
    let converter = Converter::new(settings).unwrap();
    let data = paginated(
        DUBBELMORD_META,
        "|I|0001\n",
        &[("0001", "\nSe <a href=\"/dubbelmord/0002.html\">n\u{e4}sta</a>.\n")],
    );
    let book = converter.convert(&data).unwrap();

    assert_eq!(book.url, "https://mirror.example.org/dubbelmord/");
    assert_eq!(book.chapters[0].title, "Cover");
    assert!(book.chapters[1]
        .body
        .contains(r#"<a href="https://mirror.example.org/dubbelmord/0002.html">nästa</a>"#));
}

#[test]
fn default_heuristic_is_flagged_when_unconfirmed() {
    let data = paginated(
        DUBBELMORD_META,
        "|Novellen|0001-0002\n",
        &[("0001", "Första sidan.\n"), ("0002", "Andra sidan.\n")],
    );
    let book = converter().convert(&data).unwrap();
    assert!(book.paragraph_heuristic_unconfirmed);
    assert_eq!(book.year.as_deref(), Some("1899"));
    assert!(book.chapters[1].body.contains("Första sidan.\nAndra sidan."));
}

#[test]
fn blank_first_line_confirms_default_heuristic() {
    let data = paginated(
        DUBBELMORD_META,
        "|Novellen|0001-0002\n",
        &[("0001", "\nFörsta sidan.\n"), ("0002", "\nNytt stycke.\n")],
    );
    let book = converter().convert(&data).unwrap();
    assert!(!book.paragraph_heuristic_unconfirmed);
    assert_eq!(
        book.chapters[1].body,
        "\n<p>Första sidan.</p>\n\n<p>Nytt stycke.</p>\n"
    );
}

#[test]
fn table_page_is_not_nested_in_paragraph() {
    let data = paginated(
        DUBBELMORD_META,
        "|Tabell|0001-0002\n",
        &[
            ("0001", "\nText före tabellen.\n"),
            ("0002", "<table>\n<td>a<td>b\n</table>\n\nEfter.\n"),
        ],
    );
    let book = converter().convert(&data).unwrap();
    let body = &book.chapters[1].body;
    assert!(body.contains("<p>Text före tabellen.</p>\n\n<table>"), "{body}");
    assert!(body.contains("<td>a</td>"), "{body}");
    assert!(body.contains("<p>Efter.</p>"), "{body}");
}

#[test]
fn prerendered_book() {
    let data = zip_with(&[
        ("Metadata", DRGLAS_META),
        ("index.html", b"<h1>Doktor Glas</h1>\n"),
        ("Articles.lst", b"index|Doktor Glas|\n0001|Den 12 juni|\n"),
        (
            "0001.html",
            "<h1>12 juni.</h1>\n<p align=center><sc>Dagbok</sc>\n<p>Aldrig har jag sett <a href=\"/drglas/0002.html\">sommaren</a> så.\n"
                .as_bytes(),
        ),
    ]);
    let book = converter().convert(&data).unwrap();

    assert_eq!(book.author, "Hjalmar Söderberg");
    assert_eq!(book.year.as_deref(), Some("1905"));
    assert!(!book.paragraph_heuristic_unconfirmed);
    assert_eq!(book.chapter_titles(), vec!["Titelsida", "12 juni."]);

    let body = &book.chapters[1].body;
    assert!(body.contains(r#"<p class="center"><span class="smallcaps">Dagbok</span></p>"#), "{body}");
    assert!(body.contains(r#"<a href="https://runeberg.org/drglas/0002.html">sommaren</a>"#), "{body}");
}

#[test]
fn prerendered_article_needs_plain_h1() {
    let data = zip_with(&[
        ("Metadata", DRGLAS_META),
        ("index.html", b"<h1>Doktor Glas</h1>\n"),
        ("Articles.lst", b"0001|Den 12 juni|\n"),
        ("0001.html", b"<h2>12 juni.</h2>\n<p>Text.\n"),
    ]);
    let err = converter().convert(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    assert!(err.to_string().contains("0001.html"));
}

#[test]
fn unknown_author_aborts() {
    let data = paginated(
        b"TITLE: X\nTITLEKEY: x\nAUTHORKEY: nobody\nLANGUAGE: sv\n",
        "|I|0001\n",
        &[("0001", "\nText.\n")],
    );
    let err = converter().convert(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownReference);
}

#[test]
fn unhandled_dialect_tag_aborts() {
    let data = paginated(DUBBELMORD_META, "|I|0001\n", &[("0001", "\nText <hi b>fet</hi>.\n")]);
    let err = converter().convert(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralViolation);
}

#[test]
fn quoted_prose_converts() {
    let data = paginated(
        DUBBELMORD_META,
        "|I|0001\n",
        &[("0001", "\nHan skrev a=\"\" och 'b'.\n")],
    );
    let book = converter().convert(&data).unwrap();
    assert_eq!(
        book.chapters[1].body,
        "\n<p>Han skrev a=&#34;&#34; och &#39;b&#39;.</p>\n"
    );
}

#[test]
fn second_chapter_marker_aborts() {
    let data = paginated(
        DUBBELMORD_META,
        "|I|0001\n",
        &[("0001", "<chapter>\nEtt\n</chapter>\n\nText.\n<chapter>\nTvå\n")],
    );
    let err = converter().convert(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralViolation);
}

#[test]
fn empty_page_aborts() {
    let data = paginated(
        DUBBELMORD_META,
        "|I|0001-0002\n",
        &[("0001", "\nText.\n"), ("0002", "")],
    );
    let err = converter().convert(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyContent);
}

#[test]
fn missing_page_aborts() {
    let data = paginated(DUBBELMORD_META, "|I|0001-0002\n", &[("0001", "\nText.\n")]);
    let err = converter().convert(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingResource);
    assert!(err.to_string().contains("Pages/0002.txt"));
}

#[test]
fn descending_range_aborts() {
    let data = paginated(DUBBELMORD_META, "|I|0005-0003\n", &[]);
    let err = converter().convert(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedSequence);
    assert!(err.to_string().contains("0005-0003"));
}

#[test]
fn index_without_chapters_aborts() {
    let data = paginated(DUBBELMORD_META, "index|Ett dubbelmord|0001\n", &[]);
    let err = converter().convert(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyContent);
}

#[test]
fn missing_front_matter_aborts() {
    let data = zip_with(&[
        ("Metadata", DUBBELMORD_META),
        ("Pages.lst", b"0001\n"),
        ("Articles.lst", b"|I|0001\n"),
        ("Pages/0001.txt", b"\nText.\n"),
    ]);
    let err = converter().convert(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingResource);
    assert!(err.to_string().contains("index.html"));
}

#[test]
fn not_a_zip() {
    let err = converter().convert(b"plain text").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedRecord);
}
