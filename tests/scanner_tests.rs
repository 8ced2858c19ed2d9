//! Integration tests for the lexical scanner.
//!
//! The parameterized cases pin down the classification each family of input
//! receives under the priority-ordered table; the snapshot dumps cover whole
//! log lines end to end.

use loglex::{DataScanner, TokenKind, TokenSpan};
use rstest::rstest;

fn kinds(input: &str) -> Vec<TokenKind> {
    DataScanner::new(input).map(|span| span.kind).collect()
}

fn dump(input: &str) -> String {
    DataScanner::new(input)
        .map(|span| format!("{}[{},{})", span.kind.name(), span.start, span.end))
        .collect::<Vec<_>>()
        .join(" ")
}

#[rstest]
#[case::double_quoted(r#""a b""#, vec![TokenKind::Quoted])]
#[case::single_quoted("'x y'", vec![TokenKind::Quoted])]
#[case::url("http://example.com/a=1", vec![TokenKind::Url])]
#[case::absolute_path("/var/log/messages", vec![TokenKind::Path])]
#[case::relative_path("./conf.d/10-main", vec![TokenKind::Path])]
#[case::mac_address("00:1a:2b:3c:4d:5e", vec![TokenKind::Mac])]
#[case::iso_date("2023-04-05", vec![TokenKind::Date])]
#[case::slash_date("2023/4/5", vec![TokenKind::Date])]
#[case::syslog_date("12/Mar/2023", vec![TokenKind::Date])]
#[case::time_with_millis("10:30:45.123", vec![TokenKind::Time])]
#[case::bare_time("10:30", vec![TokenKind::Time])]
#[case::ipv6("fe80::1", vec![TokenKind::Ipv6])]
#[case::hex_dump("de:ad:be:ef", vec![TokenKind::HexDump])]
#[case::xml_open("<div>", vec![TokenKind::XmlOpenTag])]
#[case::xml_empty("<br/>", vec![TokenKind::XmlEmptyTag])]
#[case::xml_close("</div>", vec![TokenKind::XmlCloseTag])]
#[case::xml_processing_instruction(r#"<?xml version="1.0"?>"#, vec![TokenKind::XmlEmptyTag])]
#[case::uppercase_marker("A", vec![TokenKind::H1])]
#[case::punctuation(":", vec![TokenKind::Colon])]
#[case::equals("=", vec![TokenKind::Equals])]
#[case::comma(",", vec![TokenKind::Comma])]
#[case::semicolon(";", vec![TokenKind::Semi])]
#[case::empty_pair("()", vec![TokenKind::EmptyPair])]
#[case::left_curly("{", vec![TokenKind::LCurly])]
#[case::ipv4("10.0.0.1", vec![TokenKind::Ipv4])]
#[case::uuid("0f42aeb1-9ac5-4fcd-b24c-ab6c28ab1dcd", vec![TokenKind::Uuid])]
#[case::version("1.2.3", vec![TokenKind::Version])]
#[case::version_suffix("1.2.0-rc1", vec![TokenKind::Version])]
#[case::octal("0755", vec![TokenKind::Octal])]
#[case::number("8080", vec![TokenKind::Number])]
#[case::scientific("1.5e-3", vec![TokenKind::Number])]
#[case::hex_number("0xdeadbeef", vec![TokenKind::HexNumber])]
#[case::email("user@example.com", vec![TokenKind::Email])]
#[case::constant_true("true", vec![TokenKind::Constant])]
#[case::constant_null("null", vec![TokenKind::Constant])]
#[case::symbol("foo_bar::baz", vec![TokenKind::Symbol])]
#[case::newline("\n", vec![TokenKind::Line])]
#[case::tab("\t", vec![TokenKind::Whitespace])]
// The symbol class does not exclude '.', so a bare dot lands there and the
// dedicated dot entry only matters to grammar tables.
#[case::bare_dot(".", vec![TokenKind::Symbol])]
#[case::escaped_dot(r"\.", vec![TokenKind::EscapedChar])]
#[case::garbage("#", vec![TokenKind::Garbage])]
fn classifies_token_families(#[case] input: &str, #[case] expected: Vec<TokenKind>) {
    assert_eq!(kinds(input), expected);
}

#[test]
fn quoted_string_wins_over_symbol() {
    // The quote characters are part of the quot span; a symbol must not
    // swallow the opening quote.
    assert_eq!(
        DataScanner::new(r#""a b""#).collect::<Vec<_>>(),
        vec![TokenSpan {
            start: 0,
            end: 5,
            kind: TokenKind::Quoted,
        }]
    );
}

#[test]
fn key_value_line_splits_into_expected_kinds() {
    assert_eq!(
        kinds("host=10.0.0.1:8080"),
        vec![
            TokenKind::Symbol,
            TokenKind::Equals,
            TokenKind::Ipv4,
            TokenKind::Colon,
            TokenKind::Number,
        ]
    );
}

#[test]
fn mac_is_tried_before_the_generic_hex_run() {
    assert_eq!(kinds("00:1a:2b:3c:4d:5e"), vec![TokenKind::Mac]);
    // Seven octets: not a MAC, and the whole run is one hex dump.
    assert_eq!(kinds("00:1a:2b:3c:4d:5e:6f"), vec![TokenKind::HexDump]);
}

#[test]
fn words_need_their_trailing_context() {
    // "host" is followed by '='; the word entry rejects it and the symbol
    // entry takes it instead.
    assert_eq!(kinds("host,"), vec![TokenKind::Word, TokenKind::Comma]);
    assert_eq!(kinds("host="), vec![TokenKind::Symbol, TokenKind::Equals]);
}

#[test]
fn spans_are_contiguous_over_a_log_line() {
    let input = r#"Apr  5 10:30:45 host sshd[812]: Accepted publickey for root from 10.0.0.1 port 51022 ssh2"#;
    let mut expected_start = 0;
    for span in DataScanner::new(input) {
        assert_eq!(span.start, expected_start);
        assert!(span.end > span.start);
        expected_start = span.end;
    }
    assert_eq!(expected_start, input.len());
}

#[test]
fn access_log_line_dump() {
    insta::assert_snapshot!(
        dump("host=10.0.0.1:8080"),
        @"sym[0,4) eq[4,5) ipv4[5,13) coln[13,14) num[14,18)"
    );
}

#[test]
fn timestamped_request_dump() {
    insta::assert_snapshot!(
        dump("2023-04-05T10:30:45.123 GET /api 200"),
        @"date[0,11) time[11,23) h1[23,24) h1[24,25) h1[25,26) h1[26,27) h1[27,28) path[28,32) h1[32,33) num[33,36)"
    );
}
