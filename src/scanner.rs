//! Lexical scanner for free-form log text.
//!
//! The scanner classifies runs of characters into the terminal kinds of
//! [`TokenKind`] using a fixed, priority-ordered table of leftmost-anchored
//! regex patterns:
//! 1. At the cursor, the table entries are tried in declaration order.
//! 2. The *first* entry that matches wins, not the longest — ordering encodes
//!    precedence (a quoted string must be recognized before a bare symbol
//!    would swallow its quote character; a MAC address must be tried before
//!    the generic hex-colon run).
//! 3. The cursor advances to the end of the consumed text and a span is
//!    emitted; the final `.` entry guarantees forward progress.
//!
//! The table is data, not code: one `Lazy`-compiled list shared read-only
//! across all scans. The `regex` crate has no lookaround, so entries that
//! needed it in pattern form instead carry trailing context *outside* the
//! consuming capture group, extra candidate patterns tried in order, or a
//! semantic acceptance check on the matched text (the IPv6 entry parses the
//! candidate as a real address so dotted quads fall through to IPv4).

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv6Addr;

use crate::token::{TokenKind, TokenSpan};

/// One candidate pattern for a table entry. Group 1 is the consumed token
/// text; anything after it is uncaptured trailing context.
struct Pattern {
    re: Regex,
    /// Semantic acceptance check on the captured text; a failed check lets
    /// the entry fall through to lower-priority entries.
    check: Option<fn(&str) -> bool>,
}

/// One priority-table entry: a terminal kind plus its candidate patterns.
struct Matcher {
    kind: TokenKind,
    patterns: Vec<Pattern>,
}

fn entry(kind: TokenKind, patterns: &[&str]) -> Matcher {
    Matcher {
        kind,
        patterns: patterns
            .iter()
            .map(|p| Pattern {
                re: Regex::new(p).expect("static scanner pattern must compile"),
                check: None,
            })
            .collect(),
    }
}

fn entry_checked(kind: TokenKind, patterns: &[(&str, Option<fn(&str) -> bool>)]) -> Matcher {
    Matcher {
        kind,
        patterns: patterns
            .iter()
            .map(|(p, check)| Pattern {
                re: Regex::new(p).expect("static scanner pattern must compile"),
                check: *check,
            })
            .collect(),
    }
}

/// A loose colon/hex run only counts as IPv6 if it parses as a real address
/// (zone suffix stripped); otherwise dotted quads and hex dumps fall through.
fn is_ipv6_literal(text: &str) -> bool {
    let base = match text.split_once('%') {
        Some((base, _zone)) => base,
        None => text,
    };
    base.parse::<Ipv6Addr>().is_ok()
}

/// Rejects version-suffix candidates whose dash actually belongs to a
/// scientific-notation exponent, e.g. `1.5e-3`.
fn version_suffix_ok(text: &str) -> bool {
    let idx = match text.rfind('-') {
        Some(idx) => idx,
        None => return true,
    };
    let mut prior = text[..idx].chars().rev();
    !(matches!(prior.next(), Some('e' | 'E'))
        && matches!(prior.next(), Some(c) if c.is_ascii_digit()))
}

/// The priority-ordered pattern table. Declaration order must mirror the
/// discriminant order of the terminal [`TokenKind`]s.
static MATCHERS: Lazy<Vec<Matcher>> = Lazy::new(|| {
    vec![
        entry(
            TokenKind::Quoted,
            &[r#"\A((?:u|r)?"(?:\\.|[^"])+"|(?:u|r)?'(?:\\.|[^'])+')"#],
        ),
        entry(
            TokenKind::Url,
            &[r#"\A(\w+://[^\s'"\[\](){}]+[/a-zA-Z0-9\-=&])"#],
        ),
        entry(TokenKind::Path, &[r"\A((?:/|\./|\.\./)[\w.\-~/]*)"]),
        // Six colon-joined octets, not followed by another colon.
        entry(
            TokenKind::Mac,
            &[r"\A([0-9a-fA-F]{2}(?::[0-9a-fA-F]{2}){5})(?:[^:]|$)"],
        ),
        // The trailing `T?` keeps an ISO-8601 separator inside the date span
        // so span coverage stays total.
        entry(
            TokenKind::Date,
            &[r"\A((?:\d{4}/\d{1,2}/\d{1,2}|\d{4}-\d{1,2}-\d{1,2}|\d{2}/\w{3}/\d{4})T?)"],
        ),
        // HH:MM:SS with optional fraction first, bare HH:MM (not followed by
        // another `:digit`) second.
        entry(
            TokenKind::Time,
            &[
                r"\A([\s\d]\d:\d\d:\d\d(?:[.,]\d{3,6})?Z?)\b",
                r"\A([\s\d]\d:\d\d)\b(?:$|[^:]|:(?:[^0-9]|$))",
            ],
        ),
        entry_checked(
            TokenKind::Ipv6,
            &[(
                r"\A(::|[:\da-fA-F.]+[a-fA-F\d](?:%\w+)?)",
                Some(is_ipv6_literal),
            )],
        ),
        entry(
            TokenKind::HexDump,
            &[r"\A([0-9a-fA-F]{2}(?::[0-9a-fA-F]{2})+)"],
        ),
        entry(
            TokenKind::XmlDecl,
            &[r#"\A(<!\??[\w:]+\s*(?:[\w:]+(?:\s*=\s*(?:"(?:\\.|[^"])+"|'(?:\\.|[^'])+'|[^>]+)))*\s*>)"#],
        ),
        entry(
            TokenKind::XmlEmptyTag,
            &[r#"\A(<\??[\w:]+\s*(?:[\w:]+(?:\s*=\s*(?:"(?:\\.|[^"])+"|'(?:\\.|[^'])+'|[^>]+)))*\s*(?:/|\?)>)"#],
        ),
        entry(
            TokenKind::XmlOpenTag,
            &[r#"\A(<[\w:]+\s*(?:[\w:]+(?:\s*=\s*(?:"(?:\\.|[^"])+"|'(?:\\.|[^'])+'|[^>]+)))*\s*>)"#],
        ),
        entry(TokenKind::XmlCloseTag, &[r"\A(</[\w:]+\s*>)"]),
        // h1/h2/h3 are deliberately identical; the external grouping grammar
        // disambiguates them by context. The scanner always yields h1.
        entry(TokenKind::H1, &[r"\A([A-Z \-])"]),
        entry(TokenKind::H2, &[r"\A([A-Z \-])"]),
        entry(TokenKind::H3, &[r"\A([A-Z \-])"]),
        entry(TokenKind::Colon, &[r"\A(:)"]),
        entry(TokenKind::Equals, &[r"\A(=)"]),
        entry(TokenKind::Comma, &[r"\A(,)"]),
        entry(TokenKind::Semi, &[r"\A(;)"]),
        entry(TokenKind::EmptyPair, &[r"\A(\(\)|\{\}|\[\])"]),
        entry(TokenKind::LCurly, &[r"\A(\{)"]),
        entry(TokenKind::RCurly, &[r"\A(\})"]),
        entry(TokenKind::LSquare, &[r"\A(\[)"]),
        entry(TokenKind::RSquare, &[r"\A(\])"]),
        entry(TokenKind::LParen, &[r"\A(\()"]),
        entry(TokenKind::RParen, &[r"\A(\))"]),
        entry(TokenKind::LAngle, &[r"\A(<)"]),
        entry(TokenKind::RAngle, &[r"\A(>)"]),
        // Dotted quad, not followed by a further digit.
        entry(
            TokenKind::Ipv4,
            &[r"\A((?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9]))(?:[^0-9]|$)"],
        ),
        entry(
            TokenKind::Uuid,
            &[r"\A([0-9a-fA-F]{8}(?:-[0-9a-fA-F]{4}){3}-[0-9a-fA-F]{12})"],
        ),
        // Dotted release first; two-component-plus-suffix second, rejecting
        // dashes that belong to an exponent.
        entry_checked(
            TokenKind::Version,
            &[
                (r"\A([0-9]+(?:\.[0-9]+\w*){2,}(?:-\w+)?)\b", None),
                (r"\A([0-9]+(?:\.[0-9]+\w*)+-\w+)\b", Some(version_suffix_ok)),
            ],
        ),
        entry(TokenKind::Octal, &[r"\A(-?0[0-7]+)\b"]),
        entry(TokenKind::Percent, &[r"\A(-?[0-9]+(?:\.[0-9]+)?[ ]*%)\b"]),
        entry(
            TokenKind::Number,
            &[r"\A(-?[0-9]+(?:\.[0-9]+)?(?:[eE][-+][0-9]+)?)\b(?:$|[^._\-]|[._\-](?:[^a-zA-Z]|$))"],
        ),
        entry(
            TokenKind::HexNumber,
            &[r"\A(-?(?:0x|[0-9])[0-9a-fA-F]+)\b(?:$|[^._\-]|[._\-](?:[^a-zA-Z]|$))"],
        ),
        entry(
            TokenKind::Email,
            &[r"\A([a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]+)\b"],
        ),
        entry(
            TokenKind::Constant,
            &[r"\A(true|True|TRUE|false|False|FALSE|None|null)\b"],
        ),
        entry(
            TokenKind::Word,
            &[r#"\A([a-zA-Z][a-z']+)(?:[\s()!*:;'"?,]|[.!,?]\s|$)"#],
        ),
        entry(
            TokenKind::Symbol,
            &[r#"\A([^";\s:=,(){}\[\]+#!@%^&*'?<>~`|\\]+(?:::[^";\s:=,(){}\[\]+#!@%^&*'?<>~`|\\]+)*)"#],
        ),
        entry(TokenKind::Line, &[r"\A(\r?\n|\r|;)"]),
        entry(TokenKind::Whitespace, &[r"\A([ \r\t\n]+)"]),
        entry(TokenKind::Dot, &[r"\A(\.)"]),
        entry(TokenKind::EscapedChar, &[r"\A(\\\.)"]),
        entry(TokenKind::Garbage, &[r"\A(.)"]),
    ]
});

/// Lazy token-span iterator over one line of text.
///
/// Restartable: a fresh scanner over the same text reproduces the same
/// sequence. The emitted spans are contiguous and exhaustive — their
/// concatenation reconstructs the input exactly.
pub struct DataScanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> DataScanner<'a> {
    pub fn new(input: &'a str) -> Self {
        DataScanner { input, pos: 0 }
    }

    /// The text this scanner was created over.
    pub fn input(&self) -> &'a str {
        self.input
    }
}

impl<'a> Iterator for DataScanner<'a> {
    type Item = TokenSpan;

    fn next(&mut self) -> Option<TokenSpan> {
        if self.pos >= self.input.len() {
            return None;
        }
        let rest = &self.input[self.pos..];

        for matcher in MATCHERS.iter() {
            for pattern in &matcher.patterns {
                let caps = match pattern.re.captures(rest) {
                    Some(caps) => caps,
                    None => continue,
                };
                let group = caps.get(1).unwrap_or_else(|| caps.get(0).unwrap());
                if group.end() == 0 {
                    continue;
                }
                if let Some(check) = pattern.check {
                    if !check(group.as_str()) {
                        continue;
                    }
                }
                let span = TokenSpan {
                    start: self.pos,
                    end: self.pos + group.end(),
                    kind: matcher.kind,
                };
                self.pos = span.end;
                return Some(span);
            }
        }

        // Unreachable while the table ends with `.`, but the scan must make
        // progress even on a defective table: emit one character of garbage.
        let width = rest.chars().next().map_or(1, char::len_utf8);
        let span = TokenSpan {
            start: self.pos,
            end: self.pos + width,
            kind: TokenKind::Garbage,
        };
        self.pos = span.end;
        Some(span)
    }
}
