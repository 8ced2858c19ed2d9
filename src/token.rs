//! Token kind vocabulary and span type shared by the scanner and its
//! consumers.
//!
//! The terminal kinds (everything up to and including [`TokenKind::Garbage`])
//! are produced directly by the scanner, in the priority order of their
//! discriminants. `Any` and the nonterminal kinds after it belong to the
//! external grouping grammar: they are never emitted by the scanner but share
//! the same numeric namespace so highlight rules and grammar tables can refer
//! to every kind through one stable name lookup.

use serde::Serialize;

/// Every lexical category known to the pipeline.
///
/// Discriminant order is load-bearing for the terminals: it is the priority
/// order of the scanner's pattern table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(i32)]
pub enum TokenKind {
    Quoted = 0,
    Url,
    Path,
    Mac,
    Date,
    Time,
    Ipv6,
    HexDump,
    XmlDecl,
    XmlEmptyTag,
    XmlOpenTag,
    XmlCloseTag,
    H1,
    H2,
    H3,
    Colon,
    Equals,
    Comma,
    Semi,
    EmptyPair,
    LCurly,
    RCurly,
    LSquare,
    RSquare,
    LParen,
    RParen,
    LAngle,
    RAngle,
    Ipv4,
    Uuid,
    Version,
    Octal,
    Percent,
    Number,
    HexNumber,
    Email,
    Constant,
    Word,
    Symbol,
    Line,
    Whitespace,
    Dot,
    EscapedChar,
    Garbage,
    /// Wildcard used by external grammar rules; never produced by the scanner.
    Any,
    // Nonterminal kinds owned by the external grouping pass.
    Key,
    Pair,
    Value,
    Row,
    Unit,
    Measurement,
    Variable,
    Range,
    DateTime,
    Group,
}

/// Short stable names, indexed by discriminant. Used for logging and for
/// config keys that map highlight rules to token kinds.
const NAMES: &[&str] = &[
    "quot", "url", "path", "mac", "date", "time", "ipv6", "hexd", "xmld", "xmlt", "xmlo", "xmlc",
    "h1", "h2", "h3", "coln", "eq", "comm", "semi", "empt", "lcurly", "rcurly", "lsquare",
    "rsquare", "lparen", "rparen", "langle", "rangle", "ipv4", "uuid", "vers", "oct", "pcnt",
    "num", "hex", "mail", "cnst", "word", "sym", "line", "wspc", "dot", "escc", "gbg", "any",
    "key", "pair", "val", "row", "unit", "meas", "var", "rang", "dt", "grp",
];

impl TokenKind {
    /// Number of terminal kinds, i.e. kinds the scanner itself can emit.
    pub const TERMINAL_MAX: i32 = TokenKind::Garbage as i32 + 1;

    /// Short stable name for this kind.
    pub fn name(self) -> &'static str {
        NAMES[self as i32 as usize]
    }

    /// True for kinds the scanner can emit.
    pub fn is_terminal(self) -> bool {
        (self as i32) < Self::TERMINAL_MAX
    }
}

/// Name lookup over raw kind values; out-of-range values (including the
/// negative "invalid" sentinels used by grammar tables) map to `"inv"`.
pub fn name_for_raw(raw: i32) -> &'static str {
    if raw < 0 || raw as usize >= NAMES.len() {
        "inv"
    } else {
        NAMES[raw as usize]
    }
}

/// One classified `[start, end)` byte span over a scanned line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

impl TokenSpan {
    /// The slice of the scanned text this span covers.
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_cover_every_discriminant() {
        assert_eq!(NAMES.len(), TokenKind::Group as i32 as usize + 1);
        assert_eq!(TokenKind::Quoted.name(), "quot");
        assert_eq!(TokenKind::Garbage.name(), "gbg");
        assert_eq!(TokenKind::Any.name(), "any");
        assert_eq!(TokenKind::Group.name(), "grp");
    }

    #[test]
    fn raw_lookup_maps_out_of_range_to_inv() {
        assert_eq!(name_for_raw(-1), "inv");
        assert_eq!(name_for_raw(TokenKind::Group as i32 + 1), "inv");
        assert_eq!(name_for_raw(TokenKind::Ipv4 as i32), "ipv4");
    }

    #[test]
    fn terminal_boundary_sits_after_garbage() {
        assert!(TokenKind::Garbage.is_terminal());
        assert!(!TokenKind::Any.is_terminal());
        assert_eq!(TokenKind::TERMINAL_MAX, 44);
    }
}
