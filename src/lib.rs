//! # loglex
//!
//! Text-annotation pipeline for a terminal log viewer: scrub raw,
//! control-sequence-laden log lines into clean displayable text plus
//! style/role annotations, and classify the result into a stream of lexical
//! tokens for structure detection and syntax highlighting.
//!
//! The two components are independent and composable:
//!
//! - [`ansi::scrub`] strips ANSI CSI sequences and legacy overstrike runs
//!   from a byte buffer in place, emitting style, role, and origin-offset
//!   annotations.
//! - [`scanner::DataScanner`] walks plain text with a fixed, priority-ordered
//!   pattern table and yields contiguous, exhaustive [`token::TokenSpan`]s.
//!
//! Typical flow: raw line → `scrub` → clean text + annotations →
//! `DataScanner` → token stream → external grouping/highlighting consumers.
//!
//! Both components are synchronous and call-scoped: the only persistent
//! state is the immutable pattern tables, so independent lines can be
//! processed from any number of threads without synchronization.

pub mod annotation;
pub mod ansi;
pub mod scanner;
pub mod token;

pub use annotation::{Annotation, AnnotationList, Payload, Role, TextStyle};
pub use ansi::{scrub, ScrubError};
pub use scanner::DataScanner;
pub use token::{name_for_raw, TokenKind, TokenSpan};
