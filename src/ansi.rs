//! Escape-sequence scrubber and ANSI fragment constants.
//!
//! [`scrub`] removes two control constructs from a line of raw log text while
//! keeping every recorded annotation range consistent with the edited buffer:
//! 1. CSI sequences (`ESC [ params letter`), dispatched on the terminating
//!    letter — `m` opens a style run, `C`/`H` pad with literal spaces, `O` is
//!    the private role-marker extension, anything else is deleted silently.
//! 2. Overstrike runs (character, backspace, character), the legacy
//!    bold/underline encoding emitted by old formatters.
//!
//! Alongside the deletions the scrubber appends origin-offset records so a
//! consumer can map a post-edit offset back to the original text:
//! `original_offset = current_offset + removed`.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::annotation::{
    close_open_runs, shift_annotations, Annotation, AnnotationList, Payload, Role, TextStyle,
};

/// Start of a control sequence.
pub const ANSI_CSI: &str = "\x1b[";
/// Reset all attributes.
pub const ANSI_NORM: &str = "\x1b[0m";
/// Start of a bold run.
pub const ANSI_BOLD_START: &str = "\x1b[1m";
/// Start of an underline run.
pub const ANSI_UNDERLINE_START: &str = "\x1b[4m";

/// Foreground fragment for a base color index (0-7).
pub fn ansi_color(index: u8) -> String {
    format!("\x1b[3{}m", index)
}

/// The private `ESC [ code O` fragment consumed by the `O` dispatch; lets
/// formatting layers round-trip semantic roles through plain text.
pub fn role_marker(role: Role) -> String {
    format!("\x1b[{}O", role.code())
}

/// Populate a template-variable mapping with the literal escape fragments.
/// A fixed, static table for the templating layer outside this crate.
pub fn add_ansi_vars(vars: &mut BTreeMap<String, String>) {
    vars.insert("ansi_csi".into(), ANSI_CSI.into());
    vars.insert("ansi_norm".into(), ANSI_NORM.into());
    vars.insert("ansi_bold".into(), ANSI_BOLD_START.into());
    vars.insert("ansi_underline".into(), ANSI_UNDERLINE_START.into());
    for (index, name) in [
        "ansi_black",
        "ansi_red",
        "ansi_green",
        "ansi_yellow",
        "ansi_blue",
        "ansi_magenta",
        "ansi_cyan",
        "ansi_white",
    ]
    .iter()
    .enumerate()
    {
        vars.insert((*name).into(), ansi_color(index as u8));
    }
}

/// Errors that can occur while scrubbing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubError {
    /// An overstrike run contained bytes that do not decode as UTF-8. The
    /// buffer is left in its partially edited state and must be discarded.
    InvalidUtf8 { offset: usize },
}

impl fmt::Display for ScrubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrubError::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 in overstrike run at byte {}", offset)
            }
        }
    }
}

impl std::error::Error for ScrubError {}

/// Combined pattern for both constructs. The CSI alternative captures the
/// parameter string and the terminating letter; the overstrike alternative
/// matches whole codepoint triples, with a non-Unicode escape hatch so
/// invalid high bytes still land inside the match (and get reported by the
/// decoder) instead of being skipped over.
static SCRUB_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\x1b\[([\d=;?]*)([a-zA-Z])|(?:(?:[^\x08]|(?-u:[\x80-\xFF]))\x08(?:[^\x08]|(?-u:[\x80-\xFF])))+",
    )
    .expect("static scrub pattern must compile")
});

/// What one regex match told us, copied out so the buffer can be mutated.
struct MatchInfo {
    start: usize,
    end: usize,
    /// Parameter range and terminating letter for the CSI alternative;
    /// `None` means the overstrike alternative matched.
    csi: Option<(usize, usize, u8)>,
}

/// Remove every recognized control construct from `buffer` in place.
///
/// When `annotations` is given, style, role, and origin-offset ranges
/// consistent with the final buffer contents are appended to it. NUL bytes
/// are replaced with spaces up front since they would truncate downstream
/// rendering.
pub fn scrub(
    buffer: &mut Vec<u8>,
    mut annotations: Option<&mut AnnotationList>,
) -> Result<(), ScrubError> {
    for byte in buffer.iter_mut() {
        if *byte == 0 {
            *byte = b' ';
        }
    }

    let mut origin_offset = 0usize;
    let mut last_origin_end = 0usize;
    let mut next_offset = 0usize;
    let mut edited = false;

    loop {
        let info = match SCRUB_PATTERN.captures_at(buffer, next_offset) {
            Some(caps) => {
                let whole = caps.get(0).expect("capture 0 always present");
                MatchInfo {
                    start: whole.start(),
                    end: whole.end(),
                    csi: caps
                        .get(2)
                        .map(|letter| {
                            let params = caps.get(1).expect("params group accompanies letter");
                            (params.start(), params.end(), letter.as_bytes()[0])
                        }),
                }
            }
            None => break,
        };
        edited = true;

        match info.csi {
            None => {
                scrub_overstrike(
                    buffer,
                    annotations.as_deref_mut(),
                    &info,
                    &mut origin_offset,
                    &mut last_origin_end,
                )?;
                next_offset = last_origin_end;
            }
            Some((pstart, pend, letter)) => {
                scrub_csi(
                    buffer,
                    annotations.as_deref_mut(),
                    &info,
                    (pstart, pend, letter),
                    &mut origin_offset,
                    &mut last_origin_end,
                );
                next_offset = info.start;
            }
        }
    }

    if edited {
        if let Some(list) = annotations.as_deref_mut() {
            list.push(Annotation::new(
                last_origin_end,
                Some(buffer.len()),
                Payload::OriginOffset(origin_offset),
            ));
        }
    }
    Ok(())
}

/// Decode the next codepoint of an overstrike run.
fn next_codepoint(bytes: &[u8], run_start: usize) -> Result<(char, &[u8]), ScrubError> {
    let (ch, size) = bstr::decode_utf8(bytes);
    match ch {
        Some(ch) => Ok((ch, &bytes[size..])),
        None => {
            log::error!("invalid UTF-8 in overstrike run at byte {}", run_start);
            Err(ScrubError::InvalidUtf8 { offset: run_start })
        }
    }
}

/// Decode one (char, backspace, char) run, splice the decoded characters
/// over the match, and record bold/underline ranges plus the origin-offset
/// span for the compacted text.
fn scrub_overstrike(
    buffer: &mut Vec<u8>,
    annotations: Option<&mut AnnotationList>,
    info: &MatchInfo,
    origin_offset: &mut usize,
    last_origin_end: &mut usize,
) -> Result<(), ScrubError> {
    let run = buffer[info.start..info.end].to_vec();
    let mut decoded = String::new();
    let mut flushed: Vec<Annotation> = Vec::new();
    let mut bold_range: Option<(usize, usize)> = None;
    let mut ul_range: Option<(usize, usize)> = None;

    let mut rest: &[u8] = &run;
    while !rest.is_empty() {
        let (lhs, after_lhs) = next_codepoint(rest, info.start)?;
        let (_bs, after_bs) = next_codepoint(after_lhs, info.start)?;
        let (rhs, after_rhs) = next_codepoint(after_bs, info.start)?;
        rest = after_rhs;

        let pos = info.start + decoded.len();
        if lhs == '_' || rhs == '_' {
            // Style change flushes the open bold run.
            if let Some((start, end)) = bold_range.take() {
                flushed.push(Annotation::new(
                    start,
                    Some(end),
                    Payload::Style(TextStyle::bold()),
                ));
            }
            decoded.push(if lhs == '_' { rhs } else { lhs });
            let end = info.start + decoded.len();
            ul_range = Some(match ul_range {
                Some((start, _)) => (start, end),
                None => (pos, end),
            });
        } else {
            if let Some((start, end)) = ul_range.take() {
                flushed.push(Annotation::new(
                    start,
                    Some(end),
                    Payload::Style(TextStyle::underline()),
                ));
            }
            decoded.push(lhs);
            let end = info.start + decoded.len();
            bold_range = Some(match bold_range {
                Some((start, _)) => (start, end),
                None => (pos, end),
            });
        }
    }

    let output_len = decoded.len();
    let erased = (info.end - info.start) - output_len;
    buffer.splice(info.start..info.end, decoded.into_bytes());

    if let Some(list) = annotations {
        list.extend(flushed);
        list.push(Annotation::new(
            *last_origin_end,
            Some(info.start + output_len),
            Payload::OriginOffset(*origin_offset),
        ));
        if let Some((start, end)) = ul_range {
            list.push(Annotation::new(
                start,
                Some(end),
                Payload::Style(TextStyle::underline()),
            ));
        }
        if let Some((start, end)) = bold_range {
            list.push(Annotation::new(
                start,
                Some(end),
                Payload::Style(TextStyle::bold()),
            ));
        }
    }

    *last_origin_end = info.start + output_len;
    *origin_offset += erased;
    Ok(())
}

/// Dispatch a CSI sequence on its terminating letter, delete it (replacing
/// it with layout padding where `C`/`H` ask for it), and fix up the
/// annotation list.
fn scrub_csi(
    buffer: &mut Vec<u8>,
    annotations: Option<&mut AnnotationList>,
    info: &MatchInfo,
    (pstart, pend, letter): (usize, usize, u8),
    origin_offset: &mut usize,
    last_origin_end: &mut usize,
) {
    let params = String::from_utf8_lossy(&buffer[pstart..pend]).into_owned();
    let mut style = TextStyle::default();
    let mut role = None;
    let mut has_attrs = false;
    let mut pad_spaces = 0usize;

    match letter {
        b'm' => {
            for part in params.split(';') {
                let code = match part.parse::<i32>() {
                    Ok(code) => code,
                    Err(_) => {
                        if !part.is_empty() {
                            log::debug!("ignoring malformed SGR parameter {:?}", part);
                        }
                        continue;
                    }
                };
                // Bright colors map onto the base range with standout set.
                let code = if (90..=97).contains(&code) {
                    style.standout = true;
                    code - 60
                } else {
                    code
                };
                match code {
                    1 => style.bold = true,
                    2 => style.dim = true,
                    4 => style.underline = true,
                    7 => style.reverse = true,
                    30..=37 => style.fg = Some((code - 30) as u8),
                    40..=47 => style.bg = Some((code - 40) as u8),
                    _ => {}
                }
            }
            // Even an attribute-free parameter list closes open runs.
            has_attrs = true;
        }
        b'C' => {
            if let Ok(count) = params.parse::<usize>() {
                pad_spaces = count;
            }
        }
        b'H' => {
            let mut parts = params.splitn(2, ';');
            let row = parts.next().and_then(|p| p.parse::<usize>().ok());
            let col = parts.next().and_then(|p| p.parse::<usize>().ok());
            if let (Some(_row), Some(col)) = (row, col) {
                // Approximate absolute placement with literal padding.
                if col > 1 && (col - 1) > info.start {
                    pad_spaces = (col - 1) - info.start;
                }
            }
        }
        b'O' => match params.parse::<i32>() {
            Ok(code) => {
                if let Some(found) = Role::from_code(code) {
                    role = Some(found);
                    has_attrs = true;
                }
            }
            Err(_) => log::debug!("ignoring malformed role marker {:?}", params),
        },
        _ => {}
    }

    let seq_len = info.end - info.start;
    buffer.splice(info.start..info.end, std::iter::repeat(b' ').take(pad_spaces));

    if let Some(list) = annotations {
        shift_annotations(list, info.start, seq_len);
        if has_attrs {
            close_open_runs(list, info.start);
            if !style.is_empty() {
                list.push(Annotation::new(info.start, None, Payload::Style(style)));
            }
            if let Some(role) = role {
                list.push(Annotation::new(info.start, None, Payload::Role(role)));
            }
        }
        list.push(Annotation::new(
            *last_origin_end,
            Some(info.start),
            Payload::OriginOffset(*origin_offset),
        ));
    }
    *last_origin_end = info.start;
    *origin_offset += seq_len;
}
