//! Extraction of coordinate tuples from free-form pasted text.
//!
//! Scripts and chat logs carry positions in a handful of notations. Each
//! notation is a [`TupleExtractor`]; the [`CoordinateParser`] runs them in
//! priority order and keeps the first one that yields a usable tuple.

use tracing::debug;

use crate::error::MarkerError;
use crate::marker::{IdGenerator, Marker, MarkerDraft};

// ---------------------------------------------------------------------------
// Extraction strategies
// ---------------------------------------------------------------------------

/// Finds the bodies of coordinate tuples in a block of text.
///
/// Returns the text between the delimiters of every match, left to right,
/// without overlaps. Numeric validation happens later.
pub trait TupleExtractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Lua table literals: `{-218.78, -1703.47, 33.59, 218.73}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceTuples;

impl TupleExtractor for BraceTuples {
    fn name(&self) -> &'static str {
        "brace"
    }

    fn extract<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let bytes = text.as_bytes();
        let mut bodies = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'{' {
                i += 1;
                continue;
            }
            match text[i + 1..].find('}') {
                // No closing brace anywhere further on: nothing left to match.
                None => break,
                // `{}` has no body.
                Some(0) => i += 1,
                Some(len) => {
                    let end = i + 1 + len;
                    bodies.push(&text[i + 1..end]);
                    i = end + 1;
                }
            }
        }
        bodies
    }
}

/// Engine vector constructors: `vector3(-218.78, -1703.47, 33.59)`.
///
/// The identifier is matched case-insensitively and may be followed by
/// whitespace before the parenthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vector3Calls;

const VECTOR3: &[u8] = b"vector3";

impl TupleExtractor for Vector3Calls {
    fn name(&self) -> &'static str {
        "vector3"
    }

    fn extract<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let bytes = text.as_bytes();
        let mut bodies = Vec::new();
        let mut i = 0;
        while i + VECTOR3.len() <= bytes.len() {
            if !bytes[i..i + VECTOR3.len()].eq_ignore_ascii_case(VECTOR3) {
                i += 1;
                continue;
            }
            let after_ident = i + VECTOR3.len();
            let rest = &text[after_ident..];
            let open = after_ident + (rest.len() - rest.trim_start().len());
            if text[open..].starts_with('(') {
                match text[open + 1..].find(')') {
                    None => break,
                    Some(0) => {}
                    Some(len) => {
                        let close = open + 1 + len;
                        bodies.push(&text[open + 1..close]);
                        i = close + 1;
                        continue;
                    }
                }
            }
            i += 1;
        }
        bodies
    }
}

// ---------------------------------------------------------------------------
// Number handling
// ---------------------------------------------------------------------------

/// Parse the longest numeric prefix of `field`, after leading whitespace.
///
/// `"12.5abc"` gives `12.5`; `"abc"` gives `None`. Non-finite results
/// (overflowing exponents) are rejected.
pub fn parse_leading_float(field: &str) -> Option<f64> {
    let s = field.trim_start();
    let b = s.as_bytes();
    let mut end = 0;

    if end < b.len() && (b[end] == b'+' || b[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < b.len() && b[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < b.len() && b[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < b.len() && b[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < b.len() && (b[end] == b'e' || b[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < b.len() && (b[exp_end] == b'+' || b[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < b.len() && b[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a tuple body on commas and keep the fields that read as numbers.
pub fn tuple_numbers(body: &str) -> Vec<f64> {
    body.split(',').filter_map(parse_leading_float).collect()
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Runs tuple extractors in priority order; the first one that yields at
/// least one tuple with two numbers wins.
pub struct CoordinateParser {
    extractors: Vec<Box<dyn TupleExtractor>>,
}

impl Default for CoordinateParser {
    /// Brace tables first, then `vector3(...)` calls.
    fn default() -> Self {
        Self::new(vec![Box::new(BraceTuples), Box::new(Vector3Calls)])
    }
}

impl CoordinateParser {
    pub fn new(extractors: Vec<Box<dyn TupleExtractor>>) -> Self {
        Self { extractors }
    }

    /// Append a strategy with the lowest priority.
    pub fn with_extractor(mut self, extractor: impl TupleExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Turn `raw` into drafts titled `base_title`, `base_title #2`, ...
    ///
    /// Only the first two numbers of each tuple are used (x, y); elevation
    /// and heading are ignored. Tuples with fewer than two numbers are
    /// skipped. No matches is an empty vec, not an error.
    pub fn parse(&self, raw: &str, base_title: &str, color: Option<&str>) -> Vec<MarkerDraft> {
        for extractor in &self.extractors {
            let drafts = drafts_from(extractor.extract(raw), base_title, color);
            if !drafts.is_empty() {
                debug!(
                    notation = extractor.name(),
                    count = drafts.len(),
                    "Parsed coordinate tuples"
                );
                return drafts;
            }
        }
        Vec::new()
    }

    /// How many markers [`import`](Self::import) would create.
    pub fn preview_count(&self, raw: &str) -> usize {
        self.parse(raw, "", None).len()
    }

    /// Validate the batch title, parse, and commit every draft.
    pub fn import(
        &self,
        raw: &str,
        title: &str,
        color: Option<&str>,
        ids: &mut dyn IdGenerator,
        created_at: i64,
    ) -> crate::Result<Vec<Marker>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(MarkerError::MissingTitle);
        }
        let drafts = self.parse(raw, title, color);
        if drafts.is_empty() {
            return Err(MarkerError::NoMatchesFound);
        }
        Ok(drafts
            .into_iter()
            .map(|d| d.commit(ids, created_at))
            .collect())
    }
}

fn drafts_from(bodies: Vec<&str>, base_title: &str, color: Option<&str>) -> Vec<MarkerDraft> {
    let mut drafts = Vec::new();
    for body in bodies {
        let numbers = tuple_numbers(body);
        let [x, y, ..] = numbers[..] else {
            continue;
        };
        let title = if drafts.is_empty() {
            base_title.to_string()
        } else {
            format!("{base_title} #{}", drafts.len() + 1)
        };
        drafts.push(MarkerDraft::new(x, y, Some(title), color));
    }
    drafts
}

/// Parse with the default notations and commit the result.
pub fn import_batch(
    raw: &str,
    title: &str,
    color: Option<&str>,
    ids: &mut dyn IdGenerator,
    created_at: i64,
) -> crate::Result<Vec<Marker>> {
    CoordinateParser::default().import(raw, title, color, ids, created_at)
}
