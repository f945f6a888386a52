//! Validation for the single-marker dialog and its paste shortcut.

use crate::error::MarkerError;
use crate::marker::{IdGenerator, Marker, MarkerDraft};

/// Parse one typed coordinate field.
fn parse_axis(axis: &'static str, text: &str) -> crate::Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MarkerError::InvalidCoordinate {
            axis,
            input: text.to_string(),
        })
}

/// Build a marker from the add-marker dialog fields.
///
/// Coordinates are checked before the title, so a form with both problems
/// reports the coordinate.
pub fn build_marker(
    x_text: &str,
    y_text: &str,
    title: &str,
    color: Option<&str>,
    ids: &mut dyn IdGenerator,
    created_at: i64,
) -> crate::Result<Marker> {
    let x = parse_axis("x", x_text)?;
    let y = parse_axis("y", y_text)?;
    let title = title.trim();
    if title.is_empty() {
        return Err(MarkerError::MissingTitle);
    }
    Ok(MarkerDraft::new(x, y, Some(title.to_string()), color).commit(ids, created_at))
}

// ---------------------------------------------------------------------------
// Paste shorthand
// ---------------------------------------------------------------------------

/// The two coordinate texts recognised in a paste, as they appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastedPair {
    pub x: String,
    pub y: String,
}

/// Length in bytes of a number `-?\d+\.?\d*` at the start of `s`.
fn scan_number(s: &str) -> Option<usize> {
    let b = s.as_bytes();
    let mut end = usize::from(b.first() == Some(&b'-'));
    let digits_start = end;
    while end < b.len() && b[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    if end < b.len() && b[end] == b'.' {
        end += 1;
        while end < b.len() && b[end].is_ascii_digit() {
            end += 1;
        }
    }
    Some(end)
}

/// Length in bytes of a run of commas and whitespace at the start of `s`.
fn scan_separator(s: &str) -> Option<usize> {
    let len = s
        .char_indices()
        .find(|&(_, c)| c != ',' && !c.is_whitespace())
        .map_or(s.len(), |(i, _)| i);
    (len > 0).then_some(len)
}

/// `<number><separator><number>` at the start of `s`.
fn scan_pair(s: &str) -> Option<PastedPair> {
    let x_len = scan_number(s)?;
    let sep_len = scan_separator(&s[x_len..])?;
    let y_start = x_len + sep_len;
    let y_len = scan_number(&s[y_start..])?;
    Some(PastedPair {
        x: s[..x_len].to_string(),
        y: s[y_start..y_start + y_len].to_string(),
    })
}

/// `vector3(<number><separator><number>` at the start of `s`.
fn scan_vector3(s: &str) -> Option<PastedPair> {
    const PREFIX: &str = "vector3(";
    let head = s.get(..PREFIX.len())?;
    if !head.eq_ignore_ascii_case(PREFIX) {
        return None;
    }
    scan_pair(&s[PREFIX.len()..])
}

/// Recognise a coordinate pair in pasted text.
///
/// A bare `x, y` (or `x y`) pair anywhere in the text is tried first, then a
/// `vector3(x, y` prefix. Returns `None` when neither appears, in which case
/// the paste should go through unchanged.
pub fn parse_paste_shorthand(text: &str) -> Option<PastedPair> {
    let matchers: [fn(&str) -> Option<PastedPair>; 2] = [scan_pair, scan_vector3];
    matchers.iter().find_map(|matcher| {
        text.char_indices()
            .find_map(|(start, _)| matcher(&text[start..]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MonotonicIds;

    fn pair(x: &str, y: &str) -> Option<PastedPair> {
        Some(PastedPair {
            x: x.into(),
            y: y.into(),
        })
    }

    #[test]
    fn build_marker_valid() {
        let mut ids = MonotonicIds::new();
        let m = build_marker(" 100.456 ", "-200", "  Garage ", Some("#ff9500"), &mut ids, 5)
            .unwrap();
        assert_eq!(m.x, 100.46);
        assert_eq!(m.y, -200.0);
        assert_eq!(m.title.as_deref(), Some("Garage"));
        assert_eq!(m.color.as_deref(), Some("#ff9500"));
        assert_eq!(m.created_at, 5);
    }

    #[test]
    fn build_marker_rejects_bad_coordinates() {
        let mut ids = MonotonicIds::new();
        for (x, y, axis) in [("abc", "1", "x"), ("1", "", "y"), ("12abc", "1", "x"), ("1", "NaN", "y")] {
            match build_marker(x, y, "T", None, &mut ids, 0) {
                Err(MarkerError::InvalidCoordinate { axis: a, .. }) => assert_eq!(a, axis),
                other => panic!("expected InvalidCoordinate for {x:?},{y:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn build_marker_checks_coordinates_before_title() {
        let mut ids = MonotonicIds::new();
        let err = build_marker("bad", "1", "", None, &mut ids, 0).unwrap_err();
        assert!(matches!(err, MarkerError::InvalidCoordinate { axis: "x", .. }));
        let err = build_marker("1", "2", "   ", None, &mut ids, 0).unwrap_err();
        assert!(matches!(err, MarkerError::MissingTitle));
    }

    #[test]
    fn paste_plain_pair() {
        assert_eq!(parse_paste_shorthand("-218.78, -1703.47"), pair("-218.78", "-1703.47"));
        assert_eq!(parse_paste_shorthand("12 34"), pair("12", "34"));
        assert_eq!(parse_paste_shorthand("pos: 5.,\t6"), pair("5.", "6"));
    }

    #[test]
    fn paste_pair_from_vector3_text() {
        assert_eq!(
            parse_paste_shorthand("vector3(-218.78, -1703.47, 33.59)"),
            pair("-218.78", "-1703.47")
        );
        assert_eq!(parse_paste_shorthand("VECTOR3(1 2)"), pair("1", "2"));
    }

    #[test]
    fn paste_pair_takes_first_match() {
        assert_eq!(parse_paste_shorthand("{1, 2, 3}"), pair("1", "2"));
    }

    #[test]
    fn paste_without_pair_is_none() {
        assert_eq!(parse_paste_shorthand("hello"), None);
        assert_eq!(parse_paste_shorthand("42"), None);
        assert_eq!(parse_paste_shorthand("1;2"), None);
        assert_eq!(parse_paste_shorthand(""), None);
    }

    #[test]
    fn vector3_prefix_matcher() {
        assert_eq!(scan_vector3("Vector3(7,8)"), pair("7", "8"));
        assert_eq!(scan_vector3("vector3 (7,8)"), None);
    }
}
