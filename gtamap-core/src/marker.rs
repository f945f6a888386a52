use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::transform::{format_coordinates, round2};

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// A named entry of the marker color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerColor {
    /// `#rrggbb`.
    pub hex: &'static str,
    pub label: &'static str,
}

impl MarkerColor {
    pub fn rgb(&self) -> [u8; 3] {
        parse_hex_color(self.hex).unwrap_or([0x4d, 0x90, 0xfe])
    }
}

/// The colors offered by the add-marker and bulk-import dialogs.
pub const PALETTE: [MarkerColor; 8] = [
    MarkerColor { hex: "#4d90fe", label: "Blue" },
    MarkerColor { hex: "#ff3b30", label: "Red" },
    MarkerColor { hex: "#34c759", label: "Green" },
    MarkerColor { hex: "#ff9500", label: "Orange" },
    MarkerColor { hex: "#af52de", label: "Purple" },
    MarkerColor { hex: "#ffcc00", label: "Yellow" },
    MarkerColor { hex: "#ff2d55", label: "Pink" },
    MarkerColor { hex: "#5ac8fa", label: "Cyan" },
];

/// Color used for markers without one (and for map double-click markers).
pub const DEFAULT_COLOR: &str = PALETTE[0].hex;

/// Parse `#rrggbb` into its channels. Anything else is rejected.
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Source of marker ids. Injected into every path that creates markers.
pub trait IdGenerator {
    fn next_id(&mut self, created_at: i64) -> String;
}

/// Ids of the form `<created_at>_<seq>`.
///
/// `seq` never repeats within a generator, so markers committed in the same
/// millisecond (a bulk import, or two rapid imports) still get distinct ids.
/// The timestamp prefix keeps ids distinct across sessions.
#[derive(Debug, Default)]
pub struct MonotonicIds {
    seq: u64,
}

impl MonotonicIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for MonotonicIds {
    fn next_id(&mut self, created_at: i64) -> String {
        let id = format!("{created_at}_{}", self.seq);
        self.seq += 1;
        id
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

/// A user-placed point of interest. The only persisted entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Carried through persistence; no input path sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: i64,
}

impl Marker {
    /// Title for list and popup views.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// The marker's color, or the default palette color.
    pub fn rgb(&self) -> [u8; 3] {
        self.color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or_else(|| PALETTE[0].rgb())
    }

    pub fn formatted_coordinates(&self) -> String {
        format_coordinates(self.x, self.y)
    }
}

/// A marker that has not been committed to a store yet.
///
/// [`MarkerDraft::new`] is the single place the coordinate rounding policy
/// is applied; every creation path goes through it.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDraft {
    pub x: f64,
    pub y: f64,
    pub title: Option<String>,
    pub color: Option<String>,
}

impl MarkerDraft {
    pub fn new(x: f64, y: f64, title: Option<String>, color: Option<&str>) -> Self {
        let color = color.and_then(|c| {
            if parse_hex_color(c).is_some() {
                Some(c.to_ascii_lowercase())
            } else {
                warn!("Ignoring invalid marker color {c:?}");
                None
            }
        });
        Self {
            x: round2(x),
            y: round2(y),
            title,
            color,
        }
    }

    /// Give the draft an identity.
    pub fn commit(self, ids: &mut dyn IdGenerator, created_at: i64) -> Marker {
        Marker {
            id: ids.next_id(created_at),
            x: self.x,
            y: self.y,
            title: self.title,
            description: None,
            color: self.color,
            created_at,
        }
    }
}
