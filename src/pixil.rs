//! `.pixil` pixel-art decoding.
//!
//! A `.pixil` resource is a JSON document with a `frames` field: a list of
//! 2D grids whose cells index the fixed 9-colour `PALETTE`.  Decoding is
//! pure; the same bytes always produce the same `SpriteDefinition`.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::ResourceLoadError;

// ── Palette ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

pub const BLACK: u8 = 0;
pub const WHITE: u8 = 1;
pub const RED: u8 = 2;
pub const GREEN: u8 = 3;
pub const BLUE: u8 = 4;
pub const YELLOW: u8 = 5;
pub const PINK: u8 = 6;
pub const LIGHT_BLUE: u8 = 7;
pub const PURPLE: u8 = 8;

pub const PALETTE: [Rgb; 9] = [
    Rgb::new(0, 0, 0),
    Rgb::new(255, 255, 255),
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 192, 203),
    Rgb::new(173, 216, 230),
    Rgb::new(128, 0, 128),
];

/// Map a colour index to RGB.  Unknown indices are black.
pub fn palette_color(index: u8) -> Rgb {
    PALETTE
        .get(index as usize)
        .copied()
        .unwrap_or(PALETTE[BLACK as usize])
}

// ── Frames ────────────────────────────────────────────────────────────────────

/// One animation frame: rows of colour indices, all rows the same length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    rows: Vec<Vec<u8>>,
}

impl Frame {
    pub fn width(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// Colour index at (`col`, `row`), or `None` outside the grid.
    pub fn cell(&self, col: usize, row: usize) -> Option<u8> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }
}

/// An immutable, ordered set of equally sized frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteDefinition {
    frames: Vec<Frame>,
}

impl SpriteDefinition {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[index % self.frames.len()]
    }

    /// (columns, rows) shared by every frame.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.frames[0].width(), self.frames[0].height())
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PixilDocument {
    #[serde(default)]
    frames: Vec<Vec<Vec<i64>>>,
}

fn to_index(cell: i64) -> u8 {
    // Out-of-range values fall outside the palette either way; 0 keeps them black.
    u8::try_from(cell).unwrap_or(BLACK)
}

/// Decode a `.pixil` document.
pub fn decode_pixil(text: &str) -> Result<SpriteDefinition, ResourceLoadError> {
    let doc: PixilDocument = serde_json::from_str(text)?;
    if doc.frames.is_empty() {
        return Err(ResourceLoadError::NoFrames);
    }

    let mut frames: Vec<Frame> = Vec::with_capacity(doc.frames.len());
    for (fi, raw) in doc.frames.into_iter().enumerate() {
        let width = raw.first().map(|r| r.len()).unwrap_or(0);
        if width == 0 {
            return Err(ResourceLoadError::EmptyFrame { frame: fi });
        }
        if let Some(ri) = raw.iter().position(|r| r.len() != width) {
            return Err(ResourceLoadError::RaggedFrame { frame: fi, row: ri });
        }
        let frame = Frame {
            rows: raw
                .into_iter()
                .map(|row| row.into_iter().map(to_index).collect())
                .collect(),
        };
        if let Some(first) = frames.first() {
            if first.width() != frame.width() || first.height() != frame.height() {
                return Err(ResourceLoadError::MismatchedFrames { frame: fi });
            }
        }
        frames.push(frame);
    }

    Ok(SpriteDefinition { frames })
}

/// Read and decode a `.pixil` file.
pub fn load_pixil_file(path: &Path) -> Result<SpriteDefinition, ResourceLoadError> {
    let text = std::fs::read_to_string(path)?;
    decode_pixil(&text)
}

/// Load every named resource under `dir`, skipping (and logging) the ones
/// that fail.  The result may be empty.
pub fn load_sprite_set(dir: &Path, names: &[String]) -> Vec<Arc<SpriteDefinition>> {
    let mut loaded = Vec::new();
    for name in names {
        let path = dir.join(name);
        match load_pixil_file(&path) {
            Ok(def) => {
                log::info!(
                    "loaded sprite {} ({} frames, {}x{})",
                    name,
                    def.frame_count(),
                    def.dimensions().0,
                    def.dimensions().1
                );
                loaded.push(Arc::new(def));
            }
            Err(e) => log::warn!("skipping sprite {}: {}", path.display(), e),
        }
    }
    loaded
}
