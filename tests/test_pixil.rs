use std::path::Path;

use space_invader::error::ResourceLoadError;
use space_invader::pixil::*;

const TWO_FRAMES: &str = r#"{
    "name": "blinker",
    "frames": [
        [[1, 0, 2], [0, 3, 0]],
        [[0, 4, 0], [5, 0, 6]]
    ]
}"#;

// ── Palette ───────────────────────────────────────────────────────────────────

#[test]
fn palette_has_nine_fixed_colours() {
    assert_eq!(PALETTE.len(), 9);
    assert_eq!(palette_color(BLACK), Rgb::new(0, 0, 0));
    assert_eq!(palette_color(WHITE), Rgb::new(255, 255, 255));
    assert_eq!(palette_color(PINK), Rgb::new(255, 192, 203));
    assert_eq!(palette_color(LIGHT_BLUE), Rgb::new(173, 216, 230));
    assert_eq!(palette_color(PURPLE), Rgb::new(128, 0, 128));
}

#[test]
fn unknown_palette_index_is_black() {
    assert_eq!(palette_color(9), palette_color(BLACK));
    assert_eq!(palette_color(255), palette_color(BLACK));
}

// ── decode_pixil ──────────────────────────────────────────────────────────────

#[test]
fn decode_reads_frames_in_order() {
    let def = decode_pixil(TWO_FRAMES).unwrap();
    assert_eq!(def.frame_count(), 2);
    assert_eq!(def.dimensions(), (3, 2));
    assert_eq!(def.frames()[0].rows()[0], vec![1, 0, 2]);
    assert_eq!(def.frames()[1].cell(2, 1), Some(6));
    assert_eq!(def.frames()[1].cell(3, 1), None);
}

#[test]
fn frame_lookup_wraps_around() {
    let def = decode_pixil(TWO_FRAMES).unwrap();
    assert_eq!(def.frame(2), &def.frames()[0]);
    assert_eq!(def.frame(3), &def.frames()[1]);
}

#[test]
fn decode_is_deterministic() {
    assert_eq!(decode_pixil(TWO_FRAMES).unwrap(), decode_pixil(TWO_FRAMES).unwrap());
}

#[test]
fn decode_keeps_unknown_indices_lenient() {
    let def = decode_pixil(r#"{"frames": [[[9, -3, 400]]]}"#).unwrap();
    let frame = &def.frames()[0];
    // 9 survives as an index but draws black; out-of-byte values become 0
    assert_eq!(frame.rows()[0], vec![9, 0, 0]);
    for col in 0..3 {
        assert_eq!(palette_color(frame.cell(col, 0).unwrap()), palette_color(BLACK));
    }
}

#[test]
fn decode_without_frames_field_has_no_frames() {
    assert!(matches!(decode_pixil("{}"), Err(ResourceLoadError::NoFrames)));
    assert!(matches!(
        decode_pixil(r#"{"frames": []}"#),
        Err(ResourceLoadError::NoFrames)
    ));
}

#[test]
fn decode_rejects_malformed_json() {
    assert!(matches!(
        decode_pixil("{\"frames\": [[[1, 2"),
        Err(ResourceLoadError::Malformed(_))
    ));
    assert!(matches!(
        decode_pixil(r#"{"frames": "nope"}"#),
        Err(ResourceLoadError::Malformed(_))
    ));
}

#[test]
fn decode_rejects_ragged_rows() {
    let err = decode_pixil(r#"{"frames": [[[1, 1], [1]]]}"#).unwrap_err();
    assert!(matches!(err, ResourceLoadError::RaggedFrame { frame: 0, row: 1 }));
}

#[test]
fn decode_rejects_frames_of_different_size() {
    let err = decode_pixil(r#"{"frames": [[[1, 1]], [[1, 1], [1, 1]]]}"#).unwrap_err();
    assert!(matches!(err, ResourceLoadError::MismatchedFrames { frame: 1 }));
}

#[test]
fn decode_rejects_empty_frame() {
    let err = decode_pixil(r#"{"frames": [[]]}"#).unwrap_err();
    assert!(matches!(err, ResourceLoadError::EmptyFrame { frame: 0 }));
}

#[test]
fn errors_render_readable_messages() {
    let err = decode_pixil(r#"{"frames": [[[1, 1], [1]]]}"#).unwrap_err();
    assert_eq!(err.to_string(), "frame 0 row 1 has a different length");
    assert_eq!(ResourceLoadError::NoFrames.to_string(), "no frames found");
}

// ── Files ─────────────────────────────────────────────────────────────────────

fn assets() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
}

#[test]
fn load_missing_file_is_io_error() {
    let err = load_pixil_file(&assets().join("does_not_exist.pixil")).unwrap_err();
    assert!(matches!(err, ResourceLoadError::Io(_)));
}

#[test]
fn bundled_alien_sprites_load() {
    for name in ["black_pixel_alien.pixil", "black_saucer_alien.pixil"] {
        let def = load_pixil_file(&assets().join(name)).unwrap();
        assert_eq!(def.frame_count(), 2, "{}", name);
        assert_eq!(def.dimensions(), (11, 8), "{}", name);
    }
}

#[test]
fn sprite_set_skips_broken_entries() {
    let names = vec![
        "black_pixel_alien.pixil".to_string(),
        "missing.pixil".to_string(),
        "black_saucer_alien.pixil".to_string(),
    ];
    let set = load_sprite_set(assets(), &names);
    assert_eq!(set.len(), 2);
}
