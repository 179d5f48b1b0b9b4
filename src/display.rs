//! Terminal renderer for `RenderSnapshot`s.
//!
//! The simulation works in screen pixels (800x600 by default).  This module
//! scales a `RenderSnapshot` onto whatever terminal grid is available:
//! row 0 is the HUD, the last row is the controls hint, and everything in
//! between is the play field.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use space_invader::entities::{GamePhase, Rect};
use space_invader::pixil::{palette_color, BLACK};
use space_invader::snapshot::{DrawKind, Drawable, Overlay, RenderSnapshot, Visual};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_WAVE: Color = Color::Green;
const C_HUD_LIVES: Color = Color::Red;
const C_SHIP: Color = Color::White;
const C_SHIP_LASER: Color = Color::Cyan;
const C_ALIEN_LASER: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Mapping between screen pixels and terminal cells.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub screen_width: i32,
    pub screen_height: i32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, screen_width: i32, screen_height: i32) -> Self {
        Viewport {
            cols: cols.max(1),
            rows: rows.max(3),
            screen_width: screen_width.max(1),
            screen_height: screen_height.max(1),
        }
    }

    fn field_rows(&self) -> i32 {
        self.rows as i32 - 2
    }

    fn col_of(&self, x: i32) -> i32 {
        x * self.cols as i32 / self.screen_width
    }

    fn row_of(&self, y: i32) -> i32 {
        1 + y * self.field_rows() / self.screen_height
    }

    /// Screen-pixel position at the centre of a terminal cell.
    pub fn to_screen(&self, col: u16, row: u16) -> (i32, i32) {
        let x = (2 * col as i32 + 1) * self.screen_width / (2 * self.cols as i32);
        let y = (2 * (row as i32 - 1) + 1) * self.screen_height / (2 * self.field_rows());
        (x, y)
    }

    /// Cells covered by `rect`, at least one in each direction.
    fn cells(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let c0 = self.col_of(rect.x);
        let r0 = self.row_of(rect.y);
        let c1 = self.col_of(rect.right()).max(c0 + 1);
        let r1 = self.row_of(rect.bottom()).max(r0 + 1);
        (c0, r0, c1, r1)
    }

    fn in_field(&self, col: i32, row: i32) -> bool {
        col >= 0 && col < self.cols as i32 && row >= 1 && row < self.rows as i32 - 1
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &RenderSnapshot, view: &Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, snap, view)?;
    for drawable in &snap.drawables {
        match drawable.kind {
            DrawKind::Alien => draw_alien(out, drawable, view)?,
            DrawKind::ShipLaser => draw_laser(out, drawable, view, C_SHIP_LASER)?,
            DrawKind::AlienLaser => draw_laser(out, drawable, view, C_ALIEN_LASER)?,
            DrawKind::Ship => draw_ship(out, drawable, view)?,
        }
    }
    draw_controls_hint(out, snap, view)?;

    if let Some(overlay) = &snap.overlay {
        draw_game_over(out, overlay, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn to_color(index: u8) -> Color {
    let rgb = palette_color(index);
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn put<W: Write>(out: &mut W, view: &Viewport, col: i32, row: i32, text: &str) -> std::io::Result<()> {
    if view.in_field(col, row) {
        out.queue(cursor::MoveTo(col as u16, row as u16))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snap: &RenderSnapshot, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Points: {:03}", snap.score)))?;

    let wave_str = format!("[ WAVE {} ]", snap.wave);
    let wx = (view.cols / 2).saturating_sub(wave_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(wx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_WAVE))?;
    out.queue(Print(&wave_str))?;

    let lives_str = format!("Lives: {}", "♥".repeat(snap.lives as usize));
    let lx = view
        .cols
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_ship<W: Write>(out: &mut W, ship: &Drawable, view: &Viewport) -> std::io::Result<()> {
    //   ▲     ← top row
    //  /█\    ← every row below
    let (c0, r0, c1, r1) = view.cells(&ship.rect);
    let mid = (c0 + c1 - 1) / 2;
    out.queue(style::SetForegroundColor(C_SHIP))?;
    put(out, view, mid, r0, "▲")?;
    for row in (r0 + 1)..r1 {
        put(out, view, mid - 1, row, "/█\\")?;
    }
    Ok(())
}

fn draw_laser<W: Write>(out: &mut W, laser: &Drawable, view: &Viewport, color: Color) -> std::io::Result<()> {
    let col = view.col_of(laser.rect.center_x());
    let row = view.row_of(laser.rect.y + laser.rect.h / 2);
    out.queue(style::SetForegroundColor(color))?;
    put(out, view, col, row, "║")
}

fn draw_alien<W: Write>(out: &mut W, alien: &Drawable, view: &Viewport) -> std::io::Result<()> {
    let (c0, r0, c1, r1) = view.cells(&alien.rect);
    match &alien.visual {
        Visual::Solid(color) => {
            out.queue(style::SetForegroundColor(to_color(*color)))?;
            let bar = "█".repeat((c1 - c0) as usize);
            for row in r0..r1 {
                put(out, view, c0, row, &bar)?;
            }
        }
        Visual::Sprite { pixel_size, .. } => {
            let Some(frame) = alien.frame() else {
                return Ok(());
            };
            // Sample the frame cell under the centre of each terminal cell.
            for row in r0..r1 {
                for col in c0..c1 {
                    let (x, y) = view.to_screen(col.max(0) as u16, row.max(1) as u16);
                    let fx = (x - alien.rect.x).div_euclid(*pixel_size);
                    let fy = (y - alien.rect.y).div_euclid(*pixel_size);
                    if fx < 0 || fy < 0 {
                        continue;
                    }
                    match frame.cell(fx as usize, fy as usize) {
                        Some(index) if index != BLACK => {
                            out.queue(style::SetForegroundColor(to_color(index)))?;
                            put(out, view, col, row, "█")?;
                        }
                        _ => {}
                    }
                }
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, snap: &RenderSnapshot, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    let hint = match snap.phase {
        GamePhase::GameOver => "Click a button   R : Play Again   Q : Quit",
        _ => "← → / A D : Move   SPACE : Shoot   Q : Quit",
    };
    out.queue(Print(hint))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, overlay: &Overlay, view: &Viewport) -> std::io::Result<()> {
    let Overlay::GameOver {
        score,
        best,
        play_again,
        quit,
    } = overlay;

    let cx = view.cols as i32 / 2;
    let (_, button_row, _, _) = view.cells(play_again);

    let score_line = format!("Score: {}", score);
    let best_line = if score >= best && *score > 0 {
        format!("★ NEW BEST: {} ★", best)
    } else {
        format!("Best: {}", best)
    };
    let lines: [(&str, Color); 5] = [
        ("╔════════════════════╗", Color::Red),
        ("║     GAME  OVER     ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        (&best_line, Color::DarkGrey),
    ];

    let start_row = (button_row - lines.len() as i32 - 1).max(1);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx - msg.chars().count() as i32 / 2;
        out.queue(style::SetForegroundColor(*color))?;
        put(out, view, col, start_row + i as i32, msg)?;
    }

    draw_button(out, view, play_again, "Play Again")?;
    draw_button(out, view, quit, "Quit")?;
    Ok(())
}

fn draw_button<W: Write>(out: &mut W, view: &Viewport, rect: &Rect, label: &str) -> std::io::Result<()> {
    let (c0, r0, c1, r1) = view.cells(rect);
    let width = (c1 - c0).max(label.chars().count() as i32 + 2);
    let label_row = (r0 + r1 - 1) / 2;
    out.queue(style::SetForegroundColor(Color::Black))?;
    out.queue(style::SetBackgroundColor(Color::White))?;
    for row in r0..r1 {
        let text = if row == label_row {
            format!("{:^width$}", label, width = width as usize)
        } else {
            " ".repeat(width as usize)
        };
        put(out, view, c0, row, &text)?;
    }
    out.queue(style::SetBackgroundColor(Color::Reset))?;
    Ok(())
}
