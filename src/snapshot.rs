//! End-of-tick render data.
//!
//! A `RenderSnapshot` is an owned copy of everything the renderer needs, so
//! drawing never reads `GameState` while it is being updated.

use std::sync::Arc;

use crate::animator::report_unknown_sprite;
use crate::compute::{play_again_button, quit_button, GameState};
use crate::entities::{GamePhase, Rect};
use crate::pixil::{Frame, SpriteDefinition, RED, WHITE};
use crate::swarm::AlienSkin;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawKind {
    Ship,
    Alien,
    ShipLaser,
    AlienLaser,
}

#[derive(Clone, Debug)]
pub enum Visual {
    /// Solid fill with a palette index.
    Solid(u8),
    Sprite {
        definition: Arc<SpriteDefinition>,
        frame_index: usize,
        /// Screen pixels per frame cell.
        pixel_size: i32,
    },
}

#[derive(Clone, Debug)]
pub struct Drawable {
    pub kind: DrawKind,
    pub rect: Rect,
    pub visual: Visual,
}

impl Drawable {
    pub fn frame(&self) -> Option<&Frame> {
        match &self.visual {
            Visual::Sprite {
                definition,
                frame_index,
                ..
            } => Some(definition.frame(*frame_index)),
            Visual::Solid(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Overlay {
    GameOver {
        score: u32,
        best: u32,
        play_again: Rect,
        quit: Rect,
    },
}

#[derive(Clone, Debug)]
pub struct RenderSnapshot {
    pub screen_width: i32,
    pub screen_height: i32,
    /// Back to front: aliens, lasers, ship.
    pub drawables: Vec<Drawable>,
    pub score: u32,
    pub best: u32,
    pub lives: u32,
    pub wave: u32,
    pub phase: GamePhase,
    pub overlay: Option<Overlay>,
}

impl RenderSnapshot {
    pub fn count(&self, kind: DrawKind) -> usize {
        self.drawables.iter().filter(|d| d.kind == kind).count()
    }
}

pub fn snapshot(state: &GameState) -> RenderSnapshot {
    let mut drawables = Vec::new();
    let pixel_size = match &state.skin {
        AlienSkin::Sprites { pixel_size, .. } => *pixel_size,
        AlienSkin::Rects { .. } => 1,
    };

    for alien in &state.swarm.aliens {
        let drawable = match &alien.sprite {
            None => Some(Drawable {
                kind: DrawKind::Alien,
                rect: alien.rect,
                visual: Visual::Solid(alien.color),
            }),
            Some(name) => match state.animator.get(name) {
                Ok(instance) => Some(Drawable {
                    kind: DrawKind::Alien,
                    rect: Rect::new(instance.x, instance.y, alien.rect.w, alien.rect.h),
                    visual: Visual::Sprite {
                        definition: Arc::clone(&instance.definition),
                        frame_index: instance.frame_index,
                        pixel_size,
                    },
                }),
                Err(e) => {
                    report_unknown_sprite(e);
                    None
                }
            },
        };
        drawables.extend(drawable);
    }

    for laser in &state.swarm.lasers {
        drawables.push(Drawable {
            kind: DrawKind::AlienLaser,
            rect: laser.rect,
            visual: Visual::Solid(RED),
        });
    }
    for laser in &state.ship.lasers {
        drawables.push(Drawable {
            kind: DrawKind::ShipLaser,
            rect: laser.rect,
            visual: Visual::Solid(RED),
        });
    }
    drawables.push(Drawable {
        kind: DrawKind::Ship,
        rect: state.ship.rect,
        visual: Visual::Solid(WHITE),
    });

    let overlay = match state.phase {
        GamePhase::GameOver => Some(Overlay::GameOver {
            score: state.score.points,
            best: state.score.best,
            play_again: play_again_button(&state.config),
            quit: quit_button(&state.config),
        }),
        _ => None,
    };

    RenderSnapshot {
        screen_width: state.config.screen_width,
        screen_height: state.config.screen_height,
        drawables,
        score: state.score.points,
        best: state.score.best,
        lives: state.lives.count(),
        wave: state.swarm.wave,
        phase: state.phase,
        overlay,
    }
}
