//! Alien swarm: formation, lockstep march, edge bounce, firing and breach.
//!
//! The swarm cycles Forming → Marching ⇄ Descending.  Clearing the swarm
//! and breaching the ship's row are detected here but acted on by
//! `compute::GameState`, which owns score and lives.

use std::sync::Arc;

use rand::Rng;

use crate::animator::{report_unknown_sprite, SpriteAnimator};
use crate::config::{AlienVisual, LaserConfig, SwarmConfig};
use crate::entities::{Alien, Projectile, ProjectileOwner, Rect, Swarm, SwarmPhase};
use crate::pixil::{SpriteDefinition, BLUE, GREEN, RED, YELLOW};

const FALLBACK_WIDTH: i32 = 48;
const FALLBACK_HEIGHT: i32 = 30;

// ── Skins ────────────────────────────────────────────────────────────────────

/// `AlienVisual` with its sprites already loaded.
#[derive(Clone, Debug)]
pub enum AlienSkin {
    Rects {
        width: i32,
        height: i32,
        row_colors: Vec<u8>,
    },
    Sprites {
        definitions: Vec<Arc<SpriteDefinition>>,
        pixel_size: i32,
    },
}

impl AlienSkin {
    /// Pair the configured visual with whatever sprites actually loaded.
    /// A sprite swarm with nothing loaded is drawn as rectangles instead.
    pub fn resolve(visual: &AlienVisual, loaded: Vec<Arc<SpriteDefinition>>) -> AlienSkin {
        match visual {
            AlienVisual::Rects {
                width,
                height,
                row_colors,
            } => AlienSkin::Rects {
                width: *width,
                height: *height,
                row_colors: row_colors.clone(),
            },
            AlienVisual::PixelSprites { pixel_size, .. } if !loaded.is_empty() => {
                AlienSkin::Sprites {
                    definitions: loaded,
                    pixel_size: (*pixel_size).max(1),
                }
            }
            AlienVisual::PixelSprites { .. } => {
                log::warn!("no alien sprites available, drawing aliens as rectangles");
                AlienSkin::Rects {
                    width: FALLBACK_WIDTH,
                    height: FALLBACK_HEIGHT,
                    row_colors: vec![BLUE, RED, GREEN, YELLOW],
                }
            }
        }
    }

    /// Grid cell size: the largest alien this skin can produce.
    pub fn cell_size(&self) -> (i32, i32) {
        match self {
            AlienSkin::Rects { width, height, .. } => (*width, *height),
            AlienSkin::Sprites {
                definitions,
                pixel_size,
            } => definitions.iter().fold((0, 0), |(w, h), def| {
                let (cols, rows) = def.dimensions();
                (w.max(cols as i32 * pixel_size), h.max(rows as i32 * pixel_size))
            }),
        }
    }
}

// ── Formation ────────────────────────────────────────────────────────────────

/// Top-left corner of the alien at (`row`, `col`).
pub fn grid_position(config: &SwarmConfig, cell: (i32, i32), row: usize, col: usize) -> (i32, i32) {
    let x = config.margin + col as i32 * (cell.0 + config.spacing);
    let y = config.margin + row as i32 * (cell.1 + config.spacing);
    (x, y)
}

pub fn alien_sprite_name(row: usize, col: usize) -> String {
    format!("alien_{}_{}", row, col)
}

fn form_aliens(
    config: &SwarmConfig,
    skin: &AlienSkin,
    animator: &mut SpriteAnimator,
    now: u64,
    rng: &mut impl Rng,
) -> Vec<Alien> {
    let cell = skin.cell_size();
    let mut aliens = Vec::with_capacity(config.rows * config.columns);

    for row in 0..config.rows {
        for col in 0..config.columns {
            let (x, y) = grid_position(config, cell, row, col);
            let alien = match skin {
                AlienSkin::Rects {
                    width,
                    height,
                    row_colors,
                } => Alien {
                    rect: Rect::new(x, y, *width, *height),
                    row,
                    col,
                    sprite: None,
                    color: row_colors
                        .get(row % row_colors.len().max(1))
                        .copied()
                        .unwrap_or(BLUE),
                },
                AlienSkin::Sprites {
                    definitions,
                    pixel_size,
                } => {
                    let def = &definitions[rng.gen_range(0..definitions.len())];
                    let (cols, rows) = def.dimensions();
                    let name = alien_sprite_name(row, col);
                    animator.register(&name, Arc::clone(def));
                    if let Err(e) = animator
                        .set_position(&name, x, y)
                        .and_then(|_| animator.reset_timer(&name, now))
                    {
                        report_unknown_sprite(e);
                    }
                    Alien {
                        rect: Rect::new(x, y, cols as i32 * pixel_size, rows as i32 * pixel_size),
                        row,
                        col,
                        sprite: Some(name),
                        color: BLUE,
                    }
                }
            };
            aliens.push(alien);
        }
    }
    aliens
}

/// Build wave 1.
pub fn new_swarm(
    config: &SwarmConfig,
    skin: &AlienSkin,
    animator: &mut SpriteAnimator,
    speed: i32,
    now: u64,
    rng: &mut impl Rng,
) -> Swarm {
    Swarm {
        aliens: form_aliens(config, skin, animator, now, rng),
        lasers: Vec::new(),
        direction: 1,
        speed,
        wave: 1,
        phase: SwarmPhase::Forming,
    }
}

/// Replace every alien with a fresh formation.  Lasers already in flight
/// keep falling; `wave` is left to the caller.
pub fn respawn(
    swarm: &mut Swarm,
    config: &SwarmConfig,
    skin: &AlienSkin,
    animator: &mut SpriteAnimator,
    speed: i32,
    now: u64,
    rng: &mut impl Rng,
) {
    for alien in swarm.aliens.drain(..) {
        if let Some(name) = alien.sprite {
            animator.remove(&name);
        }
    }
    swarm.aliens = form_aliens(config, skin, animator, now, rng);
    swarm.direction = 1;
    swarm.speed = speed;
    swarm.phase = SwarmPhase::Forming;
}

// ── Movement ─────────────────────────────────────────────────────────────────

/// Horizontal speed for `wave`, before or after the score ratchet.
pub fn swarm_speed(config: &SwarmConfig, wave: u32, boosted: bool) -> i32 {
    let base = if boosted {
        config.boosted_speed
    } else {
        config.speed
    };
    base + config.wave_speed_step * wave.saturating_sub(1) as i32
}

/// Move every alien sideways by `direction * speed`.  If any alien then
/// touches a screen edge, the whole swarm drops `descend_step` and turns
/// around.  Returns `true` when it descended.
pub fn march(
    swarm: &mut Swarm,
    config: &SwarmConfig,
    animator: &mut SpriteAnimator,
    screen_width: i32,
) -> bool {
    let dx = swarm.direction * swarm.speed;
    for alien in swarm.aliens.iter_mut() {
        alien.rect.x += dx;
    }

    let at_edge = swarm
        .aliens
        .iter()
        .any(|a| a.rect.x <= 0 || a.rect.right() >= screen_width);

    if at_edge {
        swarm.direction = -swarm.direction;
        for alien in swarm.aliens.iter_mut() {
            alien.rect.y += config.descend_step;
        }
        swarm.phase = SwarmPhase::Descending;
    } else {
        swarm.phase = SwarmPhase::Marching;
    }

    sync_sprites(swarm, animator);
    at_edge
}

fn sync_sprites(swarm: &Swarm, animator: &mut SpriteAnimator) {
    for alien in &swarm.aliens {
        if let Some(name) = &alien.sprite {
            if let Err(e) = animator.set_position(name, alien.rect.x, alien.rect.y) {
                report_unknown_sprite(e);
            }
        }
    }
}

/// Step each living alien's animation clock.
pub fn animate(swarm: &Swarm, animator: &mut SpriteAnimator, now: u64) {
    for alien in &swarm.aliens {
        if let Some(name) = &alien.sprite {
            if let Err(e) = animator.advance(name, now) {
                report_unknown_sprite(e);
            }
        }
    }
}

// ── Firing ───────────────────────────────────────────────────────────────────

/// Per-tick odds of a shot on the swarm's current wave, or `None` if the
/// swarm holds fire.
pub fn fire_odds(config: &SwarmConfig, wave: u32) -> Option<(u32, u32)> {
    if wave < config.fire_from_wave {
        return None;
    }
    let den = config.fire_chance.denominator;
    let num = config
        .fire_chance
        .numerator
        .saturating_add(config.wave_fire_step.saturating_mul(wave.saturating_sub(1)))
        .min(den);
    if num == 0 || den == 0 {
        None
    } else {
        Some((num, den))
    }
}

/// Maybe drop one laser from a random alien's lower-centre point.
pub fn try_fire(
    swarm: &mut Swarm,
    config: &SwarmConfig,
    laser: &LaserConfig,
    rng: &mut impl Rng,
) -> bool {
    if swarm.aliens.is_empty() {
        return false;
    }
    let Some((num, den)) = fire_odds(config, swarm.wave) else {
        return false;
    };
    if !rng.gen_ratio(num, den) {
        return false;
    }

    let shooter = &swarm.aliens[rng.gen_range(0..swarm.aliens.len())];
    let rect = Rect::new(
        shooter.rect.center_x() - laser.width / 2,
        shooter.rect.bottom(),
        laser.width,
        laser.height,
    );
    swarm.lasers.push(Projectile {
        rect,
        owner: ProjectileOwner::Alien,
    });
    true
}

// ── Terminal conditions ──────────────────────────────────────────────────────

pub fn is_cleared(swarm: &Swarm) -> bool {
    swarm.aliens.is_empty()
}

/// Any alien's bottom edge at or below `ship_y`.
pub fn has_breached(swarm: &Swarm, ship_y: i32) -> bool {
    swarm.aliens.iter().any(|a| a.rect.bottom() >= ship_y)
}
