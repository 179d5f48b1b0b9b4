//! Game rules and the per-tick update.
//!
//! `GameState` is the single owner of everything that changes during play.
//! The front end calls `tick` once per frame with that frame's input; all
//! randomness comes through the injected RNG so a seeded RNG replays a game
//! exactly.

use std::sync::Arc;

use rand::Rng;

use crate::animator::SpriteAnimator;
use crate::config::{AlienVisual, GameConfig, LaserConfig};
use crate::entities::{
    AudioCue, GameEvent, GamePhase, Lives, Projectile, ProjectileOwner, Rect, Score, Ship, Swarm,
    TickInput,
};
use crate::pixil::SpriteDefinition;
use crate::swarm::{self, AlienSkin};

const BUTTON_WIDTH: i32 = 150;
const BUTTON_HEIGHT: i32 = 40;

// ── Ship ─────────────────────────────────────────────────────────────────────

/// Ship centred horizontally on its resting row.
pub fn new_ship(config: &GameConfig) -> Ship {
    let ship = &config.ship;
    Ship {
        rect: Rect::new(
            config.screen_width / 2 - ship.width / 2,
            config.ship_row(),
            ship.width,
            ship.height,
        ),
        speed: ship.speed,
        lasers: Vec::new(),
        cooldown: 0,
    }
}

/// Apply `direction * speed` (direction is -1, 0 or 1), then clamp into
/// `[0, screen_width - width]`.  The clamp runs even when standing still.
pub fn move_ship(ship: &mut Ship, direction: i32, screen_width: i32) {
    let max_x = (screen_width - ship.rect.w).max(0);
    ship.rect.x = (ship.rect.x + direction * ship.speed).clamp(0, max_x);
}

/// Launch a laser from the ship's top-centre unless the cooldown is running.
pub fn fire_ship_laser(ship: &mut Ship, laser: &LaserConfig, cooldown: Option<u32>) -> bool {
    if ship.cooldown > 0 {
        return false;
    }
    let rect = Rect::new(
        ship.rect.center_x() - laser.width / 2,
        ship.rect.y,
        laser.width,
        laser.height,
    );
    ship.lasers.push(Projectile {
        rect,
        owner: ProjectileOwner::Ship,
    });
    ship.cooldown = cooldown.unwrap_or(0);
    true
}

// ── Projectiles ──────────────────────────────────────────────────────────────

/// Move every projectile along its owner's direction, then drop the ones
/// that have left the screen through the top or bottom.
pub fn advance_projectiles(lasers: &mut Vec<Projectile>, speed: i32, screen_height: i32) {
    for laser in lasers.iter_mut() {
        laser.rect.y += laser.owner.direction() * speed;
    }
    lasers.retain(|l| l.rect.bottom() >= 0 && l.rect.y <= screen_height);
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Ship lasers against living aliens.  Each laser kills at most one alien
/// and each alien dies at most once; both are removed after the pass.
pub fn resolve_ship_hits(
    lasers: &mut Vec<Projectile>,
    swarm: &mut Swarm,
    animator: &mut SpriteAnimator,
    score: &mut Score,
    points: u32,
) -> Vec<GameEvent> {
    let mut spent = vec![false; lasers.len()];
    let mut killed = vec![false; swarm.aliens.len()];
    let mut events = Vec::new();

    for (li, laser) in lasers.iter().enumerate() {
        let hit = swarm
            .aliens
            .iter()
            .enumerate()
            .find(|(ai, alien)| !killed[*ai] && laser.rect.intersects(&alien.rect));
        if let Some((ai, alien)) = hit {
            killed[ai] = true;
            spent[li] = true;
            score.add(points);
            log::debug!("alien ({}, {}) destroyed", alien.row, alien.col);
            events.push(GameEvent::AlienDestroyed {
                row: alien.row,
                col: alien.col,
                points,
            });
        }
    }

    *lasers = std::mem::take(lasers)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !spent[*i])
        .map(|(_, l)| l)
        .collect();

    swarm.aliens = std::mem::take(&mut swarm.aliens)
        .into_iter()
        .enumerate()
        .filter_map(|(i, alien)| {
            if !killed[i] {
                return Some(alien);
            }
            if let Some(name) = &alien.sprite {
                animator.remove(name);
            }
            None
        })
        .collect();

    events
}

/// Alien lasers against the ship.  Every overlapping laser is removed and
/// costs one life.
pub fn resolve_alien_hits(lasers: &mut Vec<Projectile>, ship: &Ship, lives: &mut Lives) -> Vec<GameEvent> {
    let mut events = Vec::new();
    lasers.retain(|laser| {
        if laser.rect.intersects(&ship.rect) {
            lives.lose();
            log::debug!("ship hit, {} lives left", lives.count());
            events.push(GameEvent::ShipHit {
                lives_left: lives.count(),
            });
            false
        } else {
            true
        }
    });
    events
}

// ── Game-over menu ───────────────────────────────────────────────────────────

pub fn play_again_button(config: &GameConfig) -> Rect {
    Rect::new(
        config.screen_width / 2 - BUTTON_WIDTH / 2,
        config.screen_height / 2,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
    )
}

pub fn quit_button(config: &GameConfig) -> Rect {
    Rect::new(
        config.screen_width / 2 - BUTTON_WIDTH / 2,
        config.screen_height / 2 + 60,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
    )
}

// ── Master state ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub skin: AlienSkin,
    pub animator: SpriteAnimator,
    pub ship: Ship,
    pub swarm: Swarm,
    pub score: Score,
    pub lives: Lives,
    pub phase: GamePhase,
    /// Set once the score threshold is crossed; cleared only by a new round.
    pub speed_boosted: bool,
    /// Ticks simulated since creation.
    pub tick: u64,
    pending: Vec<GameEvent>,
}

impl GameState {
    /// Start round one.  `sprites` holds whatever alien sprites loaded; it
    /// is ignored for rectangle swarms.
    pub fn new(config: GameConfig, sprites: Vec<Arc<SpriteDefinition>>, rng: &mut impl Rng) -> Self {
        let frame_rate = match &config.swarm.visual {
            AlienVisual::PixelSprites { frame_rate, .. } => *frame_rate,
            AlienVisual::Rects { .. } => 1,
        };
        let skin = AlienSkin::resolve(&config.swarm.visual, sprites);
        let mut animator = SpriteAnimator::new(frame_rate);
        let speed = swarm::swarm_speed(&config.swarm, 1, false);
        let swarm = swarm::new_swarm(&config.swarm, &skin, &mut animator, speed, 0, rng);

        log::info!(
            "new game: {}x{} swarm, {} lives",
            config.swarm.rows,
            config.swarm.columns,
            config.max_lives
        );

        GameState {
            ship: new_ship(&config),
            lives: Lives::new(config.max_lives),
            score: Score::default(),
            phase: GamePhase::Playing,
            speed_boosted: false,
            tick: 0,
            pending: vec![GameEvent::Audio(AudioCue::BackgroundLoopStart)],
            config,
            skin,
            animator,
            swarm,
        }
    }

    /// Simulation clock in milliseconds, derived from the tick count.
    pub fn now_ms(&self) -> u64 {
        self.tick * 1000 / self.config.tick_rate.max(1) as u64
    }

    /// Advance one frame.  Returns what happened, in order.
    pub fn tick(&mut self, input: &TickInput, rng: &mut impl Rng) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.pending);

        if input.quit {
            if self.phase != GamePhase::Exit {
                log::info!("quit requested");
                self.phase = GamePhase::Exit;
                events.push(GameEvent::Quit);
            }
            return events;
        }

        match self.phase {
            GamePhase::Exit => return events,
            GamePhase::GameOver => {
                if let Some((x, y)) = input.click {
                    self.choose_after_game_over(x, y, rng, &mut events);
                }
                return events;
            }
            GamePhase::Playing => {}
        }

        self.tick += 1;
        let now = self.now_ms();
        let lives_before = self.lives.count();
        let width = self.config.screen_width;
        let height = self.config.screen_height;

        // 1. Ship
        let direction = input.right as i32 - input.left as i32;
        move_ship(&mut self.ship, direction, width);
        self.ship.cooldown = self.ship.cooldown.saturating_sub(1);
        if input.fire
            && fire_ship_laser(
                &mut self.ship,
                &self.config.ship_laser,
                self.config.ship.laser_cooldown,
            )
        {
            events.push(GameEvent::Audio(AudioCue::LaserFired));
        }

        // 2. Projectiles (culling happens before any collision test)
        advance_projectiles(&mut self.ship.lasers, self.config.ship_laser.speed, height);
        advance_projectiles(&mut self.swarm.lasers, self.config.alien_laser.speed, height);

        // 3. Collisions
        events.extend(resolve_ship_hits(
            &mut self.ship.lasers,
            &mut self.swarm,
            &mut self.animator,
            &mut self.score,
            self.config.points_per_kill,
        ));
        events.extend(resolve_alien_hits(
            &mut self.swarm.lasers,
            &self.ship,
            &mut self.lives,
        ));

        // 4. Swarm
        self.apply_speed_ratchet(&mut events);
        if swarm::march(&mut self.swarm, &self.config.swarm, &mut self.animator, width) {
            events.push(GameEvent::Audio(AudioCue::SwarmDescended));
        }
        swarm::try_fire(
            &mut self.swarm,
            &self.config.swarm,
            &self.config.alien_laser,
            rng,
        );
        swarm::animate(&self.swarm, &mut self.animator, now);

        // 5. Respawns.  Every re-formation starts a new wave.
        if swarm::has_breached(&self.swarm, self.ship.rect.y) {
            self.lives.lose();
            self.swarm.wave += 1;
            log::info!("swarm breached, {} lives left", self.lives.count());
            events.push(GameEvent::SwarmBreached {
                lives_left: self.lives.count(),
            });
            self.respawn_swarm(rng);
        }
        if swarm::is_cleared(&self.swarm) {
            let cleared = self.swarm.wave;
            self.swarm.wave += 1;
            log::info!("wave {} cleared", cleared);
            events.push(GameEvent::WaveCleared { wave: cleared });
            self.respawn_swarm(rng);
        }

        // 6. Game over fires once, on the tick lives reach zero
        if lives_before > 0 && self.lives.is_empty() {
            log::info!("game over with {} points", self.score.points);
            self.phase = GamePhase::GameOver;
            events.push(GameEvent::GameOver {
                score: self.score.points,
            });
        }

        events
    }

    fn apply_speed_ratchet(&mut self, events: &mut Vec<GameEvent>) {
        if self.speed_boosted || self.score.points < self.config.swarm.speed_threshold {
            return;
        }
        self.speed_boosted = true;
        self.swarm.speed = swarm::swarm_speed(&self.config.swarm, self.swarm.wave, true);
        log::info!("score threshold reached, swarm speed {}", self.swarm.speed);
        events.push(GameEvent::SpeedBoosted {
            speed: self.swarm.speed,
        });
    }

    fn respawn_swarm(&mut self, rng: &mut impl Rng) {
        let speed = swarm::swarm_speed(&self.config.swarm, self.swarm.wave, self.speed_boosted);
        let now = self.now_ms();
        swarm::respawn(
            &mut self.swarm,
            &self.config.swarm,
            &self.skin,
            &mut self.animator,
            speed,
            now,
            rng,
        );
    }

    fn choose_after_game_over(
        &mut self,
        x: i32,
        y: i32,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        if play_again_button(&self.config).contains(x, y) {
            self.restart_round(rng);
            events.push(GameEvent::RoundRestarted);
            events.push(GameEvent::Audio(AudioCue::BackgroundLoopStart));
        } else if quit_button(&self.config).contains(x, y) {
            log::info!("quit from game-over menu");
            self.phase = GamePhase::Exit;
            events.push(GameEvent::Quit);
        }
    }

    /// Fresh ship, swarm, score and lives.  The best score survives.
    pub fn restart_round(&mut self, rng: &mut impl Rng) {
        log::info!("new round");
        self.score.reset();
        self.lives.reset();
        self.speed_boosted = false;
        self.ship = new_ship(&self.config);
        self.animator.clear();
        let speed = swarm::swarm_speed(&self.config.swarm, 1, false);
        let now = self.now_ms();
        self.swarm = swarm::new_swarm(
            &self.config.swarm,
            &self.skin,
            &mut self.animator,
            speed,
            now,
            rng,
        );
        self.phase = GamePhase::Playing;
    }
}
