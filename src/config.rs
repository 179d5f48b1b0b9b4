//! Tuning tables.
//!
//! One `GameConfig` drives the whole simulation.  The two presets cover the
//! rectangle-swarm and pixel-art flavours of the game.

use crate::pixil::{BLUE, GREEN, RED, YELLOW};

pub const SCREEN_WIDTH: i32 = 800;
pub const SCREEN_HEIGHT: i32 = 600;
pub const TICK_RATE: u32 = 60;

/// How aliens look on screen (and therefore how big they are).
#[derive(Clone, Debug, PartialEq)]
pub enum AlienVisual {
    /// Solid rectangles, one palette colour per row.
    Rects {
        width: i32,
        height: i32,
        row_colors: Vec<u8>,
    },
    /// `.pixil` sprites, one chosen at random per alien.
    PixelSprites {
        resources: Vec<String>,
        /// Screen pixels per sprite cell.
        pixel_size: i32,
        /// Animation frames per second.
        frame_rate: u32,
    },
}

/// Probability `numerator / denominator` per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chance {
    pub numerator: u32,
    pub denominator: u32,
}

impl Chance {
    pub const fn new(numerator: u32, denominator: u32) -> Chance {
        Chance {
            numerator,
            denominator,
        }
    }

    pub const NEVER: Chance = Chance::new(0, 1);
    pub const ALWAYS: Chance = Chance::new(1, 1);
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwarmConfig {
    pub visual: AlienVisual,
    pub rows: usize,
    pub columns: usize,
    /// Gap between neighbouring aliens.
    pub spacing: i32,
    /// Offset of the top-left alien from the screen corner.
    pub margin: i32,
    /// Horizontal pixels per tick before the score threshold.
    pub speed: i32,
    /// Horizontal pixels per tick once the score threshold is reached.
    pub boosted_speed: i32,
    pub speed_threshold: u32,
    /// Extra speed added per cleared wave.
    pub wave_speed_step: i32,
    /// Vertical drop on each edge bounce.
    pub descend_step: i32,
    pub fire_chance: Chance,
    /// Extra numerator added to `fire_chance` per cleared wave.
    pub wave_fire_step: u32,
    /// First wave (1-based) on which aliens shoot.
    pub fire_from_wave: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaserConfig {
    pub width: i32,
    pub height: i32,
    /// Pixels per tick.
    pub speed: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShipConfig {
    pub width: i32,
    pub height: i32,
    /// Gap between the ship's bottom edge and the screen bottom.
    pub bottom_gap: i32,
    pub speed: i32,
    /// Minimum ticks between shots.  `None` means no limit.
    pub laser_cooldown: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub tick_rate: u32,
    pub ship: ShipConfig,
    pub swarm: SwarmConfig,
    pub ship_laser: LaserConfig,
    pub alien_laser: LaserConfig,
    pub points_per_kill: u32,
    pub max_lives: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::classic()
    }
}

const SHIP: ShipConfig = ShipConfig {
    width: 50,
    height: 50,
    bottom_gap: 10,
    speed: 5,
    laser_cooldown: None,
};

impl GameConfig {
    /// Rectangle aliens, shooting from the first wave.
    pub fn classic() -> Self {
        GameConfig {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            tick_rate: TICK_RATE,
            ship: SHIP,
            swarm: SwarmConfig {
                visual: AlienVisual::Rects {
                    width: 48,
                    height: 30,
                    row_colors: vec![BLUE, RED, GREEN, YELLOW],
                },
                rows: 4,
                columns: 6,
                spacing: 20,
                margin: 20,
                speed: 2,
                boosted_speed: 4,
                speed_threshold: 5000,
                wave_speed_step: 0,
                descend_step: 30 + 20,
                fire_chance: Chance::new(1, 100),
                wave_fire_step: 0,
                fire_from_wave: 1,
            },
            ship_laser: LaserConfig {
                width: 4,
                height: 10,
                speed: 7,
            },
            alien_laser: LaserConfig {
                width: 4,
                height: 10,
                speed: 5,
            },
            points_per_kill: 100,
            max_lives: 3,
        }
    }

    /// Animated `.pixil` aliens that hold fire during the first wave.
    pub fn pixel_art() -> Self {
        let classic = GameConfig::classic();
        GameConfig {
            swarm: SwarmConfig {
                visual: AlienVisual::PixelSprites {
                    resources: vec![
                        "black_pixel_alien.pixil".to_string(),
                        "black_saucer_alien.pixil".to_string(),
                    ],
                    pixel_size: 4,
                    frame_rate: 2,
                },
                margin: 0,
                descend_step: 10,
                fire_chance: Chance::new(5, 100),
                fire_from_wave: 2,
                ..classic.swarm
            },
            ship_laser: LaserConfig {
                width: 5,
                height: 15,
                speed: 7,
            },
            alien_laser: LaserConfig {
                width: 5,
                height: 15,
                speed: 5,
            },
            ..classic
        }
    }

    /// Milliseconds per tick.
    pub fn tick_ms(&self) -> u64 {
        1000 / self.tick_rate.max(1) as u64
    }

    /// Resting y coordinate of the ship's top edge.
    pub fn ship_row(&self) -> i32 {
        self.screen_height - self.ship.height - self.ship.bottom_gap
    }
}
