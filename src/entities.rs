//! Game entity types: mostly plain data, with the few invariant-keeping
//! helpers (rectangle geometry, score, lives) living next to the data.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in screen pixels.  Edges are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    /// Closed-rectangle overlap: touching edges count as a hit.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileOwner {
    Ship,
    Alien,
}

impl ProjectileOwner {
    /// Sign of the vertical velocity: ship lasers go up, alien lasers down.
    pub fn direction(&self) -> i32 {
        match self {
            ProjectileOwner::Ship => -1,
            ProjectileOwner::Alien => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub rect: Rect,
    pub owner: ProjectileOwner,
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub rect: Rect,
    pub speed: i32,
    pub lasers: Vec<Projectile>,
    /// Ticks left before the next shot is allowed.
    pub cooldown: u32,
}

// ── Aliens ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub rect: Rect,
    pub row: usize,
    pub col: usize,
    /// Animator key when the alien is drawn from a sprite.
    pub sprite: Option<String>,
    /// Palette index used when there is no sprite.
    pub color: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwarmPhase {
    /// Freshly laid out, has not moved yet.
    Forming,
    /// Sliding sideways.
    Marching,
    /// Dropped one step and turned around on the last tick.
    Descending,
}

#[derive(Clone, Debug)]
pub struct Swarm {
    pub aliens: Vec<Alien>,
    /// Alien lasers in flight.  They outlive a respawn.
    pub lasers: Vec<Projectile>,
    /// +1 right, -1 left.
    pub direction: i32,
    pub speed: i32,
    /// 1-based wave counter; grows each time the swarm is cleared.
    pub wave: u32,
    pub phase: SwarmPhase,
}

// ── Score & lives ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub points: u32,
    /// Best final score seen this session.
    pub best: u32,
}

impl Score {
    pub fn add(&mut self, amount: u32) {
        self.points = self.points.saturating_add(amount);
        self.best = self.best.max(self.points);
    }

    pub fn reset(&mut self) {
        self.points = 0;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lives {
    count: u32,
    max: u32,
}

impl Lives {
    pub fn new(max: u32) -> Self {
        Lives { count: max, max }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn lose(&mut self) {
        self.count = self.count.saturating_sub(1);
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn reset(&mut self) {
        self.count = self.max;
    }
}

// ── Game flow ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Waiting for the player to pick Play Again or Quit.
    GameOver,
    /// Terminal: the loop should stop.
    Exit,
}

/// Fire-and-forget sound requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    LaserFired,
    SwarmDescended,
    BackgroundLoopStart,
}

/// Something that happened during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    AlienDestroyed { row: usize, col: usize, points: u32 },
    ShipHit { lives_left: u32 },
    SwarmBreached { lives_left: u32 },
    WaveCleared { wave: u32 },
    SpeedBoosted { speed: i32 },
    GameOver { score: u32 },
    RoundRestarted,
    Quit,
    Audio(AudioCue),
}

/// Input gathered by the front end for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub quit: bool,
    /// A fire key went down since the last tick.
    pub fire: bool,
    pub left: bool,
    pub right: bool,
    /// Click position in screen pixels.
    pub click: Option<(i32, i32)>,
}
