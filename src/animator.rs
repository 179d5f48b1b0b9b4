//! Sprite animation registry.
//!
//! Each named `SpriteInstance` shares a read-only `SpriteDefinition` and
//! owns its own frame index, timer and position.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::UnknownSpriteError;
use crate::pixil::{Frame, SpriteDefinition};

#[derive(Clone, Debug)]
pub struct SpriteInstance {
    pub definition: Arc<SpriteDefinition>,
    pub frame_index: usize,
    /// Timestamp (ms) of the last frame change.
    pub last_update: u64,
    pub x: i32,
    pub y: i32,
}

impl SpriteInstance {
    pub fn new(definition: Arc<SpriteDefinition>) -> Self {
        SpriteInstance {
            definition,
            frame_index: 0,
            last_update: 0,
            x: 0,
            y: 0,
        }
    }

    pub fn current_frame(&self) -> &Frame {
        self.definition.frame(self.frame_index)
    }
}

#[derive(Clone, Debug)]
pub struct SpriteAnimator {
    sprites: HashMap<String, SpriteInstance>,
    /// Frame changes per second.
    frame_rate: u32,
}

impl SpriteAnimator {
    pub fn new(frame_rate: u32) -> Self {
        SpriteAnimator {
            sprites: HashMap::new(),
            frame_rate: frame_rate.max(1),
        }
    }

    /// Milliseconds each frame stays on screen.
    pub fn period(&self) -> u64 {
        1000 / self.frame_rate as u64
    }

    /// Bind `name` to `definition` at (0, 0).  Replaces any earlier binding.
    pub fn register(&mut self, name: &str, definition: Arc<SpriteDefinition>) {
        self.sprites
            .insert(name.to_string(), SpriteInstance::new(definition));
    }

    pub fn remove(&mut self, name: &str) -> Option<SpriteInstance> {
        self.sprites.remove(name)
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn get(&self, name: &str) -> Result<&SpriteInstance, UnknownSpriteError> {
        self.sprites
            .get(name)
            .ok_or_else(|| UnknownSpriteError::new(name))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut SpriteInstance, UnknownSpriteError> {
        self.sprites
            .get_mut(name)
            .ok_or_else(|| UnknownSpriteError::new(name))
    }

    /// Overwrite the position.  No clamping.
    pub fn set_position(&mut self, name: &str, x: i32, y: i32) -> Result<(), UnknownSpriteError> {
        let sprite = self.get_mut(name)?;
        sprite.x = x;
        sprite.y = y;
        Ok(())
    }

    /// Step to the next frame once a full period has elapsed since the last
    /// change; a gap of exactly one period counts.  Returns whether the
    /// frame changed.
    pub fn advance(&mut self, name: &str, now: u64) -> Result<bool, UnknownSpriteError> {
        let period = self.period();
        let sprite = self.get_mut(name)?;
        if now.saturating_sub(sprite.last_update) >= period {
            sprite.frame_index = (sprite.frame_index + 1) % sprite.definition.frame_count();
            sprite.last_update = now;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Restart the frame timer without changing the frame.
    pub fn reset_timer(&mut self, name: &str, now: u64) -> Result<(), UnknownSpriteError> {
        self.get_mut(name)?.last_update = now;
        Ok(())
    }

    pub fn current_frame(&self, name: &str) -> Result<&Frame, UnknownSpriteError> {
        Ok(self.get(name)?.current_frame())
    }

    pub fn current_position(&self, name: &str) -> Result<(i32, i32), UnknownSpriteError> {
        let sprite = self.get(name)?;
        Ok((sprite.x, sprite.y))
    }
}

/// Unknown sprite names are programming errors: panic in debug builds,
/// log and carry on in release builds.
pub fn report_unknown_sprite(err: UnknownSpriteError) {
    log::error!("{}", err);
    debug_assert!(false, "{}", err);
}
