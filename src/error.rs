//! Error types for resource loading and sprite lookups.
//!
//! Game-state conditions (lives exhausted, swarm cleared) are never errors;
//! they are phase transitions in `compute`.

use std::fmt;

/// A `.pixil` resource could not be turned into a usable sprite.
#[derive(Debug)]
pub enum ResourceLoadError {
    /// The file could not be read.
    Io(String),
    /// The bytes are not a valid `.pixil` document.
    Malformed(String),
    /// A frame has rows of differing length.
    RaggedFrame { frame: usize, row: usize },
    /// A frame's dimensions differ from the first frame's.
    MismatchedFrames { frame: usize },
    /// A frame has no rows or no columns.
    EmptyFrame { frame: usize },
    /// The document decoded fine but contains no frames.
    NoFrames,
}

impl fmt::Display for ResourceLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLoadError::Io(msg) => write!(f, "I/O error: {}", msg),
            ResourceLoadError::Malformed(msg) => write!(f, "malformed pixil data: {}", msg),
            ResourceLoadError::RaggedFrame { frame, row } => {
                write!(f, "frame {} row {} has a different length", frame, row)
            }
            ResourceLoadError::MismatchedFrames { frame } => {
                write!(f, "frame {} dimensions differ from frame 0", frame)
            }
            ResourceLoadError::EmptyFrame { frame } => write!(f, "frame {} is empty", frame),
            ResourceLoadError::NoFrames => write!(f, "no frames found"),
        }
    }
}

impl std::error::Error for ResourceLoadError {}

impl From<std::io::Error> for ResourceLoadError {
    fn from(e: std::io::Error) -> Self {
        ResourceLoadError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ResourceLoadError {
    fn from(e: serde_json::Error) -> Self {
        ResourceLoadError::Malformed(e.to_string())
    }
}

/// An animator operation named a sprite that was never registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownSpriteError {
    pub name: String,
}

impl UnknownSpriteError {
    pub fn new(name: &str) -> Self {
        UnknownSpriteError {
            name: name.to_string(),
        }
    }
}

impl fmt::Display for UnknownSpriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sprite '{}'", self.name)
    }
}

impl std::error::Error for UnknownSpriteError {}
