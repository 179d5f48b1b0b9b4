pub mod animator;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod pixil;
pub mod snapshot;
pub mod swarm;
