//! skyshot — a terminal arcade shooter.
//!
//! The core is the wave engine ([`wave`]) and the collision detector
//! ([`hits`]): everything that manages large populations of transient,
//! independently-timed sprites and detects sub-frame proximity events
//! between them. Rendering and input live in the binary.

pub mod avatar;
pub mod config;
pub mod entities;
pub mod game;
pub mod hits;
pub mod wave;

pub use config::Config;
pub use game::{Game, WaveModel};
