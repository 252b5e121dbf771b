//! Alien Kitty: a terminal arcade shooter.
//!
//! The kitty trades fire with a bouncing boss octo and its orbiting minions.
//! Everything except terminal I/O lives in this library so it can be driven
//! deterministically from tests.

pub mod audio;
pub mod compute;
pub mod display;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod settings;
