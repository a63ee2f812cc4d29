#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "std")]
pub mod engine;
#[cfg(feature = "std")]
mod game;
#[cfg(feature = "std")]
mod logging;
pub mod player;
#[cfg(feature = "std")]
mod ui;

pub use crate::core::*;
#[cfg(feature = "std")]
pub use config::*;
pub use domain::*;
#[cfg(feature = "std")]
pub use engine::{BestMove, EngineBridge, EngineError, EngineState};
#[cfg(feature = "std")]
pub use game::*;
#[cfg(feature = "std")]
pub use logging::init_logging;
pub use player::*;
#[cfg(feature = "std")]
pub use ui::*;
