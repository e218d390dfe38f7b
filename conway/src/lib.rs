//! Bounded, colored Game of Life that keeps itself interesting.
//!
//! [`World`] owns the grid and applies the standard rule each [`World::tick`].
//! [`World::handle_stuck`] watches the last few generations and nudges the
//! simulation out of still lifes, short cycles and extinction. Windows of the
//! grid are handed to a [`FrameSink`] as clear + pixel messages.
//!
//! ```
//! use conway::{JsonLinesSink, FrameSink, World};
//!
//! let mut world = World::with_seed(38, 38, 7).unwrap();
//! world.seed_random();
//! world.tick();
//! world.handle_stuck();
//!
//! let window = world.get_screen_cells(3, 3, 32, 32).unwrap();
//! let mut sink = JsonLinesSink::new(Vec::new());
//! sink.send_window(&window).unwrap();
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod frame;
pub mod patterns;
pub mod world;

pub use cell::{Cell, Rgb};
pub use config::WorldConfig;
pub use error::{FrameError, WorldError, WorldResult};
pub use frame::{Coordinate, FrameSink, JsonLinesSink, Pixel, ScreenMessage};
pub use patterns::{Pattern, Quadrant};
pub use world::{Fingerprint, ScreenWindow, StuckReport, World};
