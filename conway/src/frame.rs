//! Pixel protocol spoken to display consumers.
//!
//! A frame is a `clear` message followed by one `drawPixel` message per live
//! cell in the window. Dead cells are never sent.
//!
//! ```json
//! {"type":"clear"}
//! {"type":"drawPixel","pixel":{"coordinate":{"x":0,"y":3},"color":{"r":12,"g":200,"b":7}}}
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::cell::Rgb;
use crate::error::FrameError;
use crate::world::ScreenWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel {
    pub coordinate: Coordinate,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScreenMessage {
    Clear,
    DrawPixel { pixel: Pixel },
}

impl ScreenWindow<'_> {
    /// One pixel per live cell, window-relative.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.live_cells().map(|(x, y, cell)| Pixel {
            coordinate: Coordinate { x, y },
            color: cell.color(),
        })
    }
}

/// Output side of the driver loop: anything that can take screen messages.
pub trait FrameSink {
    fn publish(&mut self, message: &ScreenMessage) -> Result<(), FrameError>;

    /// Called once after every complete frame.
    fn flush(&mut self) -> Result<(), FrameError> {
        Ok(())
    }

    /// Sends a whole window as a clear followed by its live pixels.
    /// Returns the number of pixels sent.
    fn send_window(&mut self, window: &ScreenWindow<'_>) -> Result<usize, FrameError> {
        self.publish(&ScreenMessage::Clear)?;
        let mut sent = 0;
        for pixel in window.pixels() {
            self.publish(&ScreenMessage::DrawPixel { pixel })?;
            sent += 1;
        }
        self.flush()?;
        Ok(sent)
    }
}

/// Writes each message as one line of JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn publish(&mut self, message: &ScreenMessage) -> Result<(), FrameError> {
        // Encode before writing so writer failures surface as IO errors
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), FrameError> {
        self.writer.flush()?;
        Ok(())
    }
}
