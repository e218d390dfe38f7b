// config.rs - Runtime settings: world policy, screen window and frame rate

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use conway::WorldConfig;
use serde::{Deserialize, Serialize};

/// Part of the world that is shown on the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub origin_x: usize,
    pub origin_y: usize,
    pub cols: usize,
    pub rows: usize,
}

impl Default for WindowConfig {
    // 32x32 display with a 3-cell margin on a 38x38 world
    fn default() -> Self {
        Self {
            origin_x: 3,
            origin_y: 3,
            cols: 32,
            rows: 32,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub window: WindowConfig,
    /// Delay between frames in milliseconds.
    pub interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            window: WindowConfig::default(),
            interval_ms: 1000,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        self.world.validate()?;
        if self.interval_ms == 0 {
            bail!("interval_ms must be positive");
        }
        let WindowConfig { origin_x, origin_y, cols, rows } = self.window;
        let fits_x = origin_x.checked_add(cols).is_some_and(|end| end <= self.world.width);
        let fits_y = origin_y.checked_add(rows).is_some_and(|end| end <= self.world.height);
        if !fits_x || !fits_y {
            bail!(
                "window {cols}x{rows} at ({origin_x}, {origin_y}) does not fit in a {}x{} world",
                self.world.width,
                self.world.height
            );
        }
        Ok(())
    }
}
