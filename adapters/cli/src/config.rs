//! Simulation settings read from an optional TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use gym_floor_core::{Odds, Timings};
use gym_floor_system_spawning::WaveSchedule;
use gym_floor_world::TileMap;
use serde::Deserialize;

/// Everything the headless runner needs to build a floor and drive it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationConfig {
    /// Seed of the world's random source.
    pub(crate) seed: u64,
    /// Fixed simulation steps per real second.
    pub(crate) ticks_per_second: u32,
    /// Simulated seconds to run; one second is one game minute.
    pub(crate) duration_secs: u64,
    /// ASCII layout replacing the built-in floor.
    pub(crate) layout: Option<PathBuf>,
    pub(crate) odds: Odds,
    pub(crate) timings: Timings,
    pub(crate) schedule: WaveSchedule,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            ticks_per_second: 10,
            // 05:00 until closing at 23:00
            duration_secs: 18 * 60,
            layout: None,
            odds: Odds::default(),
            timings: Timings::default(),
            schedule: WaveSchedule::default(),
        }
    }
}

impl SimulationConfig {
    /// Reads the file and resolves a relative layout path against its folder.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        if let (Some(layout), Some(folder)) = (config.layout.as_mut(), path.parent()) {
            *layout = folder.join(&*layout);
        }
        Ok(config)
    }

    pub(crate) fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        ensure!(config.ticks_per_second > 0, "ticks_per_second must be positive");
        Ok(config)
    }

    /// Length of one simulation step.
    pub(crate) fn tick(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second
    }

    /// Number of steps covering the configured duration.
    pub(crate) fn total_ticks(&self) -> u64 {
        self.duration_secs
            .saturating_mul(u64::from(self.ticks_per_second))
    }

    /// Loads the configured layout or falls back to the built-in gym.
    pub(crate) fn tiles(&self) -> Result<TileMap> {
        match &self.layout {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read layout {}", path.display()))?;
                TileMap::parse(&text)
                    .with_context(|| format!("invalid layout {}", path.display()))
            }
            None => TileMap::gym().context("built-in layout is invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = SimulationConfig::from_toml("").expect("config");
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.tick(), Duration::from_millis(100));
        assert_eq!(config.total_ticks(), 10_800);
    }

    #[test]
    fn sections_override_single_fields() {
        let config = SimulationConfig::from_toml(
            r#"
seed = 7
duration_secs = 60

[odds]
bench_dirty = 0.5

[timings]
stay_secs = 30.0

[schedule]
population_cap = 4
"#,
        )
        .expect("config");

        assert_eq!(config.seed, 7);
        assert_eq!(config.odds.bench_dirty, 0.5);
        assert_eq!(config.odds.treadmill_left_running, Odds::default().treadmill_left_running);
        assert_eq!(config.timings.stay_secs, 30.0);
        assert_eq!(config.schedule.population_cap, 4);
        assert_eq!(config.schedule.peaks, WaveSchedule::default().peaks);
    }

    #[test]
    fn rejects_unknown_keys_and_stalled_ticks() {
        assert!(SimulationConfig::from_toml("speed = 3").is_err());
        assert!(SimulationConfig::from_toml("ticks_per_second = 0").is_err());
    }

    #[test]
    fn missing_layout_reports_the_path() {
        let config = SimulationConfig {
            layout: Some(PathBuf::from("does/not/exist.txt")),
            ..SimulationConfig::default()
        };
        let error = config.tiles().expect_err("layout is missing");
        assert!(error.to_string().contains("does/not/exist.txt"));
    }
}
