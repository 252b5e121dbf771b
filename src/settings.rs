//! Game tunables. Loaded once at startup and never mutated afterwards.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{GameError, Result};

/// File the binary looks for in the working directory.
pub const SETTINGS_FILE: &str = "alien_kitty.toml";

/// An RGB triple, written as `[r, g, b]` in the settings file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    // ── Screen ───────────────────────────────────────────────────────────────
    pub screen_width: i32,
    pub screen_height: i32,
    /// Margin kept clear around every game element.
    pub margin: i32,
    pub outer_border_color: Rgb,
    pub outer_border_thickness: i32,
    pub inner_border_color: Rgb,
    pub inner_border_thickness: i32,
    pub gradient_start_color: Rgb,
    pub gradient_end_color: Rgb,
    pub star_count: usize,

    // ── Kitty ────────────────────────────────────────────────────────────────
    pub kitty_speed: f32,
    pub kitty_size: (i32, i32),
    pub max_kitty_health: u32,
    pub kitty_health_bar_length: i32,
    pub kitty_health_bar_height: i32,

    // ── Bullets (kitty) ──────────────────────────────────────────────────────
    pub bullet_speed: f32,
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_color: Rgb,
    pub bullets_allowed: usize,

    // ── Octos ────────────────────────────────────────────────────────────────
    pub boss_alien_size: (i32, i32),
    pub small_alien_size: (i32, i32),
    pub max_boss_health: u32,
    pub boss_health_bar_length: i32,
    pub boss_health_bar_height: i32,
    pub max_minion_health: u32,
    pub minion_health_bar_length: i32,
    pub minion_health_bar_height: i32,
    pub minion_count: usize,
    /// Degrees a minion advances along its orbit each tick.
    pub minion_angle_step: f32,
    /// Horizontal pixels per tick for the boss bounce.
    pub boss_speed: i32,
    /// How far above the screen centre the boss spawns.
    pub boss_start_offset_y: i32,
    pub shoot_delay_min_ms: u64,
    pub shoot_delay_max_ms: u64,
    /// Ticks an octo flashes after being hit.
    pub hit_flash_duration: u32,

    // ── Projectiles (octos) ──────────────────────────────────────────────────
    pub projectile_speed: f32,
    pub projectile_color: Rgb,
    /// Radius; the projectile's rect is twice this on each side.
    pub projectile_size: i32,

    // ── Boss blast ───────────────────────────────────────────────────────────
    pub blast_frames: u32,
    pub blast_frame_ms: u64,

    // ── Loop & sound ─────────────────────────────────────────────────────────
    pub tick_rate: u32,
    /// Ring the terminal bell for hit and defeat cues.
    pub bell: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            screen_width: 900,
            screen_height: 800,
            margin: 20,
            outer_border_color: Rgb(183, 34, 108),
            outer_border_thickness: 10,
            inner_border_color: Rgb(38, 55, 120),
            inner_border_thickness: 8,
            gradient_start_color: Rgb(25, 25, 112),
            gradient_end_color: Rgb(0, 0, 0),
            star_count: 20,

            kitty_speed: 2.5,
            kitty_size: (64, 64),
            max_kitty_health: 3,
            kitty_health_bar_length: 150,
            kitty_health_bar_height: 20,

            bullet_speed: 4.0,
            bullet_width: 5,
            bullet_height: 20,
            bullet_color: Rgb(255, 248, 231),
            bullets_allowed: 3,

            boss_alien_size: (400, 400),
            small_alien_size: (100, 100),
            max_boss_health: 30,
            boss_health_bar_length: 600,
            boss_health_bar_height: 15,
            max_minion_health: 5,
            minion_health_bar_length: 50,
            minion_health_bar_height: 5,
            minion_count: 5,
            minion_angle_step: 0.5,
            boss_speed: 1,
            boss_start_offset_y: 100,
            shoot_delay_min_ms: 5000,
            shoot_delay_max_ms: 10000,
            hit_flash_duration: 10,

            projectile_speed: 1.5,
            projectile_color: Rgb(255, 0, 0),
            projectile_size: 10,

            blast_frames: 3,
            blast_frame_ms: 200,

            tick_rate: 60,
            bell: false,
        }
    }
}

impl Settings {
    /// Parse a (possibly partial) TOML document. Keys that are absent keep
    /// their default values.
    pub fn from_toml_str(text: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`. A missing file is not an error and yields
    /// the defaults.
    pub fn load(path: &Path) -> Result<Settings> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Settings::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: impl Into<String>) -> Result<()> {
            Err(GameError::InvalidSettings(msg.into()))
        }

        if self.screen_width <= 0 || self.screen_height <= 0 {
            return invalid("screen dimensions must be positive");
        }
        if self.margin < 0 || self.outer_border_thickness < 0 || self.inner_border_thickness < 0 {
            return invalid("margin and border thickness must not be negative");
        }
        for (name, (w, h)) in [
            ("kitty_size", self.kitty_size),
            ("boss_alien_size", self.boss_alien_size),
            ("small_alien_size", self.small_alien_size),
            ("bullet size", (self.bullet_width, self.bullet_height)),
        ] {
            if w <= 0 || h <= 0 {
                return invalid(format!("{name} must be positive"));
            }
        }
        if self.projectile_size <= 0 {
            return invalid("projectile_size must be positive");
        }
        for (name, speed) in [
            ("kitty_speed", self.kitty_speed),
            ("bullet_speed", self.bullet_speed),
            ("projectile_speed", self.projectile_speed),
        ] {
            if !(speed.is_finite() && speed > 0.0) {
                return invalid(format!("{name} must be a positive number"));
            }
        }
        if !self.minion_angle_step.is_finite() {
            return invalid("minion_angle_step must be finite");
        }
        if self.boss_speed <= 0 {
            return invalid("boss_speed must be positive");
        }
        if self.max_kitty_health == 0 || self.max_boss_health == 0 || self.max_minion_health == 0
        {
            return invalid("health maxima must be at least 1");
        }
        if self.shoot_delay_min_ms > self.shoot_delay_max_ms {
            return invalid("shoot_delay_min_ms exceeds shoot_delay_max_ms");
        }
        if self.blast_frames == 0 {
            return invalid("blast_frames must be at least 1");
        }
        if self.tick_rate == 0 {
            return invalid("tick_rate must be at least 1");
        }
        if !matches!(self.blast_ticks_exact(), Some(t) if t <= u32::MAX as u64) {
            return invalid("blast_frame_ms is too long");
        }
        if self.boss_alien_size.0 >= self.screen_width {
            return invalid("boss is wider than the screen");
        }
        if self.screen_width - 2 * self.margin < self.kitty_size.0 {
            return invalid("play field is narrower than the kitty");
        }
        if self.bottom_bound() <= self.top_bound() {
            return invalid("borders and margin leave no play field");
        }
        Ok(())
    }

    /// Row at or above which a bullet is discarded.
    pub fn top_bound(&self) -> i32 {
        self.margin + self.outer_border_thickness + 2 * self.inner_border_thickness
    }

    /// Row at or below which an octo projectile is discarded.
    pub fn bottom_bound(&self) -> i32 {
        self.screen_height - self.top_bound()
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate as f64)
    }

    /// Ticks each blast frame stays on screen (never zero).
    pub fn blast_frame_ticks(&self) -> u32 {
        self.blast_ticks_exact()
            .map_or(u32::MAX, |ticks| u32::try_from(ticks).unwrap_or(u32::MAX))
            .max(1)
    }

    /// Blast frame length in ticks, or `None` if it doesn't fit in a `u64`.
    fn blast_ticks_exact(&self) -> Option<u64> {
        self.blast_frame_ms
            .checked_mul(self.tick_rate as u64)
            .map(|product| product / 1000)
    }
}
