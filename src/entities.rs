/// Game entities and the world that owns them.
///
/// Each entity carries the small amount of behaviour that touches only its
/// own fields (moving, taking a hit, firing on its timer). Anything that
/// looks at more than one entity lives in `compute`.

use std::sync::Arc;

use rand::Rng;

use crate::audio::SoundCue;
use crate::geometry::Rect;
use crate::settings::Settings;

// ── Kitty ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    /// Exact horizontal position; `rect.x` is this value truncated.
    pub x: f32,
    pub rect: Rect,
    pub health: u32,
    pub max_health: u32,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Player {
    /// A kitty standing at the bottom centre of the play field.
    pub fn new(settings: &Settings) -> Self {
        let (w, h) = settings.kitty_size;
        let rect = Rect::from_midbottom(
            settings.screen_width / 2,
            settings.screen_height - settings.margin,
            w,
            h,
        );
        Player {
            x: rect.x as f32,
            rect,
            health: settings.max_kitty_health,
            max_health: settings.max_kitty_health,
            moving_left: false,
            moving_right: false,
        }
    }

    pub fn set_intent(&mut self, left: bool, right: bool) {
        self.moving_left = left;
        self.moving_right = right;
    }

    /// Step toward the held direction, clamped to the margins. Holding both
    /// directions at once cancels out.
    pub fn advance(&mut self, settings: &Settings) {
        let mut dx = 0.0;
        if self.moving_right {
            dx += settings.kitty_speed;
        }
        if self.moving_left {
            dx -= settings.kitty_speed;
        }
        let min_x = settings.margin as f32;
        let max_x = (settings.screen_width - settings.margin - self.rect.w) as f32;
        self.x = (self.x + dx).clamp(min_x, max_x);
        self.rect.x = self.x as i32;
    }

    /// Lose `amount` health, stopping at zero.
    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Restore full health. Position is left alone.
    pub fn reset(&mut self) {
        self.health = self.max_health;
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    /// Fired upward by the kitty.
    Bullet,
    /// Fired downward by an octo.
    EnemyShot,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub kind: ProjectileKind,
    /// Exact vertical position; `rect.y` is this value truncated.
    pub y: f32,
    pub rect: Rect,
    pub speed: f32,
}

impl Projectile {
    /// A bullet leaving the top centre of `shooter`.
    pub fn bullet(shooter: &Rect, settings: &Settings) -> Self {
        let rect = Rect::from_midtop(
            shooter.center_x(),
            shooter.top(),
            settings.bullet_width,
            settings.bullet_height,
        );
        Projectile {
            kind: ProjectileKind::Bullet,
            y: rect.y as f32,
            rect,
            speed: settings.bullet_speed,
        }
    }

    /// An octo shot centred on (`cx`, `cy`).
    pub fn enemy_shot(cx: i32, cy: i32, settings: &Settings) -> Self {
        let size = settings.projectile_size * 2;
        let rect = Rect::from_center(cx as f32, cy as f32, size, size);
        Projectile {
            kind: ProjectileKind::EnemyShot,
            y: rect.y as f32,
            rect,
            speed: settings.projectile_speed,
        }
    }

    pub fn advance(&mut self) {
        match self.kind {
            ProjectileKind::Bullet => self.y -= self.speed,
            ProjectileKind::EnemyShot => self.y += self.speed,
        }
        self.rect.y = self.y.floor() as i32;
    }

    /// True once the projectile has reached its exit boundary. The boundary
    /// itself counts as outside.
    pub fn out_of_bounds(&self, settings: &Settings) -> bool {
        match self.kind {
            ProjectileKind::Bullet => self.rect.top() <= settings.top_bound(),
            ProjectileKind::EnemyShot => self.rect.top() >= settings.bottom_bound(),
        }
    }
}

// ── Octos ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Boss,
    Minion,
}

/// Fixed centre and radius the minions circle around. Taken from the boss's
/// spawn position and never updated as the boss moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitAnchor {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

impl OrbitAnchor {
    /// Largest circle around `boss` that keeps a minion inside the margins.
    pub fn around(boss: &Rect, settings: &Settings) -> Self {
        let cx = boss.center_x();
        let cy = boss.center_y();
        let half_w = settings.small_alien_size.0 / 2;
        let half_h = settings.small_alien_size.1 / 2;
        let margin = settings.margin;
        let radius = [
            cx - margin - half_w,
            settings.screen_width - cx - margin - half_w,
            cy - margin - half_h,
            settings.screen_height - cy - margin - half_h,
        ]
        .into_iter()
        .min()
        .unwrap_or(0);
        OrbitAnchor {
            cx: cx as f32,
            cy: cy as f32,
            radius: radius as f32,
        }
    }

    /// Point on the orbit at `angle` degrees.
    pub fn point_at(&self, angle: f32) -> (f32, f32) {
        let rad = angle.to_radians();
        (
            self.cx + self.radius * rad.cos(),
            self.cy + self.radius * rad.sin(),
        )
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub rect: Rect,
    pub health: u32,
    pub max_health: u32,
    /// Orbit position in degrees, `[0, 360)`. Minions only.
    pub angle: f32,
    /// Horizontal step per tick; the sign flips on a wall bounce. Boss only.
    pub velocity: i32,
    /// The octo fires on the first tick strictly after this instant.
    pub next_shot_ms: u64,
    /// Ticks elapsed in the current hit flash, if one is running.
    pub flash: Option<u32>,
}

impl Enemy {
    pub fn boss(cx: f32, cy: f32, settings: &Settings, now_ms: u64, rng: &mut impl Rng) -> Self {
        let (w, h) = settings.boss_alien_size;
        Enemy {
            kind: EnemyKind::Boss,
            rect: Rect::from_center(cx, cy, w, h),
            health: settings.max_boss_health,
            max_health: settings.max_boss_health,
            angle: 0.0,
            velocity: settings.boss_speed,
            next_shot_ms: first_shot_at(settings, now_ms, rng),
            flash: None,
        }
    }

    pub fn minion(
        anchor: &OrbitAnchor,
        angle: f32,
        settings: &Settings,
        now_ms: u64,
        rng: &mut impl Rng,
    ) -> Self {
        let (w, h) = settings.small_alien_size;
        let (x, y) = anchor.point_at(angle);
        Enemy {
            kind: EnemyKind::Minion,
            rect: Rect::from_center(x, y, w, h),
            health: settings.max_minion_health,
            max_health: settings.max_minion_health,
            angle,
            velocity: 0,
            next_shot_ms: first_shot_at(settings, now_ms, rng),
            flash: None,
        }
    }

    /// Move one tick and run down any hit flash. The boss bounces between the
    /// screen edges; minions step along `anchor`.
    pub fn advance(&mut self, anchor: &OrbitAnchor, settings: &Settings) {
        match self.kind {
            EnemyKind::Boss => {
                self.rect.x += self.velocity;
                if self.rect.right() >= settings.screen_width || self.rect.left() <= 0 {
                    self.velocity = -self.velocity;
                }
            }
            EnemyKind::Minion => {
                self.angle = (self.angle + settings.minion_angle_step).rem_euclid(360.0);
                let (x, y) = anchor.point_at(self.angle);
                self.rect.x = (x - self.rect.w as f32 / 2.0) as i32;
                self.rect.y = (y - self.rect.h as f32 / 2.0) as i32;
            }
        }

        if let Some(counter) = self.flash {
            let counter = counter + 1;
            self.flash = if counter >= settings.hit_flash_duration {
                None
            } else {
                Some(counter)
            };
        }
    }

    /// Fire a shot straight down if the timer has run out, then schedule the
    /// next one.
    pub fn maybe_fire(
        &mut self,
        now_ms: u64,
        settings: &Settings,
        rng: &mut impl Rng,
    ) -> Option<Projectile> {
        if now_ms <= self.next_shot_ms {
            return None;
        }
        self.next_shot_ms = now_ms + shoot_delay(settings, rng);
        Some(Projectile::enemy_shot(
            self.rect.center_x(),
            self.rect.bottom(),
            settings,
        ))
    }

    /// Every hit costs exactly one health point and restarts the flash.
    pub fn apply_hit(&mut self) {
        self.health = self.health.saturating_sub(1);
        self.flash = Some(0);
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    /// Whether the red tint is showing on this tick of the flash.
    pub fn is_tinted(&self) -> bool {
        matches!(self.flash, Some(c) if c > 0 && c % 2 == 0)
    }
}

fn shoot_delay(settings: &Settings, rng: &mut impl Rng) -> u64 {
    rng.gen_range(settings.shoot_delay_min_ms..=settings.shoot_delay_max_ms)
}

/// First deadline, pulled forward by a random part of the delay so octos
/// spawned together don't fire together.
fn first_shot_at(settings: &Settings, now_ms: u64, rng: &mut impl Rng) -> u64 {
    let delay = shoot_delay(settings, rng);
    let stagger = rng.gen_range(0..=delay);
    now_ms + delay - stagger
}

// ── Round & world ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    Playing,
    /// The boss just died; the blast is playing out before the end screen.
    BossDefeatAnimation { frame: u32, ticks: u32 },
    GameOverPlayerDead,
    GameOverBossDead,
}

impl RoundState {
    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            RoundState::GameOverPlayerDead | RoundState::GameOverBossDead
        )
    }
}

/// Everything one round of the game needs. Cloneable so the update functions
/// in `compute` can hand back a new world without touching the old one.
#[derive(Clone, Debug)]
pub struct GameWorld {
    pub settings: Arc<Settings>,
    pub kitty: Player,
    /// Boss and minions; defeated octos are removed.
    pub enemies: Vec<Enemy>,
    /// The kitty's bullets in flight.
    pub bullets: Vec<Projectile>,
    /// Octo shots in flight.
    pub projectiles: Vec<Projectile>,
    pub anchor: OrbitAnchor,
    pub state: RoundState,
    /// Where the boss blast is drawn while it plays.
    pub blast_center: Option<(i32, i32)>,
    /// Sounds requested since the last drain.
    pub cues: Vec<SoundCue>,
}

impl GameWorld {
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }

    pub fn minions(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.kind == EnemyKind::Minion)
    }

    /// Hand the queued sound cues to the caller.
    pub fn take_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }
}
