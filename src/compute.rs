/// Game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameWorld` (plus the clock and, where needed, an RNG handle) and returns a
/// brand-new `GameWorld`. Side effects are limited to the injected RNG.

use std::sync::Arc;

use rand::Rng;

use crate::audio::SoundCue;
use crate::entities::{Enemy, GameWorld, OrbitAnchor, Player, Projectile, RoundState};
use crate::input::Intent;
use crate::settings::Settings;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the opening world: a full-health kitty, the boss and its ring of
/// minions, nothing in flight.
pub fn init_state(settings: Arc<Settings>, now_ms: u64, rng: &mut impl Rng) -> GameWorld {
    let (enemies, anchor) = spawn_octos(&settings, now_ms, rng);
    tracing::info!(minions = enemies.len() - 1, "round started");
    GameWorld {
        kitty: Player::new(&settings),
        enemies,
        bullets: Vec::new(),
        projectiles: Vec::new(),
        anchor,
        state: RoundState::Playing,
        blast_center: None,
        cues: vec![SoundCue::MusicStart],
        settings,
    }
}

/// The boss a little above screen centre, then `minion_count` minions spaced
/// evenly around it. Also returns the orbit the minions will follow.
pub fn spawn_octos(
    settings: &Settings,
    now_ms: u64,
    rng: &mut impl Rng,
) -> (Vec<Enemy>, OrbitAnchor) {
    let boss = Enemy::boss(
        settings.screen_width as f32 / 2.0,
        settings.screen_height as f32 / 2.0 - settings.boss_start_offset_y as f32,
        settings,
        now_ms,
        rng,
    );
    let anchor = OrbitAnchor::around(&boss.rect, settings);

    let count = settings.minion_count;
    let step = if count > 0 { 360.0 / count as f32 } else { 0.0 };
    let mut enemies = Vec::with_capacity(count + 1);
    enemies.push(boss);
    for i in 0..count {
        enemies.push(Enemy::minion(&anchor, i as f32 * step, settings, now_ms, rng));
    }
    (enemies, anchor)
}

// ── Input-driven transitions ────────────────────────────────────────────────

/// Fire a bullet from the kitty's nose. Ignored outside play or when
/// `bullets_allowed` bullets are already in flight.
pub fn fire_bullet(state: &GameWorld) -> GameWorld {
    if state.state != RoundState::Playing {
        return state.clone();
    }
    if state.bullets.len() >= state.settings.bullets_allowed {
        tracing::debug!(in_flight = state.bullets.len(), "fire blocked");
        return state.clone();
    }
    let mut next = state.clone();
    next.bullets.push(Projectile::bullet(&next.kitty.rect, &next.settings));
    next.cues.push(SoundCue::BulletFired);
    tracing::debug!(x = next.kitty.rect.center_x(), "bullet fired");
    next
}

/// Start a fresh round from either end screen. The kitty keeps its position
/// but gets full health back; the octos are rebuilt from scratch.
pub fn restart(state: &GameWorld, now_ms: u64, rng: &mut impl Rng) -> GameWorld {
    if !state.state.is_game_over() {
        return state.clone();
    }
    let mut next = state.clone();
    let (enemies, anchor) = spawn_octos(&next.settings, now_ms, rng);
    next.kitty.reset();
    next.enemies = enemies;
    next.anchor = anchor;
    next.bullets.clear();
    next.projectiles.clear();
    next.blast_center = None;
    next.state = RoundState::Playing;
    tracing::info!(previous = ?state.state, "round restarted");
    next
}

// ── Per-frame tick ──────────────────────────────────────────────────────────

/// Advance the simulation by one frame. `now_ms` is the monotonic clock the
/// octo fire timers run on; all randomness comes through `rng`.
pub fn tick(state: &GameWorld, intent: Intent, now_ms: u64, rng: &mut impl Rng) -> GameWorld {
    let mut next = state.clone();

    match next.state {
        RoundState::Playing => {
            advance_entities(&mut next, intent, now_ms, rng);
            resolve_bullet_hits(&mut next);
            if next.state == RoundState::Playing {
                resolve_kitty_hits(&mut next);
            }
        }
        RoundState::BossDefeatAnimation { frame, ticks } => {
            next.state = advance_blast(frame, ticks, &next.settings);
            if next.state.is_game_over() {
                tracing::info!("octo has been defeated");
            }
        }
        RoundState::GameOverPlayerDead | RoundState::GameOverBossDead => {}
    }
    next
}

// ── 1–2. Intent and movement ─────────────────────────────────────────────────

fn advance_entities(world: &mut GameWorld, intent: Intent, now_ms: u64, rng: &mut impl Rng) {
    let settings = Arc::clone(&world.settings);

    world.kitty.set_intent(intent.left, intent.right);
    world.kitty.advance(&settings);

    for p in world.bullets.iter_mut().chain(world.projectiles.iter_mut()) {
        p.advance();
    }
    world.bullets.retain(|b| !b.out_of_bounds(&settings));
    world.projectiles.retain(|p| !p.out_of_bounds(&settings));

    let anchor = world.anchor;
    for enemy in world.enemies.iter_mut() {
        enemy.advance(&anchor, &settings);
        if let Some(shot) = enemy.maybe_fire(now_ms, &settings, rng) {
            tracing::debug!(kind = ?enemy.kind, x = shot.rect.center_x(), "octo fired");
            world.projectiles.push(shot);
        }
    }
}

// ── 3. Bullets ↔ octos ───────────────────────────────────────────────────────

/// Every overlapping (bullet, octo) pair lands a hit, so one bullet touching
/// two octos damages both. Bullets that hit anything are consumed.
fn resolve_bullet_hits(world: &mut GameWorld) {
    let mut hits = vec![0u32; world.enemies.len()];
    let enemies = &world.enemies;
    world.bullets.retain(|bullet| {
        let mut consumed = false;
        for (i, enemy) in enemies.iter().enumerate() {
            if bullet.rect.intersects(&enemy.rect) {
                hits[i] += 1;
                consumed = true;
            }
        }
        !consumed
    });

    for (enemy, &count) in world.enemies.iter_mut().zip(hits.iter()) {
        for _ in 0..count {
            enemy.apply_hit();
        }
        if count > 0 {
            tracing::debug!(kind = ?enemy.kind, health = enemy.health, "octo hit");
        }
    }

    let mut boss_down = None;
    world.enemies.retain(|enemy| {
        if !enemy.is_defeated() {
            return true;
        }
        if enemy.is_boss() {
            boss_down = Some((enemy.rect.center_x(), enemy.rect.center_y()));
        }
        false
    });

    if let Some(center) = boss_down {
        tracing::info!(x = center.0, y = center.1, "boss defeated");
        world.blast_center = Some(center);
        world.state = RoundState::BossDefeatAnimation { frame: 0, ticks: 0 };
        world.cues.push(SoundCue::BossDefeated);
    }
}

// ── 4. Octo shots ↔ kitty ────────────────────────────────────────────────────

fn resolve_kitty_hits(world: &mut GameWorld) {
    let kitty_rect = world.kitty.rect;
    let before = world.projectiles.len();
    world.projectiles.retain(|p| !p.rect.intersects(&kitty_rect));
    let hits = before - world.projectiles.len();

    for _ in 0..hits {
        world.kitty.apply_damage(1);
        world.cues.push(SoundCue::KittyHit);
    }
    if hits > 0 {
        tracing::debug!(health = world.kitty.health, "kitty hit");
    }
    if world.kitty.is_dead() {
        tracing::info!("kitty defeated");
        world.state = RoundState::GameOverPlayerDead;
    }
}

// ── Boss blast ───────────────────────────────────────────────────────────────

/// Step the blast animation one tick; hands over to the end screen after the
/// last frame has been shown for its full duration.
fn advance_blast(frame: u32, ticks: u32, settings: &Settings) -> RoundState {
    let ticks = ticks + 1;
    if ticks < settings.blast_frame_ticks() {
        return RoundState::BossDefeatAnimation { frame, ticks };
    }
    let frame = frame + 1;
    if frame >= settings.blast_frames {
        RoundState::GameOverBossDead
    } else {
        RoundState::BossDefeatAnimation { frame, ticks: 0 }
    }
}
