use std::sync::Arc;

use alien_kitty::audio::SoundCue;
use alien_kitty::compute::*;
use alien_kitty::entities::*;
use alien_kitty::geometry::Rect;
use alien_kitty::input::Intent;
use alien_kitty::settings::Settings;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Fresh world at t=0 with the opening music cue already drained. At t=0 no
/// octo timer can have expired, so nothing fires unless a test moves the clock.
fn make_world(rng: &mut StdRng) -> GameWorld {
    let mut w = init_state(Arc::new(Settings::default()), 0, rng);
    w.take_cues();
    w
}

fn idle() -> Intent {
    Intent::default()
}

/// A bullet whose top-centre sits at (`cx`, `top`).
fn bullet_at(world: &GameWorld, cx: i32, top: i32) -> Projectile {
    Projectile::bullet(&Rect::new(cx - 10, top, 20, 20), &world.settings)
}

/// An octo shot centred on the kitty.
fn shot_on_kitty(world: &GameWorld) -> Projectile {
    let k = world.kitty.rect;
    Projectile::enemy_shot(k.center_x(), k.center_y(), &world.settings)
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_spawns_boss_and_minion_ring() {
    let mut rng = seeded_rng();
    let w = init_state(Arc::new(Settings::default()), 0, &mut rng);

    assert_eq!(w.state, RoundState::Playing);
    assert_eq!(w.enemies.len(), 6);
    let boss = w.boss().expect("boss spawned");
    assert_eq!((boss.rect.center_x(), boss.rect.center_y()), (450, 300));

    let angles: Vec<f32> = w.minions().map(|m| m.angle).collect();
    assert_eq!(angles, vec![0.0, 72.0, 144.0, 216.0, 288.0]);
    assert_eq!(w.anchor.radius, 230.0);

    assert!(w.bullets.is_empty());
    assert!(w.projectiles.is_empty());
    assert_eq!(w.kitty.health, 3);
    assert_eq!(w.cues, vec![SoundCue::MusicStart]);
}

// ── fire_bullet ───────────────────────────────────────────────────────────────

#[test]
fn fire_is_capped_at_bullets_allowed() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    for _ in 0..5 {
        w = fire_bullet(&w);
    }
    assert_eq!(w.bullets.len(), w.settings.bullets_allowed);
    let fired = w.cues.iter().filter(|c| **c == SoundCue::BulletFired).count();
    assert_eq!(fired, 3);
}

#[test]
fn fire_does_not_mutate_original() {
    let mut rng = seeded_rng();
    let w = make_world(&mut rng);
    let _w2 = fire_bullet(&w);
    assert!(w.bullets.is_empty());
}

#[test]
fn fire_ignored_outside_play() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    w.state = RoundState::GameOverPlayerDead;
    let w = fire_bullet(&w);
    assert!(w.bullets.is_empty());
}

#[test]
fn bullet_cap_holds_while_ticking() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    for _ in 0..300 {
        w = fire_bullet(&w);
        w = tick(&w, idle(), 0, &mut rng);
        assert!(w.bullets.len() <= w.settings.bullets_allowed);
    }
}

#[test]
fn missed_bullet_expires_at_top() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    // Far left of the field: clear of the boss and the minion orbit
    w.kitty.x = 20.0;
    w.kitty.rect.x = 20;
    w = fire_bullet(&w);

    for _ in 0..200 {
        w = tick(&w, idle(), 0, &mut rng);
    }
    assert!(w.bullets.is_empty());
    assert!(w.enemies.iter().all(|e| e.health == e.max_health));
}

// ── tick: movement ────────────────────────────────────────────────────────────

#[test]
fn tick_applies_intent() {
    let mut rng = seeded_rng();
    let w = make_world(&mut rng);
    let start = w.kitty.x;
    let w = tick(&w, Intent { left: false, right: true }, 0, &mut rng);
    assert_eq!(w.kitty.x, start + 2.5);
    assert!(w.kitty.moving_right);
}

#[test]
fn minion_angle_wraps_through_tick() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    w.enemies[1].angle = 358.0;

    let mut seen = Vec::new();
    for _ in 0..4 {
        w = tick(&w, idle(), 0, &mut rng);
        seen.push(w.enemies[1].angle);
    }
    assert_eq!(seen, vec![358.5, 359.0, 359.5, 0.0]);
}

#[test]
fn orbit_stays_anchored_while_boss_moves() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    let anchor = w.anchor;

    for i in 0..300 {
        if i == 150 {
            // Shove the boss somewhere else entirely
            w.enemies[0].rect.x += 120;
        }
        w = tick(&w, idle(), 0, &mut rng);
        assert_eq!(w.anchor, anchor);
        for m in w.minions() {
            let dx = m.rect.center_x() as f32 - anchor.cx;
            let dy = m.rect.center_y() as f32 - anchor.cy;
            let dist = (dx * dx + dy * dy).sqrt();
            assert!((dist - anchor.radius).abs() < 2.0, "minion drifted to {dist}");
        }
    }
}

#[test]
fn octos_fire_when_clock_passes_deadline() {
    let mut rng = seeded_rng();
    let w = make_world(&mut rng);
    let w = tick(&w, idle(), 20_000, &mut rng);

    assert_eq!(w.projectiles.len(), 6);
    assert!(w
        .projectiles
        .iter()
        .all(|p| p.kind == ProjectileKind::EnemyShot));
    for e in &w.enemies {
        assert!(e.next_shot_ms >= 20_000 + w.settings.shoot_delay_min_ms);
    }

    // Nobody is due again a moment later
    let w = tick(&w, idle(), 20_016, &mut rng);
    assert_eq!(w.projectiles.len(), 6);
}

// ── tick: bullets ↔ octos ─────────────────────────────────────────────────────

#[test]
fn bullet_hit_costs_one_health() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    let b = bullet_at(&w, 450, 300);
    w.bullets.push(b);

    let w = tick(&w, idle(), 0, &mut rng);
    assert!(w.bullets.is_empty());
    let boss = w.boss().expect("boss alive");
    assert_eq!(boss.health, 29);
    assert_eq!(boss.flash, Some(0));
    assert_eq!(w.state, RoundState::Playing);
}

#[test]
fn two_bullets_on_one_octo_land_two_hits() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    let b1 = bullet_at(&w, 440, 300);
    let b2 = bullet_at(&w, 460, 300);
    w.bullets.push(b1);
    w.bullets.push(b2);

    let w = tick(&w, idle(), 0, &mut rng);
    assert!(w.bullets.is_empty());
    assert_eq!(w.boss().map(|b| b.health), Some(28));
}

#[test]
fn one_bullet_can_hit_two_octos_in_one_tick() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    // This minion reaches 180°, overlapping the boss's left side
    w.enemies[1].angle = 179.5;
    let b = bullet_at(&w, 260, 300);
    w.bullets.push(b);

    let w = tick(&w, idle(), 0, &mut rng);
    assert!(w.bullets.is_empty());
    assert_eq!(w.enemies[0].health, 29);
    assert_eq!(w.enemies[1].health, 4);
}

#[test]
fn defeated_minion_is_removed_round_continues() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    w.enemies[1].angle = 359.5;
    w.enemies[1].health = 1;
    let b = bullet_at(&w, 680, 300);
    w.bullets.push(b);

    let w = tick(&w, idle(), 0, &mut rng);
    assert_eq!(w.enemies.len(), 5);
    assert_eq!(w.minions().count(), 4);
    assert!(w.boss().is_some());
    assert_eq!(w.state, RoundState::Playing);
}

#[test]
fn boss_defeat_plays_blast_then_ends_round() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    w.enemies[0].health = 1;
    let b = bullet_at(&w, 450, 300);
    w.bullets.push(b);

    w = tick(&w, idle(), 0, &mut rng);
    assert!(w.boss().is_none());
    assert_eq!(w.state, RoundState::BossDefeatAnimation { frame: 0, ticks: 0 });
    assert_eq!(w.blast_center, Some((451, 300)));
    assert_eq!(w.take_cues(), vec![SoundCue::BossDefeated]);

    // 3 frames × 12 ticks; nothing moves while the blast plays
    let kitty_x = w.kitty.x;
    for i in 1..36 {
        w = tick(&w, Intent { left: false, right: true }, 0, &mut rng);
        assert!(
            matches!(w.state, RoundState::BossDefeatAnimation { .. }),
            "ended early at tick {i}"
        );
        if i == 12 {
            assert_eq!(w.state, RoundState::BossDefeatAnimation { frame: 1, ticks: 0 });
        }
    }
    assert_eq!(w.kitty.x, kitty_x);

    w = tick(&w, idle(), 0, &mut rng);
    assert_eq!(w.state, RoundState::GameOverBossDead);
}

// ── tick: octo shots ↔ kitty ──────────────────────────────────────────────────

#[test]
fn kitty_hit_with_health_to_spare_keeps_playing() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    let shot = shot_on_kitty(&w);
    w.projectiles.push(shot);

    let w = tick(&w, idle(), 0, &mut rng);
    assert_eq!(w.kitty.health, 2);
    assert!(w.projectiles.is_empty());
    assert_eq!(w.state, RoundState::Playing);
    assert_eq!(w.cues, vec![SoundCue::KittyHit]);
}

#[test]
fn kitty_hit_on_last_health_ends_round() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    w.kitty.health = 1;
    let shot = shot_on_kitty(&w);
    w.projectiles.push(shot);

    let w = tick(&w, idle(), 0, &mut rng);
    assert_eq!(w.kitty.health, 0);
    assert_eq!(w.state, RoundState::GameOverPlayerDead);
}

#[test]
fn game_over_freezes_the_world() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    w.state = RoundState::GameOverPlayerDead;
    let shot = shot_on_kitty(&w);
    w.projectiles.push(shot);
    let boss_x = w.enemies[0].rect.x;
    let kitty_x = w.kitty.x;

    let w = tick(&w, Intent { left: true, right: false }, 50_000, &mut rng);
    assert_eq!(w.state, RoundState::GameOverPlayerDead);
    assert_eq!(w.enemies[0].rect.x, boss_x);
    assert_eq!(w.kitty.x, kitty_x);
    assert_eq!(w.kitty.health, 3);
    assert_eq!(w.projectiles.len(), 1);
}

// ── restart ───────────────────────────────────────────────────────────────────

#[test]
fn restart_ignored_while_playing() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    w.kitty.health = 2;
    w.enemies.truncate(3);

    let w = restart(&w, 0, &mut rng);
    assert_eq!(w.state, RoundState::Playing);
    assert_eq!(w.kitty.health, 2);
    assert_eq!(w.enemies.len(), 3);
}

#[test]
fn restart_after_kitty_death_restores_full_round() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    w.kitty.health = 1;
    let shot = shot_on_kitty(&w);
    w.projectiles.push(shot);
    w = tick(&w, idle(), 0, &mut rng);
    assert_eq!(w.state, RoundState::GameOverPlayerDead);

    let kitty_x = w.kitty.x;
    w = restart(&w, 0, &mut rng);
    assert_eq!(w.state, RoundState::Playing);
    assert_eq!(w.kitty.health, w.settings.max_kitty_health);
    assert_eq!(w.kitty.x, kitty_x);
    assert_eq!(w.enemies.iter().filter(|e| e.is_boss()).count(), 1);
    assert_eq!(w.minions().count(), 5);

    // Restarting again mid-round changes nothing
    let again = restart(&w, 0, &mut rng);
    assert_eq!(again.state, RoundState::Playing);
    assert_eq!(again.enemies.len(), 6);
}

#[test]
fn restart_after_boss_defeat_clears_everything() {
    let mut rng = seeded_rng();
    let mut w = make_world(&mut rng);
    w.enemies[0].health = 1;
    w.kitty.health = 2;
    let b = bullet_at(&w, 450, 300);
    w.bullets.push(b);
    while !w.state.is_game_over() {
        w = tick(&w, idle(), 0, &mut rng);
    }
    assert_eq!(w.state, RoundState::GameOverBossDead);

    // Leftovers in flight at the moment the round ended
    let stray_bullet = bullet_at(&w, 100, 400);
    let stray_shot = Projectile::enemy_shot(100, 400, &w.settings);
    w.bullets.push(stray_bullet);
    w.projectiles.push(stray_shot);

    let w = restart(&w, 0, &mut rng);
    assert_eq!(w.state, RoundState::Playing);
    assert_eq!(w.kitty.health, 3);
    assert_eq!(w.enemies.iter().filter(|e| e.is_boss()).count(), 1);
    assert_eq!(w.minions().count(), 5);
    assert!(w.bullets.is_empty());
    assert!(w.projectiles.is_empty());
    assert_eq!(w.blast_center, None);
    assert!(w.enemies.iter().all(|e| e.health == e.max_health));
}
