/// Rendering layer: all terminal drawing lives here.
///
/// Each function receives a canvas wrapping the writer and an immutable view
/// of the game world. No game logic is performed; this module only maps the
/// world (pixel units) onto terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use rand::Rng;

use crate::entities::{Enemy, EnemyKind, GameWorld, Projectile, ProjectileKind, RoundState};
use crate::geometry::Rect;
use crate::settings::{Rgb, Settings};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_KITTY: Color = Color::Rgb { r: 255, g: 182, b: 193 };
const C_BOSS: Color = Color::Rgb { r: 150, g: 90, b: 200 };
const C_MINION: Color = Color::Rgb { r: 190, g: 140, b: 230 };
const C_TINT: Color = Color::Red;
const C_STAR: Color = Color::White;
const C_BAR_LOST: Color = Color::Red;
const C_BAR_LEFT: Color = Color::Green;
const C_KITTY_BAR_BG: Color = Color::Rgb { r: 255, g: 255, b: 0 };
const C_KITTY_BAR_FILL: Color = Color::Rgb { r: 144, g: 244, b: 153 };
const C_BLAST: Color = Color::Rgb { r: 255, g: 160, b: 0 };

const BLAST_GLYPHS: &[&str] = &["*", "✶", "✺"];

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

/// A terminal of `cols`×`rows` cells standing in for the world's pixels.
struct Canvas<'a, W: Write> {
    out: &'a mut W,
    settings: &'a Settings,
    cols: u16,
    rows: u16,
}

impl<W: Write> Canvas<'_, W> {
    fn col(&self, x: i32) -> i32 {
        x * self.cols as i32 / self.settings.screen_width
    }

    fn row(&self, y: i32) -> i32 {
        y * self.rows as i32 / self.settings.screen_height
    }

    /// Background gradient colour for a terminal row.
    fn background(&self, row: u16) -> Color {
        let start = self.settings.gradient_start_color;
        let end = self.settings.gradient_end_color;
        let ratio = row as f32 / self.rows.max(1) as f32;
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - ratio) + b as f32 * ratio) as u8;
        Color::Rgb {
            r: mix(start.0, end.0),
            g: mix(start.1, end.1),
            b: mix(start.2, end.2),
        }
    }

    /// Print `text` at a cell, on the gradient. Off-screen cells are skipped.
    fn put(&mut self, col: i32, row: i32, text: &str, fg: Color) -> std::io::Result<()> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return Ok(());
        }
        let bg = self.background(row as u16);
        self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
        self.out.queue(style::SetBackgroundColor(bg))?;
        self.out.queue(style::SetForegroundColor(fg))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    /// Cell span covered by a world rectangle; never smaller than one cell.
    fn cells(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let left = self.col(rect.left());
        let top = self.row(rect.top());
        let right = self.col(rect.right()).max(left + 1);
        let bottom = self.row(rect.bottom()).max(top + 1);
        (left, top, right, bottom)
    }

    fn fill(&mut self, rect: &Rect, glyph: &str, fg: Color) -> std::io::Result<()> {
        let (left, top, right, bottom) = self.cells(rect);
        for row in top..bottom {
            for col in left..right {
                self.put(col, row, glyph, fg)?;
            }
        }
        Ok(())
    }

    /// Centre `text` on a world rectangle.
    fn label(&mut self, rect: &Rect, text: &str, fg: Color) -> std::io::Result<()> {
        let (left, top, right, bottom) = self.cells(rect);
        let width = text.chars().count() as i32;
        let col = left + (right - left - width) / 2;
        let row = top + (bottom - top) / 2;
        self.put(col, row, text, fg)
    }

    /// Horizontal bar, filled to `fraction` of its length.
    fn bar(
        &mut self,
        rect: &Rect,
        fraction: f32,
        fill: Color,
        empty: Color,
    ) -> std::io::Result<()> {
        let (left, top, right, _) = self.cells(rect);
        let filled = left + ((right - left) as f32 * fraction.clamp(0.0, 1.0)).round() as i32;
        for col in left..right {
            let color = if col < filled { fill } else { empty };
            self.put(col, top, "█", color)?;
        }
        Ok(())
    }

    /// Centre `text` on a terminal row, on a black screen.
    fn centred(&mut self, row: i32, text: &str, fg: Color) -> std::io::Result<()> {
        let col = (self.cols as i32 - text.chars().count() as i32) / 2;
        self.out.queue(cursor::MoveTo(col.max(0) as u16, row.max(0) as u16))?;
        self.out.queue(style::SetForegroundColor(fg))?;
        self.out.queue(Print(text))?;
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame onto a `cols`×`rows` terminal. `rng` places the
/// twinkling stars.
pub fn render<W: Write>(
    out: &mut W,
    world: &GameWorld,
    cols: u16,
    rows: u16,
    rng: &mut impl Rng,
) -> std::io::Result<()> {
    let mut canvas = Canvas {
        out,
        settings: &world.settings,
        cols,
        rows,
    };

    if world.state.is_game_over() {
        draw_game_over(&mut canvas, world.state)?;
    } else {
        draw_background(&mut canvas, rng)?;
        draw_borders(&mut canvas)?;
        draw_game_elements(&mut canvas, world)?;
        if let RoundState::BossDefeatAnimation { frame, .. } = world.state {
            draw_blast(&mut canvas, world, frame)?;
        }
    }

    // Park cursor in a harmless spot and flush
    canvas.out.queue(style::ResetColor)?;
    canvas.out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    canvas.out.flush()?;
    Ok(())
}

// ── Background & borders ──────────────────────────────────────────────────────

fn draw_background<W: Write>(
    canvas: &mut Canvas<'_, W>,
    rng: &mut impl Rng,
) -> std::io::Result<()> {
    let blank = " ".repeat(canvas.cols as usize);
    for row in 0..canvas.rows {
        let bg = canvas.background(row);
        canvas.out.queue(cursor::MoveTo(0, row))?;
        canvas.out.queue(style::SetBackgroundColor(bg))?;
        canvas.out.queue(Print(&blank))?;
    }

    if canvas.cols == 0 || canvas.rows == 0 {
        return Ok(());
    }
    for _ in 0..canvas.settings.star_count {
        let col = rng.gen_range(0..canvas.cols) as i32;
        let row = rng.gen_range(0..canvas.rows) as i32;
        canvas.put(col, row, "·", C_STAR)?;
    }
    Ok(())
}

/// Outer frame on the terminal edge, inner frame one cell inside it.
fn draw_borders<W: Write>(canvas: &mut Canvas<'_, W>) -> std::io::Result<()> {
    let outer = rgb(canvas.settings.outer_border_color);
    let inner = rgb(canvas.settings.inner_border_color);
    let (w, h) = (canvas.cols as i32, canvas.rows as i32);

    for (inset, glyph, color) in [(0, "█", outer), (1, "▒", inner)] {
        let (left, right) = (inset, w - 1 - inset);
        let (top, bottom) = (inset, h - 1 - inset);
        if right < left || bottom < top {
            continue;
        }
        for col in left..=right {
            canvas.put(col, top, glyph, color)?;
            canvas.put(col, bottom, glyph, color)?;
        }
        for row in top..=bottom {
            canvas.put(left, row, glyph, color)?;
            canvas.put(right, row, glyph, color)?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_game_elements<W: Write>(
    canvas: &mut Canvas<'_, W>,
    world: &GameWorld,
) -> std::io::Result<()> {
    draw_kitty(canvas, world)?;
    for bullet in &world.bullets {
        draw_projectile(canvas, bullet)?;
    }
    for enemy in &world.enemies {
        draw_octo(canvas, enemy)?;
    }
    for projectile in &world.projectiles {
        draw_projectile(canvas, projectile)?;
    }
    Ok(())
}

fn draw_kitty<W: Write>(canvas: &mut Canvas<'_, W>, world: &GameWorld) -> std::io::Result<()> {
    let kitty = &world.kitty;
    canvas.fill(&kitty.rect, "▓", C_KITTY)?;
    canvas.label(&kitty.rect, "=^.^=", Color::Black)?;

    let s = canvas.settings;
    let bar = Rect::new(
        s.screen_width - 220,
        s.screen_height - 80,
        s.kitty_health_bar_length,
        s.kitty_health_bar_height,
    );
    let fraction = kitty.health as f32 / kitty.max_health.max(1) as f32;
    canvas.bar(&bar, fraction, C_KITTY_BAR_FILL, C_KITTY_BAR_BG)
}

fn draw_octo<W: Write>(canvas: &mut Canvas<'_, W>, enemy: &Enemy) -> std::io::Result<()> {
    let s = canvas.settings;
    let (body, face, bar) = match enemy.kind {
        EnemyKind::Boss => {
            let bar = Rect::new(
                (s.screen_width - s.boss_health_bar_length) / 2,
                50,
                s.boss_health_bar_length,
                s.boss_health_bar_height,
            );
            (C_BOSS, "(◎ ◎)", bar)
        }
        EnemyKind::Minion => {
            let bar = Rect::new(
                enemy.rect.x,
                enemy.rect.y - s.minion_health_bar_height - 5,
                s.minion_health_bar_length,
                s.minion_health_bar_height,
            );
            (C_MINION, "(◎)", bar)
        }
    };
    let color = if enemy.is_tinted() { C_TINT } else { body };

    canvas.fill(&enemy.rect, "░", color)?;
    canvas.label(&enemy.rect, face, Color::White)?;
    let fraction = enemy.health as f32 / enemy.max_health.max(1) as f32;
    canvas.bar(&bar, fraction, C_BAR_LEFT, C_BAR_LOST)
}

fn draw_projectile<W: Write>(canvas: &mut Canvas<'_, W>, p: &Projectile) -> std::io::Result<()> {
    let (glyph, color) = match p.kind {
        ProjectileKind::Bullet => ("║", rgb(canvas.settings.bullet_color)),
        ProjectileKind::EnemyShot => ("●", rgb(canvas.settings.projectile_color)),
    };
    let col = canvas.col(p.rect.center_x());
    let row = canvas.row(p.rect.center_y());
    canvas.put(col, row, glyph, color)
}

/// Each blast frame grows a little further out from where the boss died.
fn draw_blast<W: Write>(
    canvas: &mut Canvas<'_, W>,
    world: &GameWorld,
    frame: u32,
) -> std::io::Result<()> {
    let Some((cx, cy)) = world.blast_center else {
        return Ok(());
    };
    let s = canvas.settings;
    let scale = (frame + 1) as f32 / s.blast_frames as f32;
    let w = (s.boss_alien_size.0 as f32 * scale) as i32;
    let h = (s.boss_alien_size.1 as f32 * scale) as i32;
    let glyph = BLAST_GLYPHS[frame as usize % BLAST_GLYPHS.len()];
    canvas.fill(&Rect::from_center(cx as f32, cy as f32, w, h), glyph, C_BLAST)
}

// ── End screen ────────────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(canvas: &mut Canvas<'_, W>, state: RoundState) -> std::io::Result<()> {
    canvas.out.queue(style::SetBackgroundColor(Color::Black))?;
    canvas.out.queue(terminal::Clear(terminal::ClearType::All))?;

    let headline = match state {
        RoundState::GameOverBossDead => "OCTO HAS BEEN DEFEATED!",
        _ => "GAME OVER!",
    };
    let mid = canvas.rows as i32 / 2;
    canvas.centred(mid - 2, headline, Color::Red)?;
    canvas.centred(mid, "Press \"R\" to Restart", Color::White)?;
    canvas.centred(mid + 1, "Press \"Q\" to Quit", Color::White)?;
    Ok(())
}
