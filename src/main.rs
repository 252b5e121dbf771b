use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use alien_kitty::audio::{AudioSink, SoundCue, TerminalBell};
use alien_kitty::compute::{fire_bullet, init_state, restart, tick};
use alien_kitty::display;
use alien_kitty::input::{Command, InputTracker};
use alien_kitty::settings::{Settings, SETTINGS_FILE};

const LOG_FILE: &str = "alien_kitty.log";

// ── Logging ───────────────────────────────────────────────────────────────────

/// Send log lines to a file: the terminal is in raw mode and owned by the
/// renderer. Without a writable temp directory the game runs unlogged.
fn init_logging() {
    let path = std::env::temp_dir().join(LOG_FILE);
    if let Ok(file) = std::fs::File::create(&path) {
        let _ = tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .try_init();
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until a quit key arrives. Input is drained without blocking at the
/// top of every frame, then the world advances one tick and is redrawn.
fn game_loop<W: Write>(
    out: &mut W,
    settings: Arc<Settings>,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let mut rng = thread_rng();
    let mut audio = TerminalBell::new(stdout(), settings.bell);
    let mut input = InputTracker::for_tick_rate(settings.tick_rate);
    let frame_len = settings.frame_duration();

    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;

    let mut world = init_state(Arc::clone(&settings), now_ms(), &mut rng);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(key) = ev else { continue };
            match input.handle(&key, frame) {
                Some(Command::Quit) => {
                    audio.play(SoundCue::MusicStop)?;
                    tracing::info!("quit");
                    return Ok(());
                }
                Some(Command::Fire) => world = fire_bullet(&world),
                Some(Command::Restart) => world = restart(&world, now_ms(), &mut rng),
                None => {}
            }
        }

        world = tick(&world, input.intent(frame), now_ms(), &mut rng);
        for cue in world.take_cues() {
            audio.play(cue)?;
        }

        let (cols, rows) = terminal::size()?;
        display::render(out, &world, cols, rows, &mut rng)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_logging();

    let settings = Settings::load(Path::new(SETTINGS_FILE))
        .with_context(|| format!("could not load {SETTINGS_FILE}"))?;
    let settings = Arc::new(settings);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enter raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(terminal::SetTitle("Alien Kitty"))?;

    // Request key-release (and key-repeat) events from the terminal.
    // Terminals without the kitty keyboard protocol fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, settings, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!(error = %e, "game loop failed");
    }
    result
}
