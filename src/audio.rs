//! Sound cues. The game only says *what* should be heard; a sink decides how.

use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    MusicStart,
    MusicStop,
    BulletFired,
    KittyHit,
    BossDefeated,
}

pub trait AudioSink {
    fn play(&mut self, cue: SoundCue) -> std::io::Result<()>;
}

/// Rings the terminal bell for the cues worth interrupting the player for.
/// Everything is logged whether or not the bell is enabled.
pub struct TerminalBell<W: Write> {
    out: W,
    enabled: bool,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        TerminalBell { out, enabled }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) -> std::io::Result<()> {
        tracing::debug!(?cue, "sound cue");
        let rings = matches!(cue, SoundCue::KittyHit | SoundCue::BossDefeated);
        if self.enabled && rings {
            self.out.write_all(b"\x07")?;
            self.out.flush()?;
        }
        Ok(())
    }
}
