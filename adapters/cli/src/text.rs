//! Line-oriented backend that prints views to a writer.

use std::io::Write;

use anyhow::Result as AnyResult;
use delivery_rush_presentation::{summary_lines, Cue, Presentation, PresentationBackend, View};

/// Prints the HUD every few frames, cues as they happen and level summaries.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    hud_every: u64,
    frames: u64,
    announced_title: bool,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend printing the HUD once per `hud_every` level frames.
    pub(crate) fn new(out: W, hud_every: u64) -> Self {
        Self {
            out,
            hud_every: hud_every.max(1),
            frames: 0,
            announced_title: false,
        }
    }
}

impl<W: Write> PresentationBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation, view: &View) -> AnyResult<()> {
        if !self.announced_title {
            writeln!(self.out, "== {} ==", presentation.window_title)?;
            self.announced_title = true;
        }

        match view {
            View::Menu => writeln!(self.out, "press start")?,
            View::Level {
                hud, cues, paused, ..
            } => {
                for cue in cues {
                    match cue {
                        Cue::LoseLife => {
                            writeln!(self.out, "  ! defense hit, {} lives left", hud.lives)?
                        }
                        Cue::DeliveryIndicator { position } => writeln!(
                            self.out,
                            "  ! delivery house ahead at x={:.0}",
                            position.x
                        )?,
                        Cue::CameraShake { .. } | Cue::DefenseTint(_) => {}
                    }
                }
                if *paused {
                    return Ok(());
                }
                if self.frames % self.hud_every == 0 {
                    writeln!(self.out, "{}", hud.lines().join(" | "))?;
                }
                self.frames += 1;
            }
            View::Summary { stats, game_over } => {
                self.frames = 0;
                for line in summary_lines(stats, *game_over) {
                    writeln!(self.out, "{line}")?;
                }
            }
        }
        Ok(())
    }
}
