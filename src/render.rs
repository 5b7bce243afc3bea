// Audio rendering and playback via the `fluidsynth` command-line tool.
//
// The MIDI-to-audio step is delegated entirely to FluidSynth; this module
// only shells out to it. The soundfont path is checked up front so a missing
// soundfont is reported as such rather than as an opaque synth error.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

const FLUIDSYNTH_BIN: &str = "fluidsynth";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("soundfont not found: {0}")]
    SoundfontMissing(PathBuf),
    #[error("fluidsynth binary not found in PATH")]
    BinaryNotFound,
    #[error("fluidsynth exited with {0}")]
    Failed(ExitStatus),
    #[error("failed to run fluidsynth: {0}")]
    Io(#[from] std::io::Error),
}

/// Render a MIDI file to WAV using the given soundfont.
pub fn render_to_wav(midi: &Path, wav: &Path, soundfont: &Path) -> Result<(), RenderError> {
    check_soundfont(soundfont)?;

    let output = Command::new(FLUIDSYNTH_BIN)
        .arg("-ni")
        .arg(soundfont)
        .arg(midi)
        .arg("-F")
        .arg(wav)
        .arg("-r")
        .arg("44100")
        .output()
        .map_err(map_spawn_error)?;

    if output.status.success() {
        Ok(())
    } else {
        Err(RenderError::Failed(output.status))
    }
}

/// Play a MIDI file through the default audio driver, blocking until the
/// piece ends.
pub fn play(midi: &Path, soundfont: &Path) -> Result<(), RenderError> {
    check_soundfont(soundfont)?;

    let status = Command::new(FLUIDSYNTH_BIN)
        .arg("-i")
        .arg(soundfont)
        .arg(midi)
        .status()
        .map_err(map_spawn_error)?;

    if status.success() {
        Ok(())
    } else {
        Err(RenderError::Failed(status))
    }
}

fn check_soundfont(soundfont: &Path) -> Result<(), RenderError> {
    if soundfont.is_file() {
        Ok(())
    } else {
        Err(RenderError::SoundfontMissing(soundfont.to_path_buf()))
    }
}

fn map_spawn_error(e: std::io::Error) -> RenderError {
    if e.kind() == std::io::ErrorKind::NotFound {
        RenderError::BinaryNotFound
    } else {
        RenderError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_soundfont_is_reported_before_spawning() {
        let err = render_to_wav(
            Path::new("in.mid"),
            Path::new("out.wav"),
            Path::new("/nonexistent/FluidR3_GM.sf2"),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::SoundfontMissing(_)));
    }
}
