//! "Fonts changed" broadcasts (made by FontLab https://www.fontlab.com/)

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

/// Fire-and-forget signal that the system font table changed. No
/// acknowledgment, no retry.
pub trait ChangeNotifier {
    fn broadcast_font_change(&mut self);
}

/// Does nothing; for platforms that watch the fonts directory themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl ChangeNotifier for SilentNotifier {
    fn broadcast_font_change(&mut self) {}
}

/// Asks fontconfig to rescan the fonts directory with `fc-cache`.
#[derive(Debug, Clone)]
pub struct FontCacheNotifier {
    program: String,
    fonts_dir: PathBuf,
}

impl FontCacheNotifier {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: "fc-cache".to_string(),
            fonts_dir: fonts_dir.into(),
        }
    }

    /// Use another rescan program (it receives `-f <fonts dir>`).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl ChangeNotifier for FontCacheNotifier {
    fn broadcast_font_change(&mut self) {
        let status = Command::new(&self.program)
            .arg("-f")
            .arg(&self.fonts_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => debug!(program = %self.program, "font cache refreshed"),
            Ok(status) => debug!(program = %self.program, %status, "font cache refresh reported failure"),
            Err(err) => debug!(program = %self.program, error = %err, "font cache refresh unavailable"),
        }
    }
}
