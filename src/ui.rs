//! Terminal progress for the skyscan binaries.
//!
//! Stages render as an indicatif spinner on interactive terminals and as
//! plain `==>` lines otherwise, so redirected output stays clean. This
//! file is included per-binary and is not part of the library API.

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

#[derive(Clone, Copy, Debug)]
pub struct Ui {
    use_pretty: bool,
}

impl Ui {
    /// Resolve the effective mode against the attached terminals. Auto
    /// picks the spinner only when both stderr and stdout are terminals;
    /// piped stdout (say, `--json > report.json`) falls back to plain
    /// stage lines.
    pub fn detect(mode: UiMode) -> Self {
        let stderr_tty = std::io::stderr().is_terminal();
        let stdout_tty = std::io::stdout().is_terminal();
        let use_pretty = match mode {
            UiMode::Pretty => stderr_tty,
            UiMode::Plain => false,
            UiMode::Auto => stderr_tty && stdout_tty,
        };
        Self { use_pretty }
    }

    pub fn stage(&self, name: &str) -> StageGuard {
        if self.use_pretty {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(format!("{name}…"));
            StageGuard::new(name.to_string(), Some(spinner))
        } else {
            eprintln!("==> {}", name);
            StageGuard::new(name.to_string(), None)
        }
    }
}

/// Open stage. Dropping it prints the closing line with the elapsed time;
/// call [`StageGuard::fail`] first on error paths to close with a cross
/// instead of a check mark.
pub struct StageGuard {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
    failed: bool,
}

impl StageGuard {
    fn new(name: String, spinner: Option<ProgressBar>) -> Self {
        Self {
            name,
            start: Instant::now(),
            spinner,
            failed: false,
        }
    }

    pub fn fail(mut self) {
        self.failed = true;
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        let mark = if self.failed { "✖" } else { "✔" };
        let elapsed = self.start.elapsed();
        let message = format!("{} {} ({})", mark, self.name, format_duration(elapsed));
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(message);
        } else {
            eprintln!("{message}");
        }
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}
