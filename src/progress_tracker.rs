use std::cell::RefCell;
use std::io::{self, Write};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar plus the running per-image commentary.
///
/// The bar draws on stdout. While it is drawn, commentary goes through the
/// bar so lines land above it instead of tearing it. indicatif hides the bar
/// when stdout is not a terminal and then swallows `println`, so a hidden bar
/// sends commentary straight to `output` instead.
pub struct ProgressTracker {
    progress_bar: ProgressBar,
    output: RefCell<Box<dyn Write>>,
}

impl ProgressTracker {
    pub fn new(len: u64) -> Self {
        Self::with_draw_target(len, ProgressDrawTarget::stdout())
    }

    /// Commentary only, no bar.
    pub fn hidden() -> Self {
        Self::with_draw_target(0, ProgressDrawTarget::hidden())
    }

    pub fn with_draw_target(len: u64, target: ProgressDrawTarget) -> Self {
        let progress_bar = ProgressBar::with_draw_target(Some(len), target);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);

        Self {
            progress_bar,
            output: RefCell::new(Box::new(io::stdout())),
        }
    }

    /// Replaces stdout as the destination of commentary while the bar is hidden.
    pub fn with_output(self, output: impl Write + 'static) -> Self {
        Self {
            output: RefCell::new(Box::new(output)),
            ..self
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.progress_bar.is_hidden()
    }

    pub fn note(&self, message: impl AsRef<str>) {
        if self.progress_bar.is_hidden() {
            let mut output = self.output.borrow_mut();
            let _ = writeln!(output, "{}", message.as_ref());
            let _ = output.flush();
        } else {
            self.progress_bar.println(message.as_ref());
        }
    }

    pub fn inc(&self) {
        self.progress_bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}
