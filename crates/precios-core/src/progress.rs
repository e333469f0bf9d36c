//! Worker progress display.
//!
//! Bars render only when stderr is a terminal; non-interactive runs get
//! hidden bars and rely on plain log lines, keeping piped output clean.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Prefix column width shared by all bar styles, keeps bars aligned.
const PREFIX_WIDTH: usize = 22;

fn style(spec: &str) -> ProgressStyle {
    ProgressStyle::with_template(spec).expect("invalid template")
}

/// Switch a pending bar to a page-count gauge once the total is known.
///
/// Listing and product endpoints report their total on the first page, so
/// every bar starts as a bare status line and grows a gauge after that
/// first response.
pub fn upgrade_to_bar(pb: &ProgressBar, total_pages: u64) {
    pb.set_length(total_pages);
    pb.set_style(
        style("{prefix:<22.dim} {bar:30.green/dim} {pos:>5}/{len:5} {wide_msg:.dim}")
            .progress_chars("--"),
    );
}

/// Owns the `MultiProgress` and the TTY decision for one process.
pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl ProgressContext {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty: std::io::stderr().is_terminal(),
        }
    }

    /// Bar for one unit of crawl work (a listing page, a store, a category).
    ///
    /// Starts in pending style with no gauge; see [`upgrade_to_bar`].
    /// Hidden when stderr is not a terminal.
    pub fn page_bar(&self, name: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let pb = self.multi.add(ProgressBar::new(0));
        pb.set_style(style("{prefix:<22.dim} {wide_msg:.dim}"));
        pb.set_prefix(name.chars().take(PREFIX_WIDTH).collect::<String>());
        pb
    }

    /// Spinner line for a named stage, above the worker bars.
    ///
    /// Update with `set_message`, stop with `finish`.
    pub fn stage_line(&self, name: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let pb = self.multi.add(ProgressBar::new(0));
        pb.set_style(style(
            "{spinner:.green} {prefix:<10.cyan.bold} {wide_msg}",
        ));
        pb.set_prefix(name.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    /// Print a line without tearing active bars.
    pub fn println(&self, msg: impl AsRef<str>) {
        if self.is_tty {
            let _ = self.multi.println(msg);
        } else {
            eprintln!("{}", msg.as_ref());
        }
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// The underlying `MultiProgress`, for the log bridge.
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedProgress = Arc<ProgressContext>;

/// Format a count with thousand separators for summary output.
pub fn fmt_num(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_no_separator_below_a_thousand() {
        assert_eq!(fmt_num(0), "0");
        assert_eq!(fmt_num(12), "12");
        assert_eq!(fmt_num(999), "999");
    }

    #[test]
    fn fmt_num_groups_of_three() {
        assert_eq!(fmt_num(1_000), "1,000");
        assert_eq!(fmt_num(12_345), "12,345");
        assert_eq!(fmt_num(123_456), "123,456");
        assert_eq!(fmt_num(1_234_567), "1,234,567");
    }
}
