//! Spinner shown around long-running fetches in human mode

use crate::console::{RenderContext, Style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::future::Future;
use std::time::Duration;
use teams_core::error::TeamsResult;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Run `task`, animating `label` until it settles.
///
/// Machine mode awaits the task without drawing anything.
pub async fn with_spinner<T, F>(context: &RenderContext, label: &str, task: F) -> TeamsResult<T>
where
    F: Future<Output = TeamsResult<T>>,
{
    if context.machine {
        return task.await;
    }

    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER_FRAMES),
    );
    spinner.set_message(label.to_string());
    spinner.enable_steady_tick(TICK_INTERVAL);

    let result = task.await;
    spinner.finish_and_clear();
    match &result {
        Ok(_) => println!("{} {}", Style::success("✓"), label),
        Err(_) => println!("{} {}", Style::failure("x"), label),
    }
    result
}
