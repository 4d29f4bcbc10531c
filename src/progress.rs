//! Progress indicators for the commit phase

use colored::Colorize;
use declarative::{ApplyResult, ExecutionPlan, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner with a message
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Reports commit progress with a spinner and one line per resource
#[derive(Default)]
pub struct CommitProgress {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl CommitProgress {
    pub fn new(quiet: bool) -> Self {
        Self { bar: None, quiet }
    }

    fn println(&self, line: String) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }
}

impl ProgressCallback for CommitProgress {
    fn on_plan(&mut self, plan: &ExecutionPlan) {
        if !self.quiet {
            crate::commands::plan::display_plan(plan, false);
        }
    }

    fn on_batch_start(&mut self, count: usize, kind: &str) {
        if !self.quiet {
            self.bar = Some(spinner(&format!("Applying {count} {kind} change(s)...")));
        }
    }

    fn on_resource_start(&mut self, id: &str, description: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{description} {id}"));
        }
    }

    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult) {
        let line = match result {
            ApplyResult::Created => format!("  {} {id} created", "+".green()),
            ApplyResult::Removed => format!("  {} {id} destroyed", "-".red()),
            ApplyResult::NoChange => format!("  {} {id}", "○".dimmed()),
            ApplyResult::Skipped { reason } => format!("  {} {id} ({reason})", "⊘".yellow()),
            ApplyResult::Failed { error } => format!("  {} {}", "✗".red(), error),
        };
        if !self.quiet || !result.is_success() {
            self.println(line);
        }
    }

    fn on_batch_complete(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
