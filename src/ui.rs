use anyhow::Result;
use colored::Colorize;
use declarative::{ConfirmCallback, PropertyDrift};
use similar::{ChangeTag, TextDiff};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Word-level diff from the observed rendering to the desired one.
///
/// Removed words are red, added words green.
pub fn inline_diff(observed: &str, desired: &str) -> String {
    let diff = TextDiff::from_words(observed, desired);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let text = change.value();
        match change.tag() {
            ChangeTag::Delete => out.push_str(&text.red().strikethrough().to_string()),
            ChangeTag::Insert => out.push_str(&text.green().to_string()),
            ChangeTag::Equal => out.push_str(text),
        }
    }
    out
}

/// Print one drifted property
pub fn drift(entry: &PropertyDrift) {
    println!(
        "      {} {}: {}",
        "~".yellow(),
        entry.property,
        inline_diff(&entry.observed, &entry.desired)
    );
}

/// Confirmation through an interactive prompt
pub struct PromptConfirm {
    assume_yes: bool,
}

impl PromptConfirm {
    /// With `assume_yes`, every prompt is answered without asking
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            log::debug!("Auto-confirmed: {prompt}");
            return Ok(true);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()?;
        Ok(confirmed)
    }
}

// ============================================================================
// Tests
// ============================================================================
