//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a video from a channel listing.
    pub fn video_info(title: &str, id: &str, published: Option<&str>, views: &str) {
        println!(
            "  {} {} ({}, {} views{})",
            style("*").cyan(),
            style(title).bold(),
            style(id).dim(),
            format_count(views),
            published.map(|p| format!(", {}", p)).unwrap_or_default()
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Group the digits of a decimal count, e.g. `1234567` -> `1,234,567`.
///
/// Non-numeric input is returned unchanged.
fn format_count(count: &str) -> String {
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return count.to_string();
    }

    let mut out = String::with_capacity(count.len() + count.len() / 3);
    for (i, c) in count.chars().enumerate() {
        if i > 0 && (count.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
