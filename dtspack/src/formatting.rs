//! Status indicators and message formatting.

use owo_colors::OwoColorize;

/// Status types for consistent formatting.
#[derive(Debug, Clone, Copy)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

impl Status {
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Success => "✓",
            Status::Error => "✗",
            Status::Warning => "⚠",
            Status::Info => "→",
        }
    }

    pub fn colored_symbol(&self) -> String {
        match self {
            Status::Success => self.symbol().green().to_string(),
            Status::Error => self.symbol().red().to_string(),
            Status::Warning => self.symbol().yellow().to_string(),
            Status::Info => self.symbol().cyan().to_string(),
        }
    }

    pub fn format(&self, message: &str) -> String {
        format!("{} {}", self.colored_symbol(), self.colorize_text(message))
    }

    fn colorize_text(&self, text: &str) -> String {
        match self {
            Status::Success => text.green().bold().to_string(),
            Status::Error => text.red().bold().to_string(),
            Status::Warning => text.yellow().bold().to_string(),
            Status::Info => text.cyan().to_string(),
        }
    }
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("  {}", Status::Success.format(message));
}

/// Prints an error message.
pub fn print_error(message: &str) {
    println!("  {}", Status::Error.format(message));
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    println!("  {}", Status::Warning.format(message));
}

/// Prints an informational message.
pub fn print_info(message: &str) {
    println!("  {}", Status::Info.format(message));
}

/// Prints a key-value line.
pub fn print_key_value(key: &str, value: &str) {
    println!("  {} {}", format!("{}:", key).bold(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_status_keeps_its_own_symbol() {
        assert_eq!(Status::Success.symbol(), "✓");
        assert_eq!(Status::Error.symbol(), "✗");
        assert_eq!(Status::Warning.symbol(), "⚠");
        assert_eq!(Status::Info.symbol(), "→");
    }

    #[test]
    fn formatted_message_carries_symbol_and_text() {
        let line = Status::Info.format("watching for changes");
        assert!(line.contains("→"));
        assert!(line.contains("watching for changes"));
    }
}
