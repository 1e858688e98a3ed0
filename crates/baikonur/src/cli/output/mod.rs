//! Output formatting utilities

use console::style;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_formats_indented_pair() {
        let line = key_value("Console", "https://example.com");
        assert!(line.starts_with("  "));
        assert!(line.contains("Console"));
        assert!(line.ends_with(": https://example.com"));
    }
}
