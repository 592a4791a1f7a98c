use console::style;

use crate::types::{Diagnostic, Severity};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `key: value` line
    pub fn field(&self, key: &str, value: impl std::fmt::Display) {
        println!("  {:<18} {}", style(format!("{}:", key)).dim(), value);
    }

    /// One diagnostic with its source line
    pub fn diagnostic(&self, diagnostic: &Diagnostic) {
        let location = if diagnostic.line > 0 {
            format!("line {}", diagnostic.line)
        } else {
            "document".to_string()
        };
        let message = format!(
            "{} [{}] {} ({})",
            location, diagnostic.kind, diagnostic.message, diagnostic.text
        );
        match diagnostic.severity {
            Severity::Error => self.error(&message),
            Severity::Warning => self.warning(&message),
            Severity::Info => self.info(&message),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
