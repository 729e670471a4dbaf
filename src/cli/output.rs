use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Section,
    Detail,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    pub quiet_mode: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

// Quiet mode keeps only results and warnings.
fn should_skip(kind: MessageKind, prefs: &OutputPreferences) -> bool {
    prefs.quiet_mode && matches!(kind, MessageKind::Info | MessageKind::Section)
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Info => format!("INFO: [i] {text}"),
        MessageKind::Success => format!("SUCCESS: {text}").bright_green().to_string(),
        MessageKind::Warning => format!("WARNING: [!] {text}").bright_yellow().to_string(),
        MessageKind::Detail => format!("  {text}"),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    if should_skip(kind, &preferences()) {
        return;
    }
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

pub fn detail(message: impl fmt::Display) {
    print(MessageKind::Detail, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_mode_hides_chatter_only() {
        let prefs = OutputPreferences { quiet_mode: true };
        assert!(should_skip(MessageKind::Info, &prefs));
        assert!(should_skip(MessageKind::Section, &prefs));
        assert!(!should_skip(MessageKind::Success, &prefs));
        assert!(!should_skip(MessageKind::Detail, &prefs));
        assert!(!should_skip(MessageKind::Info, &OutputPreferences::default()));
    }

    #[test]
    fn labels_are_prefixed() {
        colored::control::set_override(false);
        assert_eq!(apply_style(MessageKind::Info, "hi"), "INFO: [i] hi");
        assert_eq!(apply_style(MessageKind::Section, " Totals "), "=== Totals ===");
        assert_eq!(apply_style(MessageKind::Detail, "x"), "  x");
    }
}
