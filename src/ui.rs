use anstyle::{AnsiColor, Style};
use is_terminal::IsTerminal;
use std::fmt::Display;
use std::io::{self, Write};

const STATUS_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Pending,
    Success,
    Info,
    Warn,
}

impl StatusKind {
    fn to_stderr(self) -> bool {
        matches!(self, StatusKind::Warn)
    }
}

fn supports_color(stderr: bool) -> bool {
    let is_tty = if stderr {
        io::stderr().is_terminal()
    } else {
        io::stdout().is_terminal()
    };
    is_tty && std::env::var_os("NO_COLOR").is_none()
}

fn style_for(kind: StatusKind) -> Style {
    let style = Style::new().bold();
    match kind {
        StatusKind::Pending => style.fg_color(Some(AnsiColor::Cyan.into())),
        StatusKind::Success => style.fg_color(Some(AnsiColor::Green.into())),
        StatusKind::Info => style.fg_color(Some(AnsiColor::Blue.into())),
        StatusKind::Warn => style.fg_color(Some(AnsiColor::Yellow.into())),
    }
}

fn format_status(kind: StatusKind, label: &str, message: &str, use_color: bool) -> String {
    let padded_label = if label.is_empty() {
        " ".repeat(STATUS_WIDTH)
    } else {
        format!("{:>width$}", label, width = STATUS_WIDTH)
    };

    let (prefix, suffix) = if use_color {
        let style = style_for(kind);
        (style.render().to_string(), style.render_reset().to_string())
    } else {
        (String::new(), String::new())
    };

    let mut out = String::new();
    for (idx, line) in message.split('\n').enumerate() {
        if idx == 0 {
            out.push_str(&format!("{prefix}{padded_label}{suffix} {line}\n"));
        } else {
            out.push_str(&format!("{:>width$} {line}\n", "", width = STATUS_WIDTH));
        }
    }
    out
}

fn write_status(kind: StatusKind, label: &str, message: &str) {
    let stderr = kind.to_stderr();
    let text = format_status(kind, label, message, supports_color(stderr));

    let mut handle: Box<dyn Write> = if stderr {
        Box::new(io::stderr().lock())
    } else {
        Box::new(io::stdout().lock())
    };
    let _ = handle.write_all(text.as_bytes());
    let _ = handle.flush();
}

pub fn status(label: &str, message: impl Display) {
    write_status(StatusKind::Pending, label, &message.to_string());
}

pub fn info(message: impl Display) {
    write_status(StatusKind::Info, "Info", &message.to_string());
}

pub fn warn(message: impl Display) {
    write_status(StatusKind::Warn, "Warning", &message.to_string());
}

pub fn success(label: &str, message: impl Display) {
    write_status(StatusKind::Success, label, &message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status_pads_label() {
        let out = format_status(StatusKind::Success, "Linked", "dev -> .env", false);
        assert_eq!(out, "      Linked dev -> .env\n");
    }

    #[test]
    fn test_format_status_indents_continuation_lines() {
        let out = format_status(StatusKind::Info, "Info", "first\nsecond", false);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "        Info first");
        assert_eq!(lines[1], format!("{} second", " ".repeat(STATUS_WIDTH)));
    }

    #[test]
    fn test_format_status_color() {
        let out = format_status(StatusKind::Warn, "Warning", "boom", true);
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("boom"));
    }
}
