//! Terminal renderer for status output on stderr.

use crossterm::style::Stylize;

use super::settings;

/// Writes status lines to stderr, optionally colored.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Color when stderr is a terminal and `NO_COLOR` is unset.
    pub fn for_stderr() -> Self {
        use std::io::IsTerminal;
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
        Self::new(std::io::stderr().is_terminal() && !no_color)
    }

    pub fn section(&self, title: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                title.with(settings::COLOR_SECTION_TITLE).bold()
            );
        } else {
            eprintln!("{title}:");
        }
    }

    pub fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "{}{} {}",
                settings::INDENT_1,
                format!("{key}:").with(settings::COLOR_FIELD_KEY),
                value.with(settings::COLOR_FIELD_VALUE),
            );
        } else {
            eprintln!("{}{key}: {value}", settings::INDENT_1);
        }
    }

    pub fn activity(&self, text: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                text.with(settings::COLOR_ACTIVITY_TEXT)
            );
        } else {
            eprintln!("{text}");
        }
    }

    pub fn detail(&self, text: &str) {
        if self.color {
            eprintln!(
                "{}{}",
                settings::INDENT_1,
                text.with(settings::COLOR_FIELD_VALUE)
            );
        } else {
            eprintln!("{}{text}", settings::INDENT_1);
        }
    }

    pub fn success(&self, msg: &str) {
        if self.color {
            eprintln!(
                "{} {msg}",
                settings::LABEL_OK.with(settings::COLOR_SUCCESS).bold()
            );
        } else {
            eprintln!("{} {msg}", settings::LABEL_OK);
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.color {
            eprintln!(
                "{} {msg}",
                settings::LABEL_WARNING.with(settings::COLOR_WARNING).bold()
            );
        } else {
            eprintln!("{} {msg}", settings::LABEL_WARNING);
        }
    }

    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!(
                "{} {msg}",
                settings::LABEL_ERROR.with(settings::COLOR_ERROR).bold()
            );
        } else {
            eprintln!("{} {msg}", settings::LABEL_ERROR);
        }
    }
}
