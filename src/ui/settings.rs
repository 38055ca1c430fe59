//! Hardcoded labels, glyphs, and colors for console output.

use crossterm::style::Color;

pub const INDENT_1: &str = "  ";

pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";
pub const LABEL_OK: &str = "ok:";

pub const GLYPH_SECTION_BULLET: &str = "•";

pub const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
pub const COLOR_SECTION_TITLE: Color = Color::White;
pub const COLOR_ACTIVITY_TEXT: Color = Color::Grey;
pub const COLOR_FIELD_KEY: Color = Color::DarkGrey;
pub const COLOR_FIELD_VALUE: Color = Color::Grey;
pub const COLOR_SUCCESS: Color = Color::Green;
pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;
