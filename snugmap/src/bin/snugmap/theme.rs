use colored::Color;
use comfy_table::Color as TableColor;
use snugmap::IndexFieldType;

/// Severity of a one-line status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
    Detail,
}

impl Level {
    pub const fn marker(self) -> &'static str {
        match self {
            Level::Success => "✓",
            Level::Error => "✗",
            Level::Warning => "⚠",
            Level::Info => "ℹ",
            Level::Detail => "→",
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Level::Success => Color::Green,
            Level::Error => Color::Red,
            Level::Warning => Color::Yellow,
            Level::Info => Color::Blue,
            Level::Detail => Color::BrightBlack,
        }
    }
}

pub const HEADING: Color = Color::BrightBlue;
pub const SECTION: Color = Color::Cyan;
pub const LITERAL: Color = Color::Magenta;
pub const PLACEHOLDER: Color = Color::BrightBlack;
pub const KEY: Color = Color::BrightCyan;
pub const VALUE: Color = Color::White;

/// Table colour for a field's type, keyed by the RediSearch type it is indexed as.
pub const fn index_type_color(index_type: IndexFieldType) -> TableColor {
    match index_type {
        IndexFieldType::Tag => TableColor::Magenta,
        IndexFieldType::Text => TableColor::Green,
        IndexFieldType::Numeric => TableColor::Blue,
        IndexFieldType::Geo => TableColor::Yellow,
    }
}
