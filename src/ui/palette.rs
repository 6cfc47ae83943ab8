//! ui::palette
//!
//! Color resolution for report fields.
//!
//! Each field either has a fixed color or inherits the row's signature tone.
//! The author field is special: it takes the signature tone when the author
//! is also the signer, and its own color otherwise.

use std::str::FromStr;

use colored::{Color, Colorize};

use crate::core::record::{CommitRecord, Severity};

/// Columns of a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Date,
    Author,
    Message,
    Refs,
    Signer,
}

/// How a field is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldColor {
    /// Use the row's signature tone.
    Inherit,
    /// No color.
    Plain,
    /// Always this color.
    Fixed(Color),
}

impl FromStr for FieldColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inherit" => Ok(FieldColor::Inherit),
            "plain" | "none" | "default" => Ok(FieldColor::Plain),
            other => Color::from_str(other)
                .map(FieldColor::Fixed)
                .map_err(|_| format!("unknown color '{}'", s)),
        }
    }
}

/// Field colors, signature tones and the color switch, threaded into the
/// renderer as one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// When false, every string is emitted plain.
    pub enabled: bool,
    pub id: FieldColor,
    pub date: FieldColor,
    pub author: FieldColor,
    pub message: FieldColor,
    pub refs: FieldColor,
    pub signer: FieldColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            enabled: true,
            id: FieldColor::Inherit,
            date: FieldColor::Fixed(Color::Blue),
            author: FieldColor::Fixed(Color::Cyan),
            message: FieldColor::Inherit,
            refs: FieldColor::Fixed(Color::Yellow),
            signer: FieldColor::Inherit,
        }
    }
}

impl Palette {
    /// A palette that never emits escapes.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Configured color for `field`.
    pub fn field(&self, field: Field) -> FieldColor {
        match field {
            Field::Id => self.id,
            Field::Date => self.date,
            Field::Author => self.author,
            Field::Message => self.message,
            Field::Refs => self.refs,
            Field::Signer => self.signer,
        }
    }

    pub fn set_field(&mut self, field: Field, color: FieldColor) {
        let slot = match field {
            Field::Id => &mut self.id,
            Field::Date => &mut self.date,
            Field::Author => &mut self.author,
            Field::Message => &mut self.message,
            Field::Refs => &mut self.refs,
            Field::Signer => &mut self.signer,
        };
        *slot = color;
    }

    /// Color for a signature tone. Unsigned rows have no tone.
    pub fn tone(severity: Severity) -> Option<Color> {
        match severity {
            Severity::Good => Some(Color::Green),
            Severity::Caution => Some(Color::Yellow),
            Severity::Bad => Some(Color::Red),
            Severity::None => None,
        }
    }

    /// Effective color of `field` in `record`'s row.
    pub fn resolve(&self, field: Field, record: &CommitRecord) -> Option<Color> {
        let tone = Self::tone(record.severity());
        if field == Field::Author && record.signed_by_author() {
            return tone;
        }
        match self.field(field) {
            FieldColor::Inherit => tone,
            FieldColor::Plain => None,
            FieldColor::Fixed(color) => Some(color),
        }
    }

    /// Apply `color` to `text` if colors are enabled.
    pub fn paint(&self, text: &str, color: Option<Color>) -> String {
        match color {
            Some(color) if self.enabled => text.color(color).to_string(),
            _ => text.to_string(),
        }
    }

    /// Paint the value of `field` for `record`.
    pub fn paint_field(&self, field: Field, text: &str, record: &CommitRecord) -> String {
        self.paint(text, self.resolve(field, record))
    }

    /// Section header emphasis.
    pub fn header(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}
