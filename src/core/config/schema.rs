//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same schema is used for the global file and the repository file;
//! every key is optional and repository values override global ones.
//!
//! # Validation
//!
//! Values are validated after parsing: the budget must be positive and
//! color names must be known.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::ui::palette::{Field, FieldColor};

/// One configuration file.
///
/// # Example
///
/// ```toml
/// count = 20
/// color = true
/// hide_merged = false
/// graph = false
///
/// [colors]
/// date = "blue"
/// message = "inherit"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Default commit budget
    pub count: Option<usize>,

    /// Color output
    pub color: Option<bool>,

    /// Skip the merged section
    pub hide_merged: Option<bool>,

    /// Show the graph prefix
    pub graph: Option<bool>,

    /// Per-field colors
    pub colors: Option<ColorTable>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == Some(0) {
            return Err(ConfigError::InvalidValue(
                "count must be at least 1".to_string(),
            ));
        }

        if let Some(colors) = &self.colors {
            colors.validate()?;
        }

        Ok(())
    }
}

/// Field color overrides. Values are color names, `inherit` or `plain`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ColorTable {
    pub id: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub message: Option<String>,
    pub refs: Option<String>,
    pub signer: Option<String>,
}

impl ColorTable {
    /// Raw value configured for `field`.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => self.id.as_deref(),
            Field::Date => self.date.as_deref(),
            Field::Author => self.author.as_deref(),
            Field::Message => self.message.as_deref(),
            Field::Refs => self.refs.as_deref(),
            Field::Signer => self.signer.as_deref(),
        }
    }

    /// Parsed color for `field`, if configured.
    pub fn color(&self, field: Field) -> Result<Option<FieldColor>, ConfigError> {
        self.get(field)
            .map(|raw| raw.parse::<FieldColor>().map_err(ConfigError::InvalidValue))
            .transpose()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for field in ALL_FIELDS {
            self.color(field)?;
        }
        Ok(())
    }
}

/// Every configurable field, in display order.
pub const ALL_FIELDS: [Field; 6] = [
    Field::Id,
    Field::Date,
    Field::Author,
    Field::Message,
    Field::Refs,
    Field::Signer,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_valid() {
        assert!(ConfigFile::default().validate().is_ok());
    }

    #[test]
    fn zero_count_rejected() {
        let config = ConfigFile {
            count: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn unknown_color_rejected() {
        let config: ConfigFile = toml::from_str(
            r#"
            [colors]
            date = "sparkly"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_colors() {
        let config: ConfigFile = toml::from_str(
            r#"
            count = 30
            [colors]
            refs = "plain"
            signer = "magenta"
            "#,
        )
        .unwrap();
        let colors = config.colors.unwrap();
        assert_eq!(colors.color(Field::Refs).unwrap(), Some(FieldColor::Plain));
        assert_eq!(colors.color(Field::Id).unwrap(), None);
        assert!(matches!(
            colors.color(Field::Signer).unwrap(),
            Some(FieldColor::Fixed(_))
        ));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("trunk = \"main\"");
        assert!(result.is_err());
    }
}
