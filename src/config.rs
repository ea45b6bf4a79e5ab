use crate::{cosines::DEFAULT_EPSILON, enums::Execution};

use dicom::core::Tag;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Invalid tolerance `{0}`, expected a finite number >= 0")]
pub struct ParseEpsilonError(pub String);

#[derive(Debug, Error, PartialEq)]
#[error("Invalid DICOM tag `{0}`, expected gggg,eeee")]
pub struct ParseTagError(pub String);

/// Settings for a categorization run.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizeOptions {
    /// Tolerance of the orientation comparison
    pub epsilon: f64,
    pub execution: Execution,
    /// Extra tags refining the series identity
    pub series_restrictions: Vec<Tag>,
}

impl Default for CategorizeOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            execution: Execution::Sequential,
            series_restrictions: Vec::new(),
        }
    }
}

impl CategorizeOptions {
    /// Defaults overridden by `DICOM_CATEGORIZE_EPSILON`,
    /// `DICOM_CATEGORIZE_PARALLEL` and `DICOM_CATEGORIZE_RESTRICT`
    /// (whitespace-separated tags). Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();

        let epsilon = lookup("DICOM_CATEGORIZE_EPSILON")
            .and_then(|v| parse_epsilon(&v).ok())
            .unwrap_or(default.epsilon);
        let parallel = lookup("DICOM_CATEGORIZE_PARALLEL").and_then(|v| v.trim().parse::<bool>().ok());
        let execution = match parallel {
            Some(true) => Execution::Parallel,
            Some(false) => Execution::Sequential,
            None => default.execution,
        };
        let series_restrictions = lookup("DICOM_CATEGORIZE_RESTRICT")
            .and_then(|v| {
                v.split_whitespace()
                    .map(parse_tag)
                    .collect::<Result<Vec<_>, _>>()
                    .ok()
            })
            .unwrap_or(default.series_restrictions);

        Self {
            epsilon,
            execution,
            series_restrictions,
        }
    }
}

/// Parse an orientation tolerance; NaN, infinities and negative values are
/// rejected.
pub fn parse_epsilon(text: &str) -> Result<f64, ParseEpsilonError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| ParseEpsilonError(text.to_owned()))
}

/// Parse a DICOM tag written as `gggg,eeee`, `gggg|eeee`, `(gggg,eeee)` or
/// `ggggeeee`, in hexadecimal.
pub fn parse_tag(text: &str) -> Result<Tag, ParseTagError> {
    let err = || ParseTagError(text.to_owned());
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(trimmed);

    let (group, element) = match inner.split_once([',', '|']) {
        Some(parts) => parts,
        None if inner.len() == 8 && inner.is_char_boundary(4) => inner.split_at(4),
        None => return Err(err()),
    };
    let (group, element) = (group.trim(), element.trim());
    if group.len() != 4 || element.len() != 4 {
        return Err(err());
    }

    let group = u16::from_str_radix(group, 16).map_err(|_| err())?;
    let element = u16::from_str_radix(element, 16).map_err(|_| err())?;
    Ok(Tag(group, element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_common_tag_notations() {
        let series_date = Tag(0x0008, 0x0021);
        assert_eq!(parse_tag("0008,0021"), Ok(series_date));
        assert_eq!(parse_tag("0008|0021"), Ok(series_date));
        assert_eq!(parse_tag("(0008,0021)"), Ok(series_date));
        assert_eq!(parse_tag("00080021"), Ok(series_date));
        assert_eq!(parse_tag("0020,000e"), Ok(Tag(0x0020, 0x000E)));
    }

    #[test]
    fn rejects_malformed_tags() {
        for text in ["", "0008", "8,21", "0008,00210", "zzzz,0021", "(0008,0021"] {
            assert!(parse_tag(text).is_err(), "{text}");
        }
    }

    #[test]
    fn accepts_only_finite_non_negative_epsilon() {
        assert_eq!(parse_epsilon("0.001"), Ok(0.001));
        assert_eq!(parse_epsilon(" 0 "), Ok(0.0));
        for text in ["NaN", "nan", "inf", "-inf", "-0.1", "small", ""] {
            assert!(parse_epsilon(text).is_err(), "{text}");
        }
    }

    #[test]
    fn nan_epsilon_in_environment_falls_back() {
        let vars = HashMap::from([("DICOM_CATEGORIZE_EPSILON", "NaN")]);
        let options = CategorizeOptions::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(options.epsilon, DEFAULT_EPSILON);
    }

    #[test]
    fn environment_overrides_defaults() {
        let vars = HashMap::from([
            ("DICOM_CATEGORIZE_EPSILON", "0.001"),
            ("DICOM_CATEGORIZE_PARALLEL", "true"),
            ("DICOM_CATEGORIZE_RESTRICT", "0008|0021 0020,0012"),
        ]);
        let options = CategorizeOptions::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(options.epsilon, 0.001);
        assert_eq!(options.execution, Execution::Parallel);
        assert_eq!(
            options.series_restrictions,
            [Tag(0x0008, 0x0021), Tag(0x0020, 0x0012)]
        );
    }

    #[test]
    fn invalid_environment_values_fall_back() {
        let vars = HashMap::from([
            ("DICOM_CATEGORIZE_EPSILON", "tiny"),
            ("DICOM_CATEGORIZE_PARALLEL", "yes"),
            ("DICOM_CATEGORIZE_RESTRICT", "0008|0021 nope"),
        ]);
        let options = CategorizeOptions::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(options, CategorizeOptions::default());
    }
}
