//! Display formatting for report values.
//!
//! Templates look like `"R$ {:.2}"`, `"{:+.2}%"` or `"{:,.2}x"`: a literal
//! prefix, a single placeholder and a literal suffix. Inside the placeholder,
//! after `:`, come an optional `+` sign flag, an optional `,` grouping flag, an
//! optional `.N` precision and an optional trailing `f`.

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Token rendered for absent or meaningless values.
pub const NOT_APPLICABLE: &str = "N/A";

/// Semantics of the value being formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[default]
    Plain,
    /// Price/earnings style multiple; zero or negative is not meaningful.
    EarningsMultiple,
}

/// Decimal and grouping separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalStyle {
    /// `1,234.50`
    #[default]
    Point,
    /// `1.234,50`
    Comma,
}

impl DecimalStyle {
    fn separators(self) -> (char, char) {
        match self {
            Self::Point => ('.', ','),
            Self::Comma => (',', '.'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    prefix: String,
    suffix: String,
    precision: Option<usize>,
    sign: bool,
    grouping: bool,
}

impl NumberFormat {
    pub fn parse(template: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &'static str| ValidationError::InvalidFormat {
            template: template.to_owned(),
            reason,
        };

        let open = template.find('{').ok_or_else(|| invalid("missing placeholder"))?;
        let close = template[open..]
            .find('}')
            .map(|offset| open + offset)
            .ok_or_else(|| invalid("unterminated placeholder"))?;

        let prefix = &template[..open];
        let suffix = &template[close + 1..];
        if prefix.contains('}') || suffix.contains('{') || suffix.contains('}') {
            return Err(invalid("more than one placeholder"));
        }

        let mut format = Self {
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
            precision: None,
            sign: false,
            grouping: false,
        };

        let body = &template[open + 1..close];
        if body.is_empty() {
            return Ok(format);
        }
        let mut spec = body
            .strip_prefix(':')
            .ok_or_else(|| invalid("placeholder must start with ':'"))?;

        if let Some(rest) = spec.strip_prefix('+') {
            format.sign = true;
            spec = rest;
        }
        if let Some(rest) = spec.strip_prefix(',') {
            format.grouping = true;
            spec = rest;
        }
        if let Some(rest) = spec.strip_prefix('.') {
            let digits_end = rest
                .find(|ch: char| !ch.is_ascii_digit())
                .unwrap_or(rest.len());
            if digits_end == 0 {
                return Err(invalid("precision needs digits"));
            }
            let precision = rest[..digits_end]
                .parse::<usize>()
                .map_err(|_| invalid("precision out of range"))?;
            format.precision = Some(precision);
            spec = &rest[digits_end..];
        }
        if let Some(rest) = spec.strip_prefix('f') {
            spec = rest;
        }
        if !spec.is_empty() {
            return Err(invalid("unsupported format flag"));
        }

        Ok(format)
    }

    /// Renders a finite value; non-finite input renders as `N/A`.
    pub fn render(&self, value: f64, style: DecimalStyle) -> String {
        if !value.is_finite() {
            return NOT_APPLICABLE.to_owned();
        }

        let magnitude = match self.precision {
            Some(precision) => format!("{:.*}", precision, value.abs()),
            None => format!("{}", value.abs()),
        };
        let (integer, fraction) = match magnitude.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (magnitude.as_str(), None),
        };

        let (decimal_sep, group_sep) = style.separators();
        let mut number = String::with_capacity(magnitude.len() + 8);
        if value < 0.0 {
            number.push('-');
        } else if self.sign {
            number.push('+');
        }
        if self.grouping {
            number.push_str(&group_digits(integer, group_sep));
        } else {
            number.push_str(integer);
        }
        if let Some(fraction) = fraction {
            number.push(decimal_sep);
            number.push_str(fraction);
        }

        format!("{}{}{}", self.prefix, number, self.suffix)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats an optional value; absent, non-finite, non-positive multiples and
/// malformed templates all render as [`NOT_APPLICABLE`].
pub fn format_value(value: Option<f64>, template: &str, kind: ValueKind, style: DecimalStyle) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return NOT_APPLICABLE.to_owned();
    };
    if kind == ValueKind::EarningsMultiple && value <= 0.0 {
        return NOT_APPLICABLE.to_owned();
    }

    match NumberFormat::parse(template) {
        Ok(format) => format.render(value, style),
        Err(_) => NOT_APPLICABLE.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_rather_than_truncates() {
        assert_eq!(
            format_value(Some(12.345), "{:.2}", ValueKind::Plain, DecimalStyle::Point),
            "12.35"
        );
    }

    #[test]
    fn negative_multiple_is_not_applicable() {
        assert_eq!(
            format_value(Some(-5.0), "{:.2}x", ValueKind::EarningsMultiple, DecimalStyle::Point),
            NOT_APPLICABLE
        );
        assert_eq!(
            format_value(Some(0.0), "{:.2}x", ValueKind::EarningsMultiple, DecimalStyle::Point),
            NOT_APPLICABLE
        );
        assert_eq!(
            format_value(Some(-5.0), "{:.2}", ValueKind::Plain, DecimalStyle::Point),
            "-5.00"
        );
    }

    #[test]
    fn absent_and_non_finite_values_are_not_applicable() {
        for value in [None, Some(f64::NAN), Some(f64::INFINITY)] {
            assert_eq!(
                format_value(value, "{:.2}", ValueKind::Plain, DecimalStyle::Point),
                NOT_APPLICABLE
            );
        }
    }

    #[test]
    fn prefix_suffix_and_sign() {
        assert_eq!(
            format_value(Some(38.1), "R$ {:.2}", ValueKind::Plain, DecimalStyle::Point),
            "R$ 38.10"
        );
        assert_eq!(
            format_value(Some(3.2), "{:+.2}%", ValueKind::Plain, DecimalStyle::Point),
            "+3.20%"
        );
        assert_eq!(
            format_value(Some(-3.2), "{:+.2}%", ValueKind::Plain, DecimalStyle::Point),
            "-3.20%"
        );
    }

    #[test]
    fn comma_style_swaps_separators() {
        assert_eq!(
            format_value(Some(1234.5), "R$ {:,.2f}", ValueKind::Plain, DecimalStyle::Comma),
            "R$ 1.234,50"
        );
        assert_eq!(
            format_value(Some(1234.5), "{:,.2}", ValueKind::Plain, DecimalStyle::Point),
            "1,234.50"
        );
        assert_eq!(
            format_value(Some(7.26), "{:.1}x", ValueKind::Plain, DecimalStyle::Comma),
            "7,3x"
        );
    }

    #[test]
    fn bare_placeholder_uses_shortest_representation() {
        assert_eq!(
            format_value(Some(0.5), "{}", ValueKind::Plain, DecimalStyle::Point),
            "0.5"
        );
    }

    #[test]
    fn malformed_templates_render_not_applicable() {
        for template in ["{:.}", "{:.2", "no placeholder", "{:x}", "{:.2} {}", "{.2}"] {
            assert!(NumberFormat::parse(template).is_err(), "{template} should fail");
            assert_eq!(
                format_value(Some(1.0), template, ValueKind::Plain, DecimalStyle::Point),
                NOT_APPLICABLE
            );
        }
    }

    #[test]
    fn groups_long_integers() {
        assert_eq!(group_digits("1234567", ','), "1,234,567");
        assert_eq!(group_digits("123", ','), "123");
    }
}
