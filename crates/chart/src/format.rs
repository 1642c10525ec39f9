use configuration::Locale;
use core_types::{Column, MetricId};

/// Shown in place of a missing value.
pub const MISSING: &str = "–";

/// Formats the value of a card: Sharpe as a plain number with two decimals,
/// every other column as a percent with one decimal.
pub fn format_value(column: &Column, value: Option<f64>, locale: Locale) -> String {
    if column.is_metric(MetricId::Sharpe) {
        format_number(value, 2, locale)
    } else {
        format_percent(value, 1, locale)
    }
}

/// `0.123` -> `12,3%` (pt-BR) or `12.3%` (en-US).
pub fn format_percent(value: Option<f64>, digits: usize, locale: Locale) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{}%", format_number(Some(v * 100.0), digits, locale)),
        None => MISSING.to_string(),
    }
}

/// A fixed-point number with the locale's separators.
pub fn format_number(value: Option<f64>, digits: usize, locale: Locale) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return MISSING.to_string();
    };

    let fixed = format!("{:.*}", digits, v.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + 4);
    if v < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, locale.thousands_separator()));
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator());
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn percents_follow_the_locale() {
        assert_eq!(format_percent(Some(0.1234), 1, Locale::PtBr), "12,3%");
        assert_eq!(format_percent(Some(0.1234), 1, Locale::EnUs), "12.3%");
        assert_eq!(format_percent(Some(-0.071), 1, Locale::PtBr), "-7,1%");
        assert_eq!(format_percent(Some(12.5), 1, Locale::PtBr), "1.250,0%");
    }

    #[test]
    fn numbers_group_thousands() {
        assert_eq!(format_number(Some(1234567.891), 2, Locale::PtBr), "1.234.567,89");
        assert_eq!(format_number(Some(-1234.5), 2, Locale::EnUs), "-1,234.50");
        assert_eq!(format_number(Some(999.0), 0, Locale::PtBr), "999");
        assert_eq!(format_number(Some(0.456), 2, Locale::PtBr), "0,46");
    }

    #[test]
    fn missing_values_render_as_a_dash() {
        assert_eq!(format_percent(None, 1, Locale::PtBr), MISSING);
        assert_eq!(format_number(Some(f64::INFINITY), 2, Locale::PtBr), MISSING);
    }

    #[test]
    fn sharpe_is_not_a_percent() {
        let sharpe = Column::metric(MetricId::Sharpe);
        let vol = Column::metric(MetricId::Vol);
        assert_eq!(format_value(&sharpe, Some(0.5), Locale::PtBr), "0,50");
        assert_eq!(format_value(&vol, Some(0.5), Locale::PtBr), "50,0%");
    }
}
