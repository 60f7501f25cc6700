//! Measure display conversion for metric recipe measures.

use regex::Regex;
use std::sync::LazyLock;

static MEASURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d.]+)\s*(cl|dl)").expect("valid measure regex"));

const CL_TO_OZ: f64 = 0.33814;
const DL_TO_OZ: f64 = 3.3814;

/// Convert a cl/dl measure into an oz display string with the ml equivalent
/// in parentheses, e.g. `"4 cl"` becomes `"1 oz (40 ml)"`. The oz value is
/// snapped to 0, 0.5, 1, or the nearest integer. Measures that don't contain
/// a cl/dl quantity are returned unchanged.
pub fn convert_to_oz_with_ml(measure: &str) -> String {
    let Some(caps) = MEASURE_RE.captures(measure) else {
        return measure.to_string();
    };
    let value: f64 = match caps[1].parse() {
        Ok(v) => v,
        Err(_) => return measure.to_string(),
    };

    let (oz_raw, ml) = if caps[2].eq_ignore_ascii_case("cl") {
        (value * CL_TO_OZ, value * 10.0)
    } else {
        (value * DL_TO_OZ, value * 100.0)
    };

    let oz = if oz_raw <= 0.2 {
        0.0
    } else if oz_raw <= 0.7 {
        0.5
    } else if oz_raw <= 1.0 {
        1.0
    } else {
        oz_raw.round()
    };

    let oz_text = if oz.fract() == 0.0 {
        format!("{}", oz as i64)
    } else {
        format!("{oz}")
    };
    format!("{oz_text} oz ({} ml)", ml.floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_centiliters() {
        assert_eq!(convert_to_oz_with_ml("4 cl"), "1 oz (40 ml)");
        assert_eq!(convert_to_oz_with_ml("6 cl"), "2 oz (60 ml)");
        assert_eq!(convert_to_oz_with_ml("1.5cl"), "0.5 oz (15 ml)");
    }

    #[test]
    fn converts_deciliters() {
        assert_eq!(convert_to_oz_with_ml("1 dl"), "3 oz (100 ml)");
    }

    #[test]
    fn snaps_tiny_amounts_to_zero() {
        assert_eq!(convert_to_oz_with_ml("0.5 cl"), "0 oz (5 ml)");
    }

    #[test]
    fn passes_through_other_measures() {
        assert_eq!(convert_to_oz_with_ml("2 oz"), "2 oz");
        assert_eq!(convert_to_oz_with_ml("1 dash"), "1 dash");
        assert_eq!(convert_to_oz_with_ml(""), "");
    }
}
