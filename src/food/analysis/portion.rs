//! Text scanning for quantities and portion sizes.
//!
//! Each rule is a standalone function so the portion-inference order in the
//! community-database client can be tested one rule at a time.
//!
//! Grammars (case-insensitive):
//!
//! ```text
//! number     := digit+ ( "." digit+ )?
//! quantity   := number ( "x" | "×" )?     -- one whole token, e.g. "2", "1.5", "3x"
//! grams      := number ws* ( "grams" | "gram" | "g" ) <word boundary>
//! multipack  := number ws* ( "x" | "×" ) ws* grams
//! ```
//!
//! Tokens for `quantity` are produced by splitting on whitespace and on
//! `, ; : ( ) [ ] / ! ?`, then trimming trailing periods. A token carrying a
//! unit (`"200g"`, `"3oz"`) is a measurement, not a count, and is skipped.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref QUANTITY_TOKEN: Regex = Regex::new(r"^(\d+(?:\.\d+)?)[x×]?$").unwrap();
    static ref GRAMS: Regex = Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(?:grams|gram|g)\b").unwrap();
    static ref MULTIPACK: Regex =
        Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*[x×]\s*(\d+(?:\.\d+)?)\s*(?:grams|gram|g)\b").unwrap();
}

const TOKEN_SEPARATORS: &[char] = &[',', ';', ':', '(', ')', '[', ']', '/', '!', '?'];

/// First whole-token number in `text`, e.g. `"2 bananas"` -> 2, `"1.5 cups rice"` -> 1.5.
/// Digits glued to letters (`"v8"`, `"200g"`, `"7up"`) are not counts.
pub fn extract_quantity(text: &str) -> Option<f64> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| c.is_whitespace() || TOKEN_SEPARATORS.contains(&c))
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| !token.is_empty())
        .find_map(|token| {
            QUANTITY_TOKEN
                .captures(token)
                .and_then(|caps| caps[1].parse::<f64>().ok())
        })
}

/// First explicit gram amount, e.g. `"200g chicken"` -> 200, `"serving 30 grams"` -> 30.
pub fn parse_grams(text: &str) -> Option<f64> {
    GRAMS
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|grams| *grams > 0.0)
}

/// Total grams of a multipack such as `"3 x 60 g"` -> 180.
pub fn parse_multipack_grams(text: &str) -> Option<f64> {
    let caps = MULTIPACK.captures(text)?;
    let count = caps[1].parse::<f64>().ok()?;
    let each = caps[2].parse::<f64>().ok()?;
    let total = count * each;
    (total > 0.0).then_some(total)
}

/// Multipack first, then a plain gram amount.
pub fn parse_package_grams(text: &str) -> Option<f64> {
    parse_multipack_grams(text).or_else(|| parse_grams(text))
}

/// Reads a JSON number or numeric string. Anything else is `None`.
pub fn lenient_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_quantity_first_token() {
        assert_eq!(extract_quantity("2 bananas"), Some(2.0));
        assert_eq!(extract_quantity("banana x 3 then 4"), Some(3.0));
        assert_eq!(extract_quantity("1.5 cups of rice"), Some(1.5));
        assert_eq!(extract_quantity("eggs (3)"), Some(3.0));
        assert_eq!(extract_quantity("I ate 2."), Some(2.0));
    }

    #[test]
    fn test_extract_quantity_skips_measurements() {
        assert_eq!(extract_quantity("200g chicken breast"), None);
        assert_eq!(extract_quantity("3oz salmon"), None);
        assert_eq!(extract_quantity("200g rice, 2 eggs"), Some(2.0));
        assert_eq!(extract_quantity("2x banana"), Some(2.0));
        assert_eq!(extract_quantity("3× apple"), Some(3.0));
    }

    #[test]
    fn test_extract_quantity_ignores_numbers_inside_words() {
        assert_eq!(extract_quantity("v8 juice"), None);
        assert_eq!(extract_quantity("vitamin b12 shake"), None);
        assert_eq!(extract_quantity("7up"), None);
        assert_eq!(extract_quantity("banana"), None);
        assert_eq!(extract_quantity(""), None);
    }

    #[test]
    fn test_extract_quantity_fraction_takes_numerator() {
        assert_eq!(extract_quantity("1/2 apple"), Some(1.0));
    }

    #[test]
    fn test_parse_grams() {
        assert_eq!(parse_grams("200g chicken"), Some(200.0));
        assert_eq!(parse_grams("chicken 150 grams"), Some(150.0));
        assert_eq!(parse_grams("1 cup (240 g)"), Some(240.0));
        assert_eq!(parse_grams("2.5 gram pinch"), Some(2.5));
        assert_eq!(parse_grams("30G"), Some(30.0));
    }

    #[test]
    fn test_parse_grams_rejects_other_units() {
        assert_eq!(parse_grams("2 grapes"), None);
        assert_eq!(parse_grams("1 kg rice"), None);
        assert_eq!(parse_grams("5kg"), None);
        assert_eq!(parse_grams("330 ml"), None);
        assert_eq!(parse_grams("0 g"), None);
    }

    #[test]
    fn test_parse_multipack_grams() {
        assert_eq!(parse_multipack_grams("3 x 60 g"), Some(180.0));
        assert_eq!(parse_multipack_grams("4x25g"), Some(100.0));
        assert_eq!(parse_multipack_grams("2 × 1.5 grams"), Some(3.0));
        assert_eq!(parse_multipack_grams("60 g"), None);
    }

    #[test]
    fn test_parse_package_grams_prefers_multipack() {
        assert_eq!(parse_package_grams("3 x 60 g"), Some(180.0));
        assert_eq!(parse_package_grams("400 g"), Some(400.0));
        assert_eq!(parse_package_grams("1 l"), None);
    }

    #[test]
    fn test_lenient_number() {
        assert_eq!(lenient_number(Some(&json!(12.5))), Some(12.5));
        assert_eq!(lenient_number(Some(&json!("400"))), Some(400.0));
        assert_eq!(lenient_number(Some(&json!("premium only"))), None);
        assert_eq!(lenient_number(Some(&json!(null))), None);
        assert_eq!(lenient_number(None), None);
    }
}
