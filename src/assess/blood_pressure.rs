use std::sync::LazyLock;

use regex::Regex;

static BP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9]+)/([0-9]+)$").unwrap());

/// Parse `"systolic/diastolic"`. Anything else (extra separators, whitespace,
/// signs, decimals) yields `None`. Components too large for `u32` saturate.
pub fn parse(raw: &str) -> Option<(u32, u32)> {
    let caps = BP_RE.captures(raw)?;
    Some((component(&caps[1]), component(&caps[2])))
}

// Digits only, so overflow is the one way parsing can fail.
fn component(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed() {
        assert_eq!(parse("120/80"), Some((120, 80)));
        assert_eq!(parse("090/060"), Some((90, 60)));
    }

    #[test]
    fn wrong_separator() {
        assert_eq!(parse("120-80"), None);
    }

    #[test]
    fn empty() {
        assert_eq!(parse(""), None);
    }

    #[test]
    fn too_many_parts() {
        assert_eq!(parse("12/8/4"), None);
    }

    #[test]
    fn missing_half() {
        assert_eq!(parse("150/"), None);
        assert_eq!(parse("/90"), None);
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(parse(" 120/80"), None);
        assert_eq!(parse("120/80\n"), None);
        assert_eq!(parse("120 / 80"), None);
    }

    #[test]
    fn non_ascii_digits() {
        assert_eq!(parse("١٢٠/٨٠"), None);
    }

    #[test]
    fn oversized_components_saturate() {
        assert_eq!(parse("5000000000/80"), Some((u32::MAX, 80)));
        assert_eq!(parse("120/99999999999999999999999"), Some((120, u32::MAX)));
    }

    #[test]
    fn placeholder_text() {
        assert_eq!(parse("INVALID"), None);
        assert_eq!(parse("N/A"), None);
    }
}
