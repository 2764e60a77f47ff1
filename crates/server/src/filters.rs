//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Avatar initials: first letters of the first and last words, uppercased.
///
/// Usage in templates: `{{ user.name|initials }}`
#[askama::filter_fn]
pub fn initials(name: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(initials_of(&name.to_string()))
}

fn initials_of(name: &str) -> String {
    let mut words = name.split_whitespace();
    let Some(first) = words.next() else {
        return "U".to_string();
    };

    let mut out: String = first.chars().take(1).collect();
    if let Some(last) = words.last() {
        out.extend(last.chars().take(1));
    }
    out.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials_of("Leanne Graham"), "LG");
        assert_eq!(initials_of("  mrs. dennis   schulist "), "MS");
        assert_eq!(initials_of("Ervin"), "E");
        assert_eq!(initials_of("   "), "U");
        assert_eq!(initials_of(""), "U");
    }
}
