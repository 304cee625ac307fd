//! Numeral agreement for Ukrainian nouns.
//!
//! Slavic languages pick one of three noun forms depending on the last one or
//! two digits of a count: "1 хвилина", "3 хвилини", "5 хвилин", "11 хвилин",
//! "21 хвилина".

/// Noun forms for "minute".
pub const MINUTES: [&str; 3] = ["хвилина", "хвилини", "хвилин"];

/// Pick the noun form agreeing with `n`.
///
/// `forms` is `[one, few, many]`: `one` for 1, 21, 101 ...; `few` for 2-4,
/// 22-24 ...; `many` for everything else including the 11-14 teens.
pub fn pluralize<'a>(n: u64, forms: [&'a str; 3]) -> &'a str {
    let last = n % 10;
    let last_two = n % 100;
    if last == 1 && last_two != 11 {
        forms[0]
    } else if (2..=4).contains(&last) && !(12..=14).contains(&last_two) {
        forms[1]
    } else {
        forms[2]
    }
}

/// `"<n> <form>"` with the agreeing noun form.
pub fn format_count(n: u64, forms: [&str; 3]) -> String {
    format!("{n} {}", pluralize(n, forms))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMS: [&str; 3] = ["s", "p1", "p2"];

    #[test]
    fn test_singular() {
        assert_eq!(pluralize(1, FORMS), "s");
        assert_eq!(pluralize(21, FORMS), "s");
        assert_eq!(pluralize(101, FORMS), "s");
    }

    #[test]
    fn test_few() {
        assert_eq!(pluralize(2, FORMS), "p1");
        assert_eq!(pluralize(3, FORMS), "p1");
        assert_eq!(pluralize(24, FORMS), "p1");
        assert_eq!(pluralize(102, FORMS), "p1");
    }

    #[test]
    fn test_many_including_teens() {
        assert_eq!(pluralize(0, FORMS), "p2");
        assert_eq!(pluralize(5, FORMS), "p2");
        assert_eq!(pluralize(11, FORMS), "p2");
        assert_eq!(pluralize(12, FORMS), "p2");
        assert_eq!(pluralize(14, FORMS), "p2");
        assert_eq!(pluralize(111, FORMS), "p2");
        assert_eq!(pluralize(120, FORMS), "p2");
    }

    #[test]
    fn test_format_count_minutes() {
        assert_eq!(format_count(1, MINUTES), "1 хвилина");
        assert_eq!(format_count(2, MINUTES), "2 хвилини");
        assert_eq!(format_count(30, MINUTES), "30 хвилин");
    }
}
