//! URL slugs derived from display names

/// Turn a display name into a URL slug.
///
/// Lowercases and trims, drops everything except ASCII letters, digits,
/// `_`, `-` and whitespace, collapses runs of whitespace, `_` and `-` into a
/// single `-`, then trims `-` from both ends.
///
/// ```rust,ignore
/// assert_eq!(slugify("Sunset Apartments!!"), "sunset-apartments");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Sunset Apartments!!"), "sunset-apartments");
    }

    #[test]
    fn test_collapses_separators() {
        assert_eq!(slugify("  Green -- Valley__PG  "), "green-valley-pg");
        assert_eq!(slugify("a _-_ b"), "a-b");
    }

    #[test]
    fn test_trims_edge_hyphens() {
        assert_eq!(slugify("--Hostel--"), "hostel");
        assert_eq!(slugify("_Co-living_"), "co-living");
    }

    #[test]
    fn test_removed_characters_do_not_separate() {
        assert_eq!(slugify("Rock'n'Roll Inn"), "rocknroll-inn");
        assert_eq!(slugify("Stay@Home #1"), "stayhome-1");
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(slugify("Café Résidence"), "caf-rsidence");
        assert_eq!(slugify("!!!"), "");
    }
}
