//! Whitelist-and-rename table for course identifiers.
//!
//! The platform's product codes predate the current site naming, and not
//! every published course is synced. The table below is both the rename map
//! and the whitelist: a product code that isn't listed is excluded from
//! processing entirely.

/// Product code → site course id. Extend as new courses go live.
const COURSE_ID_MAPPING: &[(&str, &str)] = &[
    ("ontologics-sobr", "rational-work"),
    ("systems-thinking", "systems-thinking"),
    ("methodology", "methodology"),
    ("systems-engineering", "systems-engineering"),
    ("personality-engineering", "personality-engineering"),
    ("intro-online", "intro-online"),
];

/// Returns the site course id for a product code, or `None` when the course
/// is not whitelisted.
pub fn mapped_course_id(product_code: &str) -> Option<&'static str> {
    COURSE_ID_MAPPING
        .iter()
        .find(|(original, _)| *original == product_code)
        .map(|(_, mapped)| *mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renamed_course() {
        assert_eq!(mapped_course_id("ontologics-sobr"), Some("rational-work"));
    }

    #[test]
    fn test_identity_mapping() {
        assert_eq!(
            mapped_course_id("systems-thinking"),
            Some("systems-thinking")
        );
    }

    #[test]
    fn test_unlisted_course_excluded() {
        assert_eq!(mapped_course_id("internal-pilot"), None);
        assert_eq!(mapped_course_id(""), None);
    }
}
