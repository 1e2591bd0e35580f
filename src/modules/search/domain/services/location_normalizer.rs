//! Canonicalizes free-text city and locality strings.
//!
//! Listings arrive with whatever spelling the owner typed ("Bengaluru",
//! "bangalore east", "Navi Mumbai"), so locality matching folds everything
//! through a fixed alias table before comparing.

/// Alias fragments -> canonical city name. Matching is case-insensitive
/// substring containment, checked in table order.
const CITY_ALIASES: &[(&[&str], &str)] = &[
    (&["bangalore", "bengaluru"], "Bangalore"),
    (&["mumbai", "bombay"], "Mumbai"),
    (&["new delhi", "delhi"], "Delhi"),
    (&["gurgaon", "gurugram"], "Gurgaon"),
    (&["chennai", "madras"], "Chennai"),
    (&["hyderabad", "secunderabad"], "Hyderabad"),
    (&["kolkata", "calcutta"], "Kolkata"),
    (&["mysore", "mysuru"], "Mysore"),
    (&["kochi", "cochin"], "Kochi"),
    (&["pune"], "Pune"),
    (&["noida"], "Noida"),
    (&["ahmedabad"], "Ahmedabad"),
];

/// Fold a free-text location string into a canonical city name when an alias
/// matches, otherwise return the trimmed original.
///
/// Never errors: empty or blank input yields an empty string. Idempotent,
/// since every canonical output re-matches its own alias row.
pub fn normalize_location_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let lower = trimmed.to_lowercase();
    for (aliases, canonical) in CITY_ALIASES {
        if aliases.iter().any(|alias| lower.contains(alias)) {
            return (*canonical).to_string();
        }
    }

    trimmed.to_string()
}

/// Whether a (raw or canonical) name refers to one of the major cities the
/// locality filter matches against `Property::city` instead of `locality`.
pub fn is_major_city(name: &str) -> bool {
    let canonical = normalize_location_name(name);
    CITY_ALIASES.iter().any(|(_, city)| *city == canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_folding() {
        assert_eq!(normalize_location_name("bengaluru"), "Bangalore");
        assert_eq!(normalize_location_name("Bangalore South"), "Bangalore");
        assert_eq!(normalize_location_name("BOMBAY"), "Mumbai");
        assert_eq!(normalize_location_name("Navi Mumbai"), "Mumbai");
        assert_eq!(normalize_location_name("Gurugram Sector 45"), "Gurgaon");
    }

    #[test]
    fn test_unknown_passes_through_trimmed() {
        assert_eq!(normalize_location_name("  Whitefield  "), "Whitefield");
        assert_eq!(normalize_location_name("HSR Layout"), "HSR Layout");
    }

    #[test]
    fn test_empty_and_blank_yield_empty() {
        assert_eq!(normalize_location_name(""), "");
        assert_eq!(normalize_location_name("   "), "");
    }

    #[test]
    fn test_idempotent() {
        for input in ["bengaluru", "Whitefield", "BOMBAY", "", "Mysuru", "Indiranagar, Bangalore"] {
            let once = normalize_location_name(input);
            assert_eq!(normalize_location_name(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_major_city_detection() {
        assert!(is_major_city("Bangalore"));
        assert!(is_major_city("bengaluru"));
        assert!(is_major_city("Calcutta"));
        assert!(!is_major_city("Whitefield"));
        assert!(!is_major_city(""));
    }
}
