//! # Formatting Utilities
//!
//! Normalized (storage) and display forms for phone numbers and licence
//! plates, plus URL slugs for listings.
//!
//! ```text
//!   input            normalize        denormalize
//!   ─────            ─────────        ───────────
//!   (071) 234-5678   0712345678       071-234-5678
//!   ka 01-ab 1234    KA01AB1234       (unchanged, not 9 chars)
//!   kb-c12 3456      KBC123456        KB-C12 3456
//! ```

use chrono::{DateTime, Utc};

// =============================================================================
// Phone Numbers
// =============================================================================

/// Keeps only ASCII digits.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups a 10-digit number as `DDD-DDD-DDDD`.
///
/// Numbers of any other length are returned as bare digits.
///
/// ## Example
/// ```rust
/// use carhire_core::format::denormalize_phone;
///
/// assert_eq!(denormalize_phone("0712345678"), "071-234-5678");
/// assert_eq!(denormalize_phone("+254 712"), "254712");
/// ```
pub fn denormalize_phone(phone: &str) -> String {
    let digits = normalize_phone(phone);
    if digits.len() != 10 {
        return digits;
    }
    format!("{}-{}-{}", &digits[0..3], &digits[3..6], &digits[6..10])
}

// =============================================================================
// Licence Plates
// =============================================================================

/// Uppercases and drops everything that is not an ASCII letter or digit.
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Regroups a 9-character plate as `XX-XXX DDDD`.
///
/// Plates of any other length are returned in normalized form.
pub fn denormalize_plate(plate: &str) -> String {
    let plate = normalize_plate(plate);
    if plate.len() != 9 {
        return plate;
    }
    format!("{}-{} {}", &plate[0..2], &plate[2..5], &plate[5..9])
}

// =============================================================================
// Slugs
// =============================================================================

/// Lowercase, hyphenated slug suffixed with the creation time in unix millis.
///
/// ## Example
/// ```rust
/// use carhire_core::format::slugify;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.timestamp_millis_opt(1_717_200_000_000).unwrap();
/// assert_eq!(slugify("2022 Toyota Camry!", at), "2022-toyota-camry-1717200000000");
/// ```
pub fn slugify(title: &str, created_at: DateTime<Utc>) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    let stamp = created_at.timestamp_millis();
    if slug.is_empty() {
        stamp.to_string()
    } else {
        format!("{}-{}", slug, stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_phone() {
        assert_eq!(normalize_phone("(071) 234-5678"), "0712345678");
        assert_eq!(denormalize_phone("(071) 234-5678"), "071-234-5678");
        assert_eq!(denormalize_phone("12345"), "12345");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_plate() {
        assert_eq!(normalize_plate("kb-c12 3456"), "KBC123456");
        assert_eq!(denormalize_plate("kb-c12 3456"), "KB-C12 3456");
        assert_eq!(denormalize_plate("ka 01-ab 1234"), "KA01AB1234");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        let at = Utc.timestamp_millis_opt(1_000).unwrap();
        assert_eq!(slugify("  BMW -- X3 (2023) ", at), "bmw-x3-2023-1000");
        assert_eq!(slugify("!!!", at), "1000");
    }
}
