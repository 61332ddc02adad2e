use std::sync::LazyLock;

use regex::Regex;

/// Regex for validating URL-friendly slugs (lowercase alphanumeric with hyphens).
/// Examples: "acme-support", "tenant1", "test-org-123"
pub static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

/// Regex for E.164 phone numbers as WhatsApp expects them.
/// Examples: "+5511999887766", "+14155552671"
pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{7,14}$").unwrap());
