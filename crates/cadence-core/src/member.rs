//! Member-name parsing and department assignment.
//!
//! Members are identified by a `"Full Name - Role"` string; the role half
//! drives department assignment via a fixed keyword table.

use anyhow::bail;

use crate::types::UNKNOWN_DEPARTMENT;

/// Accepted length range for a member name, in characters.
pub const MEMBER_NAME_MIN: usize = 3;
pub const MEMBER_NAME_MAX: usize = 100;

/// Accepted length range for update text, in characters.
pub const UPDATE_TEXT_MIN: usize = 10;
pub const UPDATE_TEXT_MAX: usize = 2000;

/// Parse and normalize a `"Full Name - Role"` member string.
///
/// Returns `(normalized_name, role)`. Surrounding whitespace on either half
/// is stripped and the canonical `"Name - Role"` spelling is rebuilt, so
/// lookups against the roster are stable regardless of input spacing.
pub fn parse_member_name(raw: &str) -> anyhow::Result<(String, String)> {
    let raw = raw.trim();
    let len = raw.chars().count();
    if len < MEMBER_NAME_MIN || len > MEMBER_NAME_MAX {
        bail!("member name must be {MEMBER_NAME_MIN}..={MEMBER_NAME_MAX} characters, got {len}");
    }
    let Some((name, role)) = raw.split_once(" - ") else {
        bail!("member name must be in the form \"Full Name - Role\"");
    };
    let name = name.trim();
    let role = role.trim();
    if name.is_empty() {
        bail!("name part cannot be empty");
    }
    if role.is_empty() {
        bail!("role part cannot be empty");
    }
    Ok((format!("{name} - {role}"), role.to_string()))
}

/// Validate the length of submitted update text.
pub fn validate_update_text(text: &str) -> anyhow::Result<()> {
    let len = text.chars().count();
    if len < UPDATE_TEXT_MIN || len > UPDATE_TEXT_MAX {
        bail!("update text must be {UPDATE_TEXT_MIN}..={UPDATE_TEXT_MAX} characters, got {len}");
    }
    Ok(())
}

/// Map a role title onto a department. Keyword match, first hit wins.
pub fn department_for_role(role: &str) -> &'static str {
    let role = role.to_lowercase();
    let has = |needle: &str| role.contains(needle);
    if has("product") {
        "Product Management"
    } else if has("solution") {
        "Solutions"
    } else if has("delivery") || has("project") || has("service manager") {
        "Service Delivery"
    } else if has("quality") || has("sre") || has("performance") {
        "Service Assurance"
    } else if has("it") || has("infrastructure") || has("security") {
        "IT"
    } else if has("dev") {
        "Development"
    } else if has("platform") || has("devops") || has("cloud") {
        "Platform Engineering"
    } else if has("hr") {
        "HR"
    } else if has("legal") || has("compliance") {
        "Legal"
    } else {
        UNKNOWN_DEPARTMENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_spacing() {
        let (name, role) = parse_member_name("  Sarah Chen -   Product Manager ").unwrap();
        assert_eq!(name, "Sarah Chen - Product Manager");
        assert_eq!(role, "Product Manager");
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert!(parse_member_name("Sarah Chen").is_err());
        assert!(parse_member_name("Sarah-Chen").is_err());
    }

    #[test]
    fn parse_rejects_empty_halves() {
        assert!(parse_member_name("     - Product Manager").is_err());
        // "X -         " trims to "X -" which has no " - " separator left
        assert!(parse_member_name("Sarah Chen -  ").is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_lengths() {
        assert!(parse_member_name("a").is_err());
        let long = format!("{} - Role", "x".repeat(120));
        assert!(parse_member_name(&long).is_err());
    }

    #[test]
    fn update_text_bounds() {
        assert!(validate_update_text("too short").is_err());
        assert!(validate_update_text("just about long enough").is_ok());
        assert!(validate_update_text(&"x".repeat(2001)).is_err());
    }

    #[test]
    fn department_table() {
        assert_eq!(department_for_role("Product Manager"), "Product Management");
        assert_eq!(department_for_role("Solutions Architect"), "Solutions");
        assert_eq!(department_for_role("Delivery Lead"), "Service Delivery");
        assert_eq!(department_for_role("SRE"), "Service Assurance");
        assert_eq!(department_for_role("Infrastructure Engineer"), "IT");
        assert_eq!(department_for_role("Senior Developer"), "Development");
        assert_eq!(department_for_role("Cloud Engineer"), "Platform Engineering");
        assert_eq!(department_for_role("HR Partner"), "HR");
        assert_eq!(department_for_role("Compliance Officer"), "Legal");
        assert_eq!(department_for_role("Chef"), UNKNOWN_DEPARTMENT);
    }

    #[test]
    fn department_match_is_ordered() {
        // "product" outranks "it" even though both substrings appear
        assert_eq!(department_for_role("IT Product Owner"), "Product Management");
        // "dev" outranks "platform", so DevOps lands in Development
        assert_eq!(department_for_role("DevOps Engineer"), "Development");
    }
}
