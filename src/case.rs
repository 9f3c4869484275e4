//! Display-name derivation for catalog entries: snake_case identifiers -> "Title Case" labels,
//! and mixed-case stored table names -> snake_case for the public API.

/// Convert an underscore-separated identifier to a title-cased label.
/// e.g. "user_name" -> "User Name", "ID" -> "Id"
pub fn title_case(s: &str) -> String {
    s.split('_').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Upper-case the first character, lower-case the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.extend(first.to_uppercase());
            for c in chars {
                out.extend(c.to_lowercase());
            }
            out
        }
        None => String::new(),
    }
}

/// Convert a single identifier from CamelCase/camelCase to snake_case.
/// e.g. "HmlId" -> "hml_id", "createdAt" -> "created_at". Already-snake input is returned unchanged.
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Explicit alias if set and non-empty, else the title-cased identifier.
pub fn display_alias(identifier: &str, alias: Option<&str>) -> String {
    match alias {
        Some(a) if !a.trim().is_empty() => a.to_string(),
        _ => title_case(identifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_splits_on_underscore() {
        assert_eq!(title_case("user_name"), "User Name");
        assert_eq!(title_case("name"), "Name");
        assert_eq!(title_case("mindcrowd_id"), "Mindcrowd Id");
    }

    #[test]
    fn title_case_lowercases_tail_of_each_word() {
        assert_eq!(title_case("ID"), "Id");
        assert_eq!(title_case("hml_ID"), "Hml Id");
    }

    #[test]
    fn snake_case_inserts_underscores_before_interior_capitals() {
        assert_eq!(to_snake_case("HmlId"), "hml_id");
        assert_eq!(to_snake_case("createdAt"), "created_at");
        assert_eq!(to_snake_case("Users"), "users");
    }

    #[test]
    fn snake_case_is_idempotent() {
        for s in ["HmlId", "hml_id", "APIKey", "plain", "MixedCase_With_Parts", ""] {
            let once = to_snake_case(s);
            assert_eq!(to_snake_case(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn display_alias_falls_back_on_missing_or_blank() {
        assert_eq!(display_alias("user_name", Some("Who")), "Who");
        assert_eq!(display_alias("user_name", None), "User Name");
        assert_eq!(display_alias("user_name", Some("  ")), "User Name");
        assert_eq!(display_alias("users", Some(" Users ")), " Users ");
    }
}
