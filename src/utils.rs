use std::collections::BTreeSet;

/// Make a trimmed copy of the provided `String`.
pub fn take_if_not_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Render a set of names as `{'a', 'b'}`. The set is ordered, so the output is deterministic.
pub fn format_name_set(names: &BTreeSet<String>) -> String {
    let quoted = names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>();
    format!("{{{}}}", quoted.join(", "))
}

/// Check that `value` is a non-empty word made of alphanumeric characters and underscores.
pub fn is_word(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_dropped() {
        assert_eq!(take_if_not_blank("   "), None);
        assert_eq!(take_if_not_blank(" a b "), Some("a b".to_string()));
    }

    #[test]
    fn name_sets_are_sorted() {
        let names = BTreeSet::from(["sin".to_string(), "cos".to_string()]);
        assert_eq!(format_name_set(&names), "{'cos', 'sin'}");
        assert_eq!(format_name_set(&BTreeSet::new()), "{}");
    }

    #[test]
    fn words() {
        assert!(is_word("field_name1"));
        assert!(!is_word("field name"));
        assert!(!is_word(""));
    }
}
