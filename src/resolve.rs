use serde_json::Value;

/// Candidate key paths for the agent name, probed in order. The proxy's
/// response shape is not under our control, so several historical layouts
/// are accepted.
pub const NAME_KEY_PATHS: [&str; 6] = [
    "data.as_earned_AgentName",
    "as_earned_AgentName",
    "data.agentName",
    "agentName",
    "data.name",
    "name",
];

/// Name-attribute substrings that identify a destination field, most
/// specific first.
pub const DEST_NAME_PATTERNS: [&str; 7] = [
    "agentname",
    "agent_name",
    "as_earned_agentname",
    "as_earned_agent_name",
    "name",
    "fullname",
    "full_name",
];

/// Walk a dot-separated path into a JSON value.
pub fn nested_value<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// Extract the agent name from response data by probing `NAME_KEY_PATHS`.
/// The first non-empty string wins; `None` is a valid outcome.
pub fn agent_name(data: &Value) -> Option<String> {
    NAME_KEY_PATHS.iter().find_map(|path| {
        nested_value(data, path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Pick the destination field from a list of field names in document order.
/// Patterns are checked in precedence order; within one pattern, the first
/// field in document order whose name contains it (case-insensitive) wins.
pub fn field_by_name_pattern<S: AsRef<str>>(names: &[S], patterns: &[&str]) -> Option<usize> {
    patterns.iter().find_map(|pattern| {
        let pattern = pattern.to_lowercase();
        names
            .iter()
            .position(|name| name.as_ref().to_lowercase().contains(&pattern))
    })
}

/// All fields whose name contains any pattern, in document order. Used when
/// clearing, which wipes every candidate rather than just the populated one.
pub fn fields_matching<S: AsRef<str>>(names: &[S], patterns: &[&str]) -> Vec<usize> {
    names
        .iter()
        .enumerate()
        .filter(|(_, name)| {
            let lower = name.as_ref().to_lowercase();
            patterns.iter().any(|p| lower.contains(&p.to_lowercase()))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_value() {
        let value = json!({"data": {"agentName": "Jane Doe"}});
        assert_eq!(
            nested_value(&value, "data.agentName"),
            Some(&json!("Jane Doe"))
        );
        assert_eq!(nested_value(&value, "data.missing"), None);
        assert_eq!(nested_value(&value, "data"), Some(&json!({"agentName": "Jane Doe"})));
    }

    #[test]
    fn test_agent_name_path_precedence() {
        let data = json!({
            "name": "Fallback",
            "as_earned_AgentName": "Jane Doe",
        });
        assert_eq!(agent_name(&data), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_agent_name_nested_path() {
        let data = json!({"data": {"as_earned_AgentName": "Jane Doe"}});
        assert_eq!(agent_name(&data), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_agent_name_skips_empty_values() {
        let data = json!({"as_earned_AgentName": "", "name": "Jane Doe"});
        assert_eq!(agent_name(&data), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_agent_name_absent() {
        assert_eq!(agent_name(&json!({})), None);
        assert_eq!(agent_name(&json!({"unrelated": 42})), None);
    }

    #[test]
    fn test_pattern_precedence_over_document_order() {
        // customer_fullname comes first in document order but only matches
        // the lower-precedence "name"/"fullname" patterns.
        let names = ["customer_fullname", "agent_name"];
        let patterns = ["agentname", "agent_name", "name", "fullname"];
        assert_eq!(field_by_name_pattern(&names, &patterns), Some(1));
    }

    #[test]
    fn test_document_order_breaks_ties_within_pattern() {
        let names = ["first_name", "last_name"];
        assert_eq!(field_by_name_pattern(&names, &["name"]), Some(0));
    }

    #[test]
    fn test_field_match_is_case_insensitive() {
        let names = ["AS_EARNED_AgentName"];
        assert_eq!(field_by_name_pattern(&names, &["agentname"]), Some(0));
    }

    #[test]
    fn test_no_field_matches() {
        let names = ["email", "phone"];
        assert_eq!(field_by_name_pattern(&names, &DEST_NAME_PATTERNS), None);
    }

    #[test]
    fn test_fields_matching_collects_all() {
        let names = ["agent_name", "email", "customer_fullname"];
        assert_eq!(fields_matching(&names, &DEST_NAME_PATTERNS), vec![0, 2]);
    }
}
