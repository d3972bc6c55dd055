use once_cell::sync::Lazy;
use regex::Regex;

static SUGGESTIONS_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[SUGGESTIONS:\s*(\[.*\])\]").expect("suggestions marker pattern is valid")
});

/// A model reply split into display text and follow-up suggestions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedResponse {
    pub content: String,
    /// `None` when the reply carried no usable marker. Never `Some(vec![])`.
    pub suggestions: Option<Vec<String>>,
}

/// Extracts a `[SUGGESTIONS: [...]]` block from a raw model reply.
///
/// The first matching marker is removed and the remaining text trimmed. A
/// marker whose body is not a JSON array of strings is still removed, but no
/// suggestions are attached.
pub fn parse_response(raw: &str) -> ParsedResponse {
    let Some(captures) = SUGGESTIONS_MARKER.captures(raw) else {
        return ParsedResponse {
            content: raw.to_string(),
            suggestions: None,
        };
    };

    // Group 0 always exists on a match.
    let whole = captures.get(0).map(|m| m.range()).unwrap_or(0..0);
    let body = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    let mut content = String::with_capacity(raw.len());
    content.push_str(&raw[..whole.start]);
    content.push_str(&raw[whole.end..]);
    let content = content.trim().to_string();

    let suggestions = match serde_json::from_str::<Vec<String>>(body) {
        Ok(list) if !list.is_empty() => Some(list),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(error = %err, "failed to parse suggestions block");
            None
        }
    };

    ParsedResponse {
        content,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_trailing_suggestions() {
        let parsed = parse_response("Answer text.\n[SUGGESTIONS: [\"A?\", \"B?\"]]");
        assert_eq!(parsed.content, "Answer text.");
        assert_eq!(
            parsed.suggestions,
            Some(vec!["A?".to_string(), "B?".to_string()])
        );
    }

    #[test]
    fn test_no_marker_returns_raw_text() {
        let raw = "  Plain reply with [brackets] and spacing.  ";
        let parsed = parse_response(raw);
        assert_eq!(parsed.content, raw);
        assert_eq!(parsed.suggestions, None);
    }

    #[test]
    fn test_invalid_json_strips_marker() {
        let parsed = parse_response("Body\n[SUGGESTIONS: [A?]]");
        assert_eq!(parsed.content, "Body");
        assert_eq!(parsed.suggestions, None);
    }

    #[test]
    fn test_empty_array_is_absent() {
        let parsed = parse_response("Body [SUGGESTIONS: []]");
        assert_eq!(parsed.content, "Body");
        assert_eq!(parsed.suggestions, None);
    }

    #[test]
    fn test_count_is_not_capped() {
        let parsed = parse_response("x [SUGGESTIONS: [\"1\", \"2\", \"3\", \"4\", \"2\"]]");
        assert_eq!(
            parsed.suggestions,
            Some(
                ["1", "2", "3", "4", "2"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            )
        );
    }

    #[test]
    fn test_single_suggestion_passes_through() {
        let parsed = parse_response("x\n[SUGGESTIONS: [\"Only one?\"]]");
        assert_eq!(parsed.suggestions, Some(vec!["Only one?".to_string()]));
    }

    #[test]
    fn test_marker_in_middle_is_removed() {
        let parsed = parse_response("Intro [SUGGESTIONS:[\"Q?\"]] outro");
        assert_eq!(parsed.content, "Intro  outro");
        assert_eq!(parsed.suggestions, Some(vec!["Q?".to_string()]));
    }

    #[test]
    fn test_non_string_array_is_rejected() {
        let parsed = parse_response("Body [SUGGESTIONS: [1, 2]]");
        assert_eq!(parsed.content, "Body");
        assert_eq!(parsed.suggestions, None);
    }
}
