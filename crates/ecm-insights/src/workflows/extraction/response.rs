/// Locates the JSON payload inside free-form model output.
///
/// Tried in order: a ```` ```json ```` fence, a plain fence, the first `[`, the first `{`.
/// A trailing fence left over after slicing is dropped.
pub(crate) fn json_payload(response: &str) -> &str {
    const JSON_FENCE: &str = "```json";
    const FENCE: &str = "```";

    let trimmed = response.trim();

    let mut payload = if let Some(start) = trimmed.find(JSON_FENCE) {
        let body = &trimmed[start + JSON_FENCE.len()..];
        match body.find(FENCE) {
            Some(end) => body[..end].trim(),
            None => body.trim(),
        }
    } else if let Some(start) = trimmed.find(FENCE) {
        let body = &trimmed[start + FENCE.len()..];
        match body.find(FENCE) {
            Some(end) => body[..end].trim(),
            None => trimmed,
        }
    } else if let Some(start) = trimmed.find('[') {
        trimmed[start..].trim()
    } else if let Some(start) = trimmed.find('{') {
        trimmed[start..].trim()
    } else {
        trimmed
    };

    if let Some(stripped) = payload.strip_suffix(FENCE) {
        payload = stripped.trim();
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_json_fence() {
        let response = "Here you go:\n```json\n[{\"a\": 1}]\n```\nLet me know!";
        assert_eq!(json_payload(response), "[{\"a\": 1}]");
    }

    #[test]
    fn unwraps_unterminated_json_fence() {
        assert_eq!(json_payload("```json\n[1, 2]"), "[1, 2]");
    }

    #[test]
    fn unwraps_plain_fence() {
        assert_eq!(json_payload("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn finds_bare_array_after_prose() {
        assert_eq!(
            json_payload("The measures are: [{\"ecm_name\": \"LED\"}]"),
            "[{\"ecm_name\": \"LED\"}]"
        );
    }

    #[test]
    fn finds_bare_object() {
        assert_eq!(json_payload("Result -> {\"x\": true}"), "{\"x\": true}");
    }

    #[test]
    fn passes_through_plain_json() {
        assert_eq!(json_payload("  [1]  "), "[1]");
    }
}
