//! Prompt wording and reply parsing for the derived oracle operations.

/// Builds the prompt asking how relevant `content` is to `query`.
#[must_use]
pub fn relevance_prompt(content: &str, query: &str) -> String {
    format!(
        "How relevant is the following memory to this query? Memory: '{content}' \
         Query: '{query}' Respond with a relevance score from 0 to 1."
    )
}

/// Builds the prompt asking for a comma-separated list of actions.
#[must_use]
pub fn suggestion_prompt(context: &str) -> String {
    format!(
        "Given the context: '{context}', suggest 3-5 possible actions an AI agent could take. \
         Respond with a comma-separated list of actions."
    )
}

/// Reads the leading number of `reply` as a relevance in `[0, 1]`.
///
/// Leading whitespace is skipped and the longest prefix shaped like
/// `[+-]?digits[.digits]` (or `.digits`) is parsed; trailing text is ignored.
/// Values outside `[0, 1]` are clamped. Returns `None` when no number leads
/// the reply.
#[must_use]
pub fn parse_relevance(reply: &str) -> Option<f64> {
    let text = reply.trim_start();
    let bytes = text.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits + frac_digits == 0 {
        return None;
    }

    text[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(0.0, 1.0))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

/// Splits a comma-separated reply into trimmed, non-empty action names.
#[must_use]
pub fn parse_suggestions(reply: &str) -> Vec<String> {
    reply
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_owned)
        .collect()
}
