// Cross-cutting prompt fragments and template rendering.
// Feature prompts live alongside their module (see roster::prompts).

/// Instruction appended to prompts whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Replaces `{key}` placeholders in a single left-to-right pass.
///
/// Only keys listed in `values` are substituted. Any other brace (including literal JSON
/// in the template) is copied as-is, and substituted text is never re-scanned, so a value
/// containing `{other_key}` stays verbatim.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
