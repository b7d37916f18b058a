/// Pulls the outermost JSON object out of a chat reply.
///
/// Models often wrap JSON in a fenced block or add a sentence around it; this
/// returns the slice from the first `{` to the last `}`.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}
