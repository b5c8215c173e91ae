/// Text preparation for read-aloud narration.

/// Strip "Page N:" / "Page N" markers (pages 1 to 5), collapse runs of
/// whitespace, and make sure each run of `.` `!` `?` is followed by a
/// space so a speech engine pauses there.
pub fn clean_for_narration(text: &str) -> String {
    let mut stripped = text.to_string();
    for page in 1..=5 {
        stripped = stripped.replace(&format!("Page {page}:"), "");
        stripped = stripped.replace(&format!("Page {page}"), "");
    }

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::with_capacity(collapsed.len() + 8);
    let mut chars = collapsed.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if matches!(c, '.' | '!' | '?') {
            if let Some(next) = chars.peek() {
                if !next.is_whitespace() && !matches!(next, '.' | '!' | '?') {
                    out.push(' ');
                }
            }
        }
    }

    out.trim().to_string()
}
