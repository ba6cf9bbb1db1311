//! `tracing` helpers shared by the builder.

/// Target for every event this crate emits.
pub const TARGET: &str = "influxql.query";

pub(crate) fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Shorten `template` for logging, appending `...` when cut.
pub(crate) fn display_template(template: &str, max_len: Option<usize>) -> String {
    match max_len {
        Some(max) if template.len() > max => format!("{}...", truncate_bytes(template, max)),
        _ => template.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_bytes("héllo", 2), "h");
        assert_eq!(truncate_bytes("hello", 10), "hello");
    }

    #[test]
    fn display_template_marks_cuts() {
        assert_eq!(display_template("select * from m ;", Some(6)), "select...");
        assert_eq!(display_template("select * from m ;", None), "select * from m ;");
        assert_eq!(display_template("short", Some(200)), "short");
    }
}
