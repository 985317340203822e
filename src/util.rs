use std::time::SystemTime;

/// Strip one trailing `\n` or `\r\n`, leaving any other whitespace alone.
pub fn trim_line_terminator(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

/// Whole seconds from `start` to `end`, or 0 if the clock went backwards.
pub fn whole_secs_between(start: SystemTime, end: SystemTime) -> u64 {
    end.duration_since(start)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_trim_line_terminator() {
        assert_eq!(trim_line_terminator("abc\n"), "abc");
        assert_eq!(trim_line_terminator("abc\r\n"), "abc");
        assert_eq!(trim_line_terminator("abc"), "abc");
    }

    #[test]
    fn test_trim_only_one_terminator() {
        assert_eq!(trim_line_terminator("abc\n\n"), "abc\n");
        assert_eq!(trim_line_terminator("abc \n"), "abc ");
        assert_eq!(trim_line_terminator("\n"), "");
    }

    #[test]
    fn test_whole_secs_truncates() {
        let start = SystemTime::UNIX_EPOCH;
        let end = start + Duration::from_millis(2999);
        assert_eq!(whole_secs_between(start, end), 2);
    }

    #[test]
    fn test_whole_secs_floor_at_zero() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let end = SystemTime::UNIX_EPOCH;
        assert_eq!(whole_secs_between(start, end), 0);
    }
}
