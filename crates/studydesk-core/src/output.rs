#![forbid(unsafe_code)]

//! Output log streams of the execution panel.

/// Which engine stream a log line came from. Doubles as the CSS class of
/// the rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl LogStream {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Split a chunk of engine output into log lines.
///
/// Engines write in arbitrary chunks; every non-empty `\n`-separated segment
/// becomes its own line and empty segments (including the trailing one after
/// a final newline) are dropped.
pub fn split_lines(chunk: &str) -> impl Iterator<Item = &str> {
    chunk.split('\n').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_newline_is_suppressed() {
        assert_eq!(split_lines("a\nb\n").collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        assert_eq!(split_lines("\n\nx\n\n").collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn carriage_returns_are_kept() {
        assert_eq!(split_lines("a\r\nb").collect::<Vec<_>>(), vec!["a\r", "b"]);
    }

    #[test]
    fn css_classes() {
        assert_eq!(LogStream::Stdout.css_class(), "stdout");
        assert_eq!(LogStream::Stderr.css_class(), "stderr");
    }
}
