#![forbid(unsafe_code)]

//! Bridge between the engine's standard streams and the output log.
//!
//! After each load the shell registers a JS module named [`IO_MODULE`]
//! exposing `stdout(text)` and `stderr(text)` callbacks, then runs
//! [`redirect_script`] so Python's `sys.stdout` / `sys.stderr` forward every
//! write to them.

pub const IO_MODULE: &str = "_studydesk_io";

/// Python source replacing the engine's standard streams.
#[must_use]
pub fn redirect_script() -> String {
    format!(
        "import sys
from {IO_MODULE} import stdout as _studydesk_stdout, stderr as _studydesk_stderr

class _StudyDeskStream:
    def __init__(self, sink):
        self._sink = sink

    def write(self, s):
        if s:
            self._sink(str(s))
        return len(s)

    def flush(self):
        pass

sys.stdout = _StudyDeskStream(_studydesk_stdout)
sys.stderr = _StudyDeskStream(_studydesk_stderr)
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_imports_both_callbacks() {
        let script = redirect_script();
        assert!(script.contains("from _studydesk_io import stdout"));
        assert!(script.contains("sys.stdout = "));
        assert!(script.contains("sys.stderr = "));
    }

    #[test]
    fn script_has_no_tabs() {
        assert!(!redirect_script().contains('\t'));
    }
}
