use std::borrow::Cow;

/// Replaces line feeds so a value fits on one log line
pub fn single_line(s: &str) -> Cow<str> {
    if s.contains(['\r', '\n']) {
        Cow::Owned(s.replace("\r\n", "↵").replace(['\r', '\n'], "↵"))
    } else {
        Cow::Borrowed(s)
    }
}
