//! Secret redaction for text written to the node-activity log.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// `--token <value>` as passed on a command line.
static TOKEN_FLAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)(--token\s+)(\S+)").expect("valid regex")
});

/// `token=<value>` as it appears in URLs and agent log lines.
static TOKEN_ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)(token=)([^\s&]+)").expect("valid regex")
});

pub const REDACTED: &str = "<redacted>";

/// Replace token values with `<redacted>`, keeping the flag or key.
#[must_use]
pub fn redact_secrets(input: &str) -> Cow<'_, str> {
    if input.trim().is_empty() {
        return Cow::Borrowed(input);
    }
    let replacement = format!("${{1}}{REDACTED}");
    match TOKEN_FLAG_RE.replace_all(input, replacement.as_str()) {
        Cow::Borrowed(s) => TOKEN_ASSIGN_RE.replace_all(s, replacement.as_str()),
        Cow::Owned(s) => Cow::Owned(
            TOKEN_ASSIGN_RE
                .replace_all(&s, replacement.as_str())
                .into_owned(),
        ),
    }
}
