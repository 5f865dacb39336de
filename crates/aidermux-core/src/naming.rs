//! Session buffer naming convention.
//!
//! Terminal buffers are named `term://{cwd}//{pid}:{cmd} {args…}`, so an
//! aider terminal looks like `term://~/repo//4242:aider --no-auto-commits`.

/// Binary name every aider terminal buffer ends its first token with.
pub const AIDER_BINARY: &str = "aider";

/// Name of the buffer created by the mock backend.
pub const MOCK_BUFFER_NAME: &str = "dummyaider";

/// True when the first space-delimited token of `name` ends with `aider`
/// or with one of the wrapper-script `suffixes`.
pub fn is_aider_buffer_name(name: &str, suffixes: &[String]) -> bool {
    let first = name.split(' ').next().unwrap_or_default();
    if first.is_empty() {
        return false;
    }
    first.ends_with(AIDER_BINARY)
        || suffixes
            .iter()
            .filter(|s| !s.is_empty())
            .any(|s| first.ends_with(s.as_str()))
}
