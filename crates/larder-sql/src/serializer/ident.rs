use std::fmt;

/// A double-quoted SQL identifier. Embedded quotes are doubled.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> fmt::Display for Ident<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for ch in self.0.as_ref().chars() {
            if ch == '"' {
                f.write_str("\"\"")?;
            } else {
                write!(f, "{ch}")?;
            }
        }
        f.write_str("\"")
    }
}
