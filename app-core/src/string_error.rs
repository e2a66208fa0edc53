//! Most of the workspace reports failures as plain `String`s, which are shown
//! to the user or written to the log. This extension trait turns foreign
//! errors into such strings while attaching some context.

use std::fmt::Display;

pub trait ErrorStringExt<T> {
    /// Replace the error with `"{context}: {error}"`.
    fn err_to_string(self, context: &str) -> Result<T, String>;
}

impl<T, E: Display> ErrorStringExt<T> for Result<T, E> {
    fn err_to_string(self, context: &str) -> Result<T, String> {
        self.map_err(|err| format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_err_to_string_prefixes_context() {
        let res: Result<u8, _> = "300".parse::<u8>();
        let msg = res.err_to_string("could not read byte").unwrap_err();
        assert!(msg.starts_with("could not read byte: "));
        assert!(msg.contains("too large"));
    }

    #[test]
    fn test_err_to_string_passes_ok_through() {
        let res: Result<u8, std::num::ParseIntError> = "42".parse::<u8>();
        assert_eq!(res.err_to_string("unused"), Ok(42));
    }
}
