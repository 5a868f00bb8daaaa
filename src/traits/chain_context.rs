// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

/// Extension trait for wrapping foreign errors into [`crate::ChainedError`].
///
/// This trait is implemented for the [`std::result::Result`] type, to provide functionality for
/// converting the received error into a [`crate::ChainedError`] link, by capturing the error
/// value as the cause of the new link.
///
/// The [`Err`] value can be any [`std::error::Error`] type, including a [`crate::ChainedError`]
/// itself, in which case the chain simply grows by one link.
pub trait ChainContext<T, S>
where
    S: std::error::Error + Send + Sync + 'static,
{
    /// Maps a `Result<T, S>` to `Result<T, ChainedError>`.
    ///
    /// The [`Ok`] variant is left untouched.
    ///
    /// The [`Err`] value is wrapped as the cause of a new [`crate::ChainedError`] link whose
    /// friendly message is built by `f`.  The message is lazily evaluated.
    fn chain_err<M, F>(self, f: F) -> crate::Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;

    /// Same as [`chain_err`][Self::chain_err], but additionally applies the given
    /// [`WrapOption`][crate::WrapOption] values to the new link.
    fn chain_err_with<M, F>(self, f: F, options: Vec<crate::WrapOption>) -> crate::Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, S> ChainContext<T, S> for std::result::Result<T, S>
where
    S: std::error::Error + Send + Sync + 'static,
{
    fn chain_err<M, F>(self, f: F) -> crate::Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|source| crate::wrap(Some(Box::new(source)), f(), []))
    }

    fn chain_err_with<M, F>(self, f: F, options: Vec<crate::WrapOption>) -> crate::Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|source| crate::wrap(Some(Box::new(source)), f(), options))
    }
}

#[cfg(test)]
mod tests {
    use super::ChainContext as _;
    use crate::with_contextual;

    #[derive(Debug)]
    struct ParseFailure;

    impl std::fmt::Display for ParseFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "parse failure")
        }
    }

    impl std::error::Error for ParseFailure {}

    fn non_failing_function() -> std::result::Result<(), ParseFailure> {
        Ok(())
    }

    fn failing_function() -> std::result::Result<(), ParseFailure> {
        Err(ParseFailure)
    }

    #[test]
    fn test_chain_err() {
        assert!(non_failing_function()
            .chain_err(|| "could not parse")
            .is_ok());

        let error = failing_function()
            .chain_err(|| "could not parse")
            .unwrap_err();

        assert_eq!(error.to_string(), "could not parse: parse failure");
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_chain_err_with() {
        assert!(non_failing_function()
            .chain_err_with(|| "could not parse", vec![with_contextual("input", "abc")])
            .is_ok());

        let error = failing_function()
            .chain_err_with(|| "could not parse", vec![with_contextual("input", "abc")])
            .unwrap_err();

        assert_eq!(error.to_string(), "could not parse: parse failure");
        assert_eq!(
            error.contextual("input").and_then(|value| value.as_str()),
            Some("abc")
        );
    }
}
