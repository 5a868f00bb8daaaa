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

/// Trait making a [`crate::Result`] error variant loggable.
///
/// The whole chain, including the contextual data, is logged in its JSON
/// [`Debug`][std::fmt::Debug] form, with the caller location as the log target.
pub trait Loggable<T> {
    /// Logs the error at the error level if it occured.
    fn log_err(self) -> Self;

    /// Logs the error at the warn level if it occured.
    fn log_warn(self) -> Self;
}

impl<T> Loggable<T> for crate::Result<T> {
    #[track_caller]
    fn log_err(self) -> Self {
        let location = std::panic::Location::caller();

        self.map_err(|error| {
            log::error!(target: &location.to_string(), "{:?}", error);
            error
        })
    }

    #[track_caller]
    fn log_warn(self) -> Self {
        let location = std::panic::Location::caller();

        self.map_err(|error| {
            log::warn!(target: &location.to_string(), "{:?}", error);
            error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Loggable as _;

    fn non_failing_function() -> crate::Result<()> {
        Ok(())
    }

    fn failing_function() -> crate::Result<()> {
        Err(crate::wrap(None, "boom", []))
    }

    #[test]
    fn test_log_err() {
        assert!(non_failing_function().log_err().is_ok());
        assert!(failing_function().log_err().is_err());
    }

    #[test]
    fn test_log_warn() {
        assert!(non_failing_function().log_warn().is_ok());
        assert!(failing_function().log_warn().is_err());
    }
}
