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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate provides a small error-composition system used for building chains of errors.
//!
//! Every link of a chain is a [`ChainedError`] carrying an optional wrapped cause, a friendly
//! message that is safe to show outside the process boundary, and a bag of contextual key/value
//! diagnostic data which is kept out of the rendered message.
//!
//! # Details
//!
//! A [`ChainedError`] is built with [`wrap`], which takes the optional cause, the friendly
//! message, and an ordered list of [`WrapOption`] configuration values.  The only built-in option
//! is [`with_contextual`], which attaches one key/value pair of diagnostic data.  Once [`wrap`]
//! returns, the error is immutable.
//!
//! The cause may be any [`std::error::Error`] value, including another [`ChainedError`].  The
//! chain is exposed through [`std::error::Error::source`], so the standard one-step unwrap and
//! `downcast_ref` conventions keep working; this crate does not reimplement generic chain
//! walking.
//!
//! The [`Display`][std::fmt::Display] rendering joins the friendly messages of the whole chain
//! with `": "`, while [`Debug`][std::fmt::Debug] renders the chain as a JSON object including the
//! contextual data.  Equivalence between chains is tested with [`ChainedError::equivalent_to`],
//! which compares rendered message text rather than identity; see the method documentation for
//! the exact contract.
//!
//! For propagating foreign errors, the [`ChainContext`][traits::ChainContext] trait extends
//! [`std::result::Result`] with methods that wrap the error value into a [`ChainedError`].  The
//! [`Loggable`][traits::Loggable] trait extends [`Result`] with methods for logging the full
//! chain at the warn or error level.
//!
//! # Examples
//!
//! ```
//! use chainerr::traits::ChainContext;
//! use chainerr::{wrap, with_contextual};
//!
//! fn read_port(raw: &str) -> chainerr::Result<u16> {
//!     raw.parse()
//!         // Wrap a foreign error with a friendly message.
//!         .chain_err(|| "invalid port configuration")
//! }
//!
//! let error = read_port("not-a-number").unwrap_err();
//! assert!(error.to_string().starts_with("invalid port configuration: "));
//!
//! // Wrap further, attaching diagnostic data that stays out of the message.
//! let error = wrap(
//!     Some(Box::new(error)),
//!     "service failed to start",
//!     [with_contextual("service", "gateway")],
//! );
//! assert!(error.to_string().starts_with("service failed to start: invalid port configuration"));
//! assert_eq!(
//!     error.contextual("service").and_then(|value| value.as_str()),
//!     Some("gateway"),
//! );
//! ```

use serde_json::Value;

mod display;
pub mod traits;

/// One link of an error chain.
///
/// A [`ChainedError`] wraps an optional cause, carries a friendly message safe for external
/// consumption, and holds contextual key/value data which enriches the error for diagnostics but
/// is never part of the rendered message.
///
/// Instances are created with [`wrap`] and are immutable afterwards, which also makes shared
/// reads from multiple threads safe.  The library performs no cycle detection; the cause chain is
/// owned, so a cycle cannot be constructed in safe code, but chain-walking assumes the chain is
/// finite.
pub struct ChainedError {
    /// The wrapped cause, or [`None`] for a chain root.
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    /// The message safe to show outside the process boundary.
    friendly_message: String,
    /// Diagnostic key/value data, excluded from the rendered message.
    contextual: serde_json::Map<String, Value>,
}

/// The [`std::result::Result`] alias with [`ChainedError`] as the error type.
pub type Result<T> = std::result::Result<T, ChainedError>;

/// Builds a new [`ChainedError`] link.
///
/// `cause` is the wrapped error, or [`None`] when this link is the root of a chain.  It may be
/// another [`ChainedError`] or any foreign error type.  `friendly_message` is stored verbatim.
///
/// The contextual map is initialized empty before any of the `options` run, so an option such as
/// [`with_contextual`] always writes into an allocated map.  Options are applied in the given
/// order; a later option may overwrite what an earlier one wrote.
///
/// Construction cannot fail and has no side effects beyond allocating the new value.
pub fn wrap(
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    friendly_message: impl Into<String>,
    options: impl IntoIterator<Item = WrapOption>,
) -> ChainedError {
    let mut error = ChainedError {
        cause,
        friendly_message: friendly_message.into(),
        contextual: serde_json::Map::new(),
    };

    for option in options {
        (option.0)(&mut error);
    }

    error
}

/// A configuration value for [`wrap`].
///
/// Each option is given mutable access to the error being built, after the contextual map has
/// been initialized and before [`wrap`] returns.  The set of options is open-ended; currently
/// [`with_contextual`] is the only one provided.
pub struct WrapOption(Box<dyn FnOnce(&mut ChainedError)>);

/// A [`WrapOption`] that attaches one key/value pair of contextual data.
///
/// The value can be anything convertible to a [`serde_json::Value`]; use
/// [`serde_json::json!`] for structured values.
pub fn with_contextual(key: impl Into<String>, value: impl Into<Value>) -> WrapOption {
    let (key, value) = (key.into(), value.into());
    WrapOption(Box::new(move |error| {
        error.contextual.insert(key, value);
    }))
}

impl ChainedError {
    /// Returns the friendly message of this link only, without any of its causes.
    pub fn friendly_message(&self) -> &str {
        &self.friendly_message
    }

    /// Looks up contextual data attached to this link.
    ///
    /// The lookup is local; ancestor links are not searched.  Returns [`None`] when the key is
    /// absent.
    pub fn contextual(&self, key: &str) -> Option<&Value> {
        self.contextual.get(key)
    }

    /// Looks up contextual data attached to this link and deserializes it into `T`.
    ///
    /// Returns [`None`] when the key is absent, and `Some(Err(_))` when the key is present but
    /// the stored value does not deserialize into `T`.  The two cases are deliberately kept
    /// apart.
    pub fn contextual_as<T>(&self, key: &str) -> Option<serde_json::Result<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        self.contextual
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
    }

    /// Renders the full chain message of an optional error.
    ///
    /// An absent error renders as the empty string; otherwise this is the
    /// [`Display`][std::fmt::Display] text, i.e. the friendly messages of the whole chain joined
    /// with `": "`.
    pub fn render(this: Option<&Self>) -> String {
        this.map(ToString::to_string).unwrap_or_default()
    }

    /// Tests whether this chain contains an error equivalent to `target`.
    ///
    /// The comparison is **textual, not structural**: `target` must downcast to [`ChainedError`]
    /// (otherwise the result is `false`), and equivalence holds when the rendered message of this
    /// error, or of any ancestor in its cause chain, equals the rendered message of `target`.
    ///
    /// Two independently constructed chains with identical message text are therefore equivalent
    /// even though they are distinct objects.  This is a deliberate contract; callers who need to
    /// distinguish coincidentally identical chains must not rely on this method.
    pub fn equivalent_to(&self, target: &(dyn std::error::Error + 'static)) -> bool {
        let target = match target.downcast_ref::<ChainedError>() {
            Some(target) => target,
            None => return false,
        };

        let target_message = target.to_string();
        if self.to_string() == target_message {
            return true;
        }

        let mut source = std::error::Error::source(self);
        while let Some(error) = source {
            if error.to_string() == target_message {
                return true;
            }
            source = error.source();
        }

        false
    }

    /// [`equivalent_to`][Self::equivalent_to] lifted over absent errors.
    ///
    /// Two absent errors are equivalent to each other; an absent error is never equivalent to a
    /// present one, in either direction.
    pub fn equivalent(
        this: Option<&Self>,
        target: Option<&(dyn std::error::Error + 'static)>,
    ) -> bool {
        match (this, target) {
            (None, None) => true,
            (Some(this), Some(target)) => this.equivalent_to(target),
            _ => false,
        }
    }
}

impl std::error::Error for ChainedError {
    /// Returns the wrapped cause, or [`None`] for a chain root.
    ///
    /// This is the one-step unwrap required by the standard chain-walking conventions.
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        // "as _" here denotes casting to the output type, i.e. from
        // (Error + Send + Sync) to (Error + 'static).
        self.cause.as_ref().map(|cause| cause.as_ref() as _)
    }
}
