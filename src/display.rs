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

// Writes the friendly messages of the whole chain, joined with ": ".
//
// A chained link contributes only its own friendly message, since its ancestors follow in the
// walk anyway; a foreign link contributes its Display text once.
impl std::fmt::Display for crate::ChainedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.friendly_message)?;

        let mut source = std::error::Error::source(self);
        while let Some(error) = source {
            match error.downcast_ref::<crate::ChainedError>() {
                Some(chained) => write!(f, ": {}", chained.friendly_message)?,
                None => write!(f, ": {}", error)?,
            }
            source = error.source();
        }

        Ok(())
    }
}

// Goes through the whole error chain and writes all the links as a JSON object, including the
// contextual data which the Display rendering leaves out.
impl std::fmt::Debug for crate::ChainedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;

        // Write the friendly message
        let message_esc = json_escape(&self.friendly_message);
        write!(f, "\"message\":{}", message_esc)?;

        // Write the contextual data if present
        if !self.contextual.is_empty() {
            let contextual = serde_json::Value::Object(self.contextual.clone());
            write!(f, ",\"contextual\":{}", contextual)?;
        }

        // Write the cause of the error
        if let Some(cause) = &self.cause {
            write!(f, ",\"source\":")?;

            debug_error(cause.as_ref() as _, f)?;
        }

        write!(f, "}}")
    }
}

fn debug_error(
    error: &(dyn std::error::Error + 'static),
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    // A chained link knows how to write itself
    if let Some(chained) = error.downcast_ref::<crate::ChainedError>() {
        return write!(f, "{:?}", chained);
    }

    write!(f, "{{")?;

    // Write the error debug
    let error_esc = json_escape(&format!(r"{:?}", error));
    write!(f, "\"error\":{}", error_esc)?;

    // Write the source of the error
    if let Some(source) = error.source() {
        write!(f, ",\"source\":")?;

        debug_error(source, f)?;
    }

    write!(f, "}}")
}

fn json_escape(value: &str) -> String {
    serde_json::json!(value).to_string()
}

#[cfg(test)]
mod tests {
    use crate::{display::json_escape, with_contextual, wrap};

    #[derive(Debug)]
    enum ForeignError {
        WithSource(Box<dyn std::error::Error + Send + Sync>),
        NoSource,
    }

    impl std::fmt::Display for ForeignError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::WithSource(_) => write!(f, "WithSource"),
                Self::NoSource => write!(f, "NoSource"),
            }
        }
    }

    impl std::error::Error for ForeignError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                Self::WithSource(source) => Some(source.as_ref() as _),
                Self::NoSource => None,
            }
        }
    }

    #[test]
    fn test_json_escape() {
        assert_eq!(json_escape("Some string"), r#""Some string""#);
        assert_eq!(
            json_escape("String with \"quotes\""),
            r#""String with \"quotes\"""#
        );
        assert_eq!(
            json_escape("{\"key\":\"value\"}"),
            r#""{\"key\":\"value\"}""#
        );
    }

    #[test]
    fn test_display() {
        let error = wrap(None, "root failure", []);
        assert_eq!(error.to_string(), "root failure");

        let error = wrap(Some(Box::new(error)), "outer failure", []);
        assert_eq!(error.to_string(), "outer failure: root failure");

        // Contextual data stays out of the Display rendering.
        let error = wrap(None, "plain", [with_contextual("key", "value")]);
        assert_eq!(error.to_string(), "plain");
    }

    #[test]
    fn test_display_through_foreign() {
        let inner = wrap(None, "inner", []);
        let foreign = ForeignError::WithSource(Box::new(inner));
        let outer = wrap(Some(Box::new(foreign)), "outer", []);

        // The foreign link contributes its own text once, then the walk continues past it.
        assert_eq!(outer.to_string(), "outer: WithSource: inner");
    }

    #[test]
    fn test_debug() {
        let error = wrap(None, "root failure", []);
        assert_eq!(format!("{error:?}"), r#"{"message":"root failure"}"#);

        let inner = wrap(None, "inner", [with_contextual("k", "v")]);
        let error = wrap(Some(Box::new(inner)), "outer", []);
        assert_eq!(
            format!("{error:?}"),
            r#"{"message":"outer","source":{"message":"inner","contextual":{"k":"v"}}}"#
        );

        let error = wrap(Some(Box::new(ForeignError::NoSource)), "outer", []);
        assert_eq!(
            format!("{error:?}"),
            r#"{"message":"outer","source":{"error":"NoSource"}}"#
        );
    }

    #[test]
    fn test_debug_through_foreign() {
        let foreign = ForeignError::WithSource(Box::new(ForeignError::NoSource));
        let outer = wrap(Some(Box::new(foreign)), "outer", []);

        assert_eq!(
            format!("{outer:?}"),
            r#"{"message":"outer","source":{"error":"WithSource(NoSource)","source":{"error":"NoSource"}}}"#
        );
    }

    #[test]
    fn test_quotes() {
        // test quotes in the friendly message
        let error = wrap(None, "message with \"quotes\"", []);
        assert_eq!(
            format!("{error:?}"),
            r#"{"message":"message with \"quotes\""}"#
        );

        // test quotes in contextual values
        let error = wrap(None, "plain", [with_contextual("key", "va\"lue")]);
        assert_eq!(
            format!("{error:?}"),
            r#"{"message":"plain","contextual":{"key":"va\"lue"}}"#
        );
    }
}
