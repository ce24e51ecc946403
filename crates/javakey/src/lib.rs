#![forbid(unsafe_code)]

//! Decoder for Java binding keys.
//!
//! A binding key is a single-line string naming the exact declaration of a
//! program element without a live symbol table: a package, a type (generic,
//! parameterized, raw, array, member, local, anonymous or secondary), a
//! field, a method or constructor, a type variable, a local variable, a
//! wildcard or a capture. This crate decodes such keys: a pull-based
//! [`Scanner`] classifies tokens, and [`parse`] drives the grammar,
//! reporting each recognized production to a [`KeyEvents`] sink.
//!
//! ```
//! use javakey::{parse, Event, Recorder};
//!
//! let parsed = parse("Ljava.lang.Object;", Recorder::default());
//! assert!(parsed.has_type_name);
//! assert_eq!(
//!     parsed.events.events,
//!     vec![
//!         Event::FullyQualifiedName("java.lang.Object".to_string()),
//!         Event::TopLevelType,
//!         Event::NonGenericType,
//!         Event::Type,
//!     ],
//! );
//! ```
//!
//! Decoding is tolerant by design: a truncated or corrupted key yields the
//! productions recognized so far plus one `malformed_key` callback, never a
//! panic or an error. Callers that want strict behavior use [`validate`].

mod parser;
mod record;
mod scanner;

pub use crate::parser::{parse, parse_head, KeyEvents, Parsed, WildcardKind, MAX_DEPTH};
pub use crate::record::{Event, Recorder};
pub use crate::scanner::{Scanner, TokenKind};

/// Error of the strict [`validate`] entry point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed binding key: {key}")]
pub struct MalformedKey {
    pub key: String,
}

/// Parse `key` with a throwaway sink and turn the tolerant malformed-key
/// condition into an error.
pub fn validate(key: &str) -> Result<(), MalformedKey> {
    struct Probe;

    impl KeyEvents for Probe {
        fn fork(&self) -> Self {
            Probe
        }
    }

    let parsed = parse(key, Probe);
    if parsed.malformed {
        Err(MalformedKey {
            key: key.to_string(),
        })
    } else {
        Ok(())
    }
}
