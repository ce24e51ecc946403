//! A ready-made [`KeyEvents`] sink that records the callback sequence.

use serde::Serialize;

use crate::parser::{KeyEvents, WildcardKind};

/// One recorded callback, with owned copies of the reported spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum Event {
    Package(String),
    ArrayDimension(String),
    FullyQualifiedName(String),
    TopLevelType,
    SecondaryType(String),
    MemberType(String),
    LocalType(String),
    NonGenericType,
    ParameterizedType {
        name: Option<String>,
        is_raw: bool,
    },
    RawType,
    Type,
    TypeParameter(String),
    Field(String),
    Method {
        selector: String,
        signature: String,
    },
    ParameterizedMethod,
    LocalVar(String),
    Scope(u32),
    TypeVariable(String),
    Modifiers(String),
    Wildcard(WildcardKind),
    Capture,
    Malformed,
}

/// Records every callback in source order. Child parsers record into their
/// own `Recorder`, which is spliced back in place by `consume_parser`, so a
/// full parse yields one flat, deterministic sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl KeyEvents for Recorder {
    fn fork(&self) -> Self {
        Recorder::default()
    }

    fn consume_parser(&mut self, child: Self) {
        self.events.extend(child.events);
    }

    fn consume_package(&mut self, name: &str) {
        self.events.push(Event::Package(name.to_string()));
    }

    fn consume_array_dimension(&mut self, brackets: &str) {
        self.events.push(Event::ArrayDimension(brackets.to_string()));
    }

    fn consume_fully_qualified_name(&mut self, name: &str) {
        self.events
            .push(Event::FullyQualifiedName(name.to_string()));
    }

    fn consume_top_level_type(&mut self) {
        self.events.push(Event::TopLevelType);
    }

    fn consume_secondary_type(&mut self, name: &str) {
        self.events.push(Event::SecondaryType(name.to_string()));
    }

    fn consume_member_type(&mut self, name: &str) {
        self.events.push(Event::MemberType(name.to_string()));
    }

    fn consume_local_type(&mut self, raw: &str) {
        self.events.push(Event::LocalType(raw.to_string()));
    }

    fn consume_non_generic_type(&mut self) {
        self.events.push(Event::NonGenericType);
    }

    fn consume_parameterized_type(&mut self, name: Option<&str>, is_raw: bool) {
        self.events.push(Event::ParameterizedType {
            name: name.map(str::to_string),
            is_raw,
        });
    }

    fn consume_raw_type(&mut self) {
        self.events.push(Event::RawType);
    }

    fn consume_type(&mut self) {
        self.events.push(Event::Type);
    }

    fn consume_type_parameter(&mut self, name: &str) {
        self.events.push(Event::TypeParameter(name.to_string()));
    }

    fn consume_field(&mut self, name: &str) {
        self.events.push(Event::Field(name.to_string()));
    }

    fn consume_method(&mut self, selector: &str, signature: &str) {
        self.events.push(Event::Method {
            selector: selector.to_string(),
            signature: signature.to_string(),
        });
    }

    fn consume_parameterized_method(&mut self) {
        self.events.push(Event::ParameterizedMethod);
    }

    fn consume_local_var(&mut self, name: &str) {
        self.events.push(Event::LocalVar(name.to_string()));
    }

    fn consume_scope(&mut self, index: u32) {
        self.events.push(Event::Scope(index));
    }

    fn consume_type_variable(&mut self, name: &str) {
        self.events.push(Event::TypeVariable(name.to_string()));
    }

    fn consume_modifiers(&mut self, flags: &str) {
        self.events.push(Event::Modifiers(flags.to_string()));
    }

    fn consume_wildcard(&mut self, kind: WildcardKind) {
        self.events.push(Event::Wildcard(kind));
    }

    fn consume_capture(&mut self) {
        self.events.push(Event::Capture);
    }

    fn malformed_key(&mut self) {
        self.events.push(Event::Malformed);
    }
}
