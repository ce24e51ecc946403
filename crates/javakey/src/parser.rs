//! Recursive-descent parser over the key scanner.
//!
//! The parser is a pure grammar-to-event translator: each recognized
//! production invokes one hook of [`KeyEvents`] with the raw text span of
//! that production, and the hooks decide what (if anything) to build. Nested
//! type arguments are parsed by child parsers that share the parent's
//! scanner cursor; the finished child sink is handed back through
//! [`KeyEvents::consume_parser`].

use crate::scanner::{Scanner, TokenKind};

/// Hard limit on nested productions (type-argument lists, wildcard bounds,
/// captures). Keys nesting deeper than this are diagnosed through
/// [`KeyEvents::malformed_key`] instead of overflowing the stack.
pub const MAX_DEPTH: u32 = 128;

/// The three wildcard forms a key can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum WildcardKind {
    Unbound,
    Extends,
    Super,
}

/// Builder hooks, one per grammar production.
///
/// Every hook has a no-op default so a consumer implements only what it
/// needs. `fork` is the one required method: it creates the sink for a
/// nested type-argument parse, whose finished value is delivered back via
/// [`KeyEvents::consume_parser`].
///
/// There is deliberately no error type anywhere on this surface. A key that
/// cannot be decoded fires [`KeyEvents::malformed_key`] exactly once and
/// stops; everything recognized up to that point has already been reported.
pub trait KeyEvents: Sized {
    /// Create the sink for a nested type-argument parse.
    fn fork(&self) -> Self;

    /// Receive the finished sink of a nested type-argument parse.
    fn consume_parser(&mut self, child: Self) {
        let _ = child;
    }

    /// A bare dotted package name; the whole key.
    fn consume_package(&mut self, name: &str) {
        let _ = name;
    }

    /// A run of `[` markers preceding the element type.
    fn consume_array_dimension(&mut self, brackets: &str) {
        let _ = brackets;
    }

    /// The fully-qualified name of the type the key resolves against.
    fn consume_fully_qualified_name(&mut self, name: &str) {
        let _ = name;
    }

    fn consume_top_level_type(&mut self) {}

    /// A type declared alongside, but not nested in, the top-level type.
    fn consume_secondary_type(&mut self, name: &str) {
        let _ = name;
    }

    fn consume_member_type(&mut self, name: &str) {
        let _ = name;
    }

    /// A local or anonymous type; `raw` is the whole key span up to and
    /// including the scope chain, markers and all.
    fn consume_local_type(&mut self, raw: &str) {
        let _ = raw;
    }

    fn consume_non_generic_type(&mut self) {}

    /// A parameterized type. `name` is `None` for the outermost production
    /// and the member-type name for chains like `X<A;>.Y<B;>`; `is_raw`
    /// marks a member used without its own type arguments.
    fn consume_parameterized_type(&mut self, name: Option<&str>, is_raw: bool) {
        let _ = (name, is_raw);
    }

    fn consume_raw_type(&mut self) {}

    /// The fully assembled type, after all of its constituent productions.
    fn consume_type(&mut self) {}

    /// One declared type parameter of a generic type.
    fn consume_type_parameter(&mut self, name: &str) {
        let _ = name;
    }

    fn consume_field(&mut self, name: &str) {
        let _ = name;
    }

    /// A method or constructor. `selector` is empty for constructors;
    /// `signature` is the delimiter-matched, otherwise opaque span from the
    /// selector to the end of the return type.
    fn consume_method(&mut self, selector: &str, signature: &str) {
        let _ = (selector, signature);
    }

    /// A generic method invocation with explicit type arguments; fires after
    /// the arguments were reported through child parsers.
    fn consume_parameterized_method(&mut self) {}

    fn consume_local_var(&mut self, name: &str) {
        let _ = name;
    }

    /// One step of scope descent through nested anonymous/local types.
    fn consume_scope(&mut self, index: u32) {
        let _ = index;
    }

    /// A type-variable reference site (on a type or a method).
    fn consume_type_variable(&mut self, name: &str) {
        let _ = name;
    }

    /// The decimal modifier-flag digits following a `^` marker.
    fn consume_modifiers(&mut self, flags: &str) {
        let _ = flags;
    }

    fn consume_wildcard(&mut self, kind: WildcardKind) {
        let _ = kind;
    }

    fn consume_capture(&mut self) {}

    /// The key cannot be decoded past the current position. Fires at most
    /// once per parse; no other hook fires after it.
    fn malformed_key(&mut self) {}
}

/// Outcome of a parse: the events sink handed back, plus the two flags a
/// caller needs to classify the key without interpreting events.
#[derive(Debug)]
pub struct Parsed<E> {
    pub events: E,
    /// False for bare-package keys and unbound wildcards.
    pub has_type_name: bool,
    pub malformed: bool,
}

/// Decode a whole key, reporting every production to `events`.
pub fn parse<E: KeyEvents>(key: &str, events: E) -> Parsed<E> {
    run(key, events, false)
}

/// Decode only the leading fully-qualified-name production (plus a secondary
/// type, if present) and stop. Used to classify the head of a key (e.g. to
/// tell a bare-package key from a type key) without committing to the rest;
/// callers that decide to continue re-parse in full.
pub fn parse_head<E: KeyEvents>(key: &str, events: E) -> Parsed<E> {
    run(key, events, true)
}

fn run<E: KeyEvents>(key: &str, events: E, head_only: bool) -> Parsed<E> {
    tracing::trace!(key, "parsing binding key");
    let mut scanner = Scanner::new(key);
    let mut parser = Parser {
        scanner: &mut scanner,
        events,
        key_start: 0,
        has_type_name: false,
        malformed: false,
        depth: 0,
    };
    parser.parse(head_only);
    Parsed {
        events: parser.events,
        has_type_name: parser.has_type_name,
        malformed: parser.malformed,
    }
}

struct Parser<'s, 'k, E> {
    scanner: &'s mut Scanner<'k>,
    events: E,
    /// Start of the current head production; local-type spans are cut from
    /// here to the scanner cursor.
    key_start: usize,
    has_type_name: bool,
    malformed: bool,
    depth: u32,
}

impl<'s, 'k, E: KeyEvents> Parser<'s, 'k, E> {
    fn parse(&mut self, head_only: bool) {
        self.parse_fully_qualified_name();
        if self.malformed {
            return;
        }
        self.parse_secondary_type();
        if self.malformed || head_only || !self.has_type_name {
            return;
        }
        self.events.consume_top_level_type();
        self.parse_inner_type();
        if self.malformed {
            return;
        }
        if self.scanner.at_parameters_start() {
            self.scanner.skip_parameters_start();
            if self.scanner.at_type_parameter() {
                self.parse_generic_type();
                if self.malformed {
                    return;
                }
                self.scanner.skip_parameters_end();
                self.scanner.skip_type_end();
                // Local types can be declared inside a generic type.
                self.parse_inner_type();
                if self.malformed {
                    return;
                }
            } else if self.scanner.at_raw_type_end() {
                self.scanner.skip_parameters_end();
                self.events.consume_raw_type();
                self.scanner.skip_type_end();
            } else {
                self.parse_parameterized_type(None, false);
                if self.malformed {
                    return;
                }
            }
        } else {
            self.events.consume_non_generic_type();
        }
        self.events.consume_type();
        self.parse_flags();
        if self.malformed {
            return;
        }
        if self.scanner.at_field_or_method() {
            self.parse_member();
        } else if self.scanner.at_type_variable() {
            self.parse_type_variable();
        }
    }

    /// Head production: wildcard/capture prefix, array-dimension prefix,
    /// then a fully-qualified type name or a bare package name.
    fn parse_fully_qualified_name(&mut self) {
        if self.depth >= MAX_DEPTH {
            self.report_malformed();
            return;
        }
        self.depth += 1;
        self.key_start = self.scanner.position();
        match self.scanner.next_token() {
            TokenKind::Capture => {
                self.events.consume_capture();
                self.parse_fully_qualified_name();
            }
            TokenKind::Wildcard => {
                let kind = match self.scanner.token_text() {
                    "+" => WildcardKind::Extends,
                    "-" => WildcardKind::Super,
                    _ => WildcardKind::Unbound,
                };
                self.events.consume_wildcard(kind);
                if kind != WildcardKind::Unbound {
                    self.parse_fully_qualified_name();
                }
            }
            TokenKind::Array => {
                self.events
                    .consume_array_dimension(self.scanner.token_text());
                match self.scanner.next_token() {
                    TokenKind::Type => self.consume_name(),
                    _ => self.report_malformed(),
                }
            }
            TokenKind::Type => self.consume_name(),
            TokenKind::Package => {
                let name = self.scanner.token_text();
                if name.is_empty() {
                    self.report_malformed();
                } else {
                    self.events.consume_package(name);
                }
            }
            _ => self.report_malformed(),
        }
        self.depth -= 1;
    }

    fn consume_name(&mut self) {
        let name = self.scanner.token_text();
        if name.is_empty() {
            self.report_malformed();
        } else {
            self.events.consume_fully_qualified_name(name);
            self.has_type_name = true;
        }
    }

    fn parse_secondary_type(&mut self) {
        if self.malformed || !self.scanner.at_secondary_type() {
            return;
        }
        match self.scanner.next_token() {
            TokenKind::Type => {
                let name = self.scanner.token_text();
                if name.is_empty() {
                    self.report_malformed();
                } else {
                    self.events.consume_secondary_type(name);
                }
            }
            _ => self.report_malformed(),
        }
    }

    /// Inner-type chain. A digit-led name marks a local/anonymous type: the
    /// rest of the chain is folded into one raw span cut from the start of
    /// the head production, scope markers included.
    fn parse_inner_type(&mut self) {
        while !self.malformed && self.scanner.at_member_type() {
            match self.scanner.next_token() {
                TokenKind::Type => {
                    let name = self.scanner.token_text();
                    if name.is_empty() {
                        self.report_malformed();
                        return;
                    }
                    if name.as_bytes()[0].is_ascii_digit() {
                        while self.scanner.at_member_type() {
                            if self.scanner.next_token() != TokenKind::Type {
                                break;
                            }
                        }
                        let raw = self.scanner.slice(self.key_start, self.scanner.position());
                        self.events.consume_local_type(raw);
                        return;
                    }
                    self.events.consume_member_type(name);
                }
                _ => {
                    self.report_malformed();
                    return;
                }
            }
        }
    }

    /// Declaration list of type parameters, `<T...;U...;>`.
    fn parse_generic_type(&mut self) {
        while !self.malformed && self.scanner.at_type_parameter() {
            match self.scanner.next_token() {
                TokenKind::Type => {
                    let name = self.scanner.token_text();
                    if name.is_empty() {
                        self.report_malformed();
                        return;
                    }
                    self.events.consume_type_parameter(name);
                }
                _ => {
                    self.report_malformed();
                    return;
                }
            }
        }
    }

    /// Type-argument list, plus the chain of member types that may follow a
    /// parameterized enclosing type (`X<A;>.Y<B;>.Z<>`), iteratively.
    fn parse_parameterized_type(&mut self, name: Option<&'k str>, is_raw: bool) {
        let mut name = name;
        let mut is_raw = is_raw;
        loop {
            if !is_raw {
                while !self.malformed
                    && !self.scanner.at_parameters_end()
                    && !self.scanner.at_eof()
                {
                    self.parse_type_argument();
                }
                if self.malformed {
                    return;
                }
            }
            self.scanner.skip_parameters_end();
            self.events.consume_parameterized_type(name, is_raw);
            self.scanner.skip_type_end();
            if !self.scanner.at_member_type() {
                return;
            }
            match self.scanner.next_token() {
                TokenKind::Type => {
                    let text = self.scanner.token_text();
                    if text.is_empty() {
                        self.report_malformed();
                        return;
                    }
                    name = Some(text);
                    if self.scanner.at_parameters_start() {
                        self.scanner.skip_parameters_start();
                        is_raw = self.scanner.at_raw_type_end();
                    } else {
                        // Member of a parameterized type used without its
                        // own argument list: there is no `>` to skip, so
                        // report it here and hand control back to the
                        // member-site step.
                        self.events.consume_parameterized_type(name, true);
                        return;
                    }
                }
                _ => {
                    self.report_malformed();
                    return;
                }
            }
        }
    }

    /// One type argument, recognized by a child parser over the shared
    /// scanner cursor. The child's sink is always delivered back; a child
    /// malformation stops the parent without re-firing the hook.
    fn parse_type_argument(&mut self) {
        if self.depth >= MAX_DEPTH {
            self.report_malformed();
            return;
        }
        let sink = self.events.fork();
        let key_start = self.scanner.position();
        let mut child = Parser {
            scanner: &mut *self.scanner,
            events: sink,
            key_start,
            has_type_name: false,
            malformed: false,
            depth: self.depth + 1,
        };
        child.parse(false);
        let child_malformed = child.malformed;
        let sink = child.events;
        self.events.consume_parser(sink);
        if child_malformed {
            self.malformed = true;
        }
    }

    fn parse_member(&mut self) {
        match self.scanner.next_token() {
            TokenKind::Field => {
                let name = self.scanner.token_text();
                if name.is_empty() {
                    self.report_malformed();
                    return;
                }
                self.events.consume_field(name);
                self.parse_flags();
            }
            TokenKind::Method => {
                let selector = self.scanner.token_text();
                let signature = self.scanner.skip_method_signature();
                self.events.consume_method(selector, signature);
                self.parse_flags();
                if self.malformed {
                    return;
                }
                if self.scanner.at_parameters_start() {
                    self.parse_parameterized_method();
                    if self.malformed {
                        return;
                    }
                }
                if self.scanner.at_local_variable() {
                    self.parse_local_variable();
                } else if self.scanner.at_type_variable() {
                    self.parse_type_variable();
                }
            }
            _ => self.report_malformed(),
        }
    }

    fn parse_parameterized_method(&mut self) {
        self.scanner.skip_parameters_start();
        while !self.malformed && !self.scanner.at_parameters_end() && !self.scanner.at_eof() {
            self.parse_type_argument();
        }
        if self.malformed {
            return;
        }
        self.scanner.skip_parameters_end();
        self.events.consume_parameterized_method();
    }

    /// Local-variable production: a digit-only name is a scope index and may
    /// chain through further `#` markers; anything else is the variable name.
    fn parse_local_variable(&mut self) {
        loop {
            match self.scanner.next_token() {
                TokenKind::LocalVar => {
                    let name = self.scanner.token_text();
                    if name.is_empty() {
                        self.report_malformed();
                        return;
                    }
                    if name.bytes().all(|b| b.is_ascii_digit()) {
                        match name.parse::<u32>() {
                            Ok(index) => self.events.consume_scope(index),
                            Err(_) => {
                                self.report_malformed();
                                return;
                            }
                        }
                        if self.scanner.at_local_variable() {
                            continue;
                        }
                        return;
                    }
                    self.events.consume_local_var(name);
                    self.parse_flags();
                    return;
                }
                _ => {
                    self.report_malformed();
                    return;
                }
            }
        }
    }

    fn parse_type_variable(&mut self) {
        match self.scanner.next_token() {
            TokenKind::Type => {
                let name = self.scanner.token_text();
                if name.is_empty() {
                    self.report_malformed();
                } else {
                    self.events.consume_type_variable(name);
                }
            }
            _ => self.report_malformed(),
        }
    }

    fn parse_flags(&mut self) {
        if self.malformed || !self.scanner.at_flags() {
            return;
        }
        match self.scanner.next_token() {
            TokenKind::Flags => {
                let digits = self.scanner.token_text();
                if digits.is_empty() {
                    self.report_malformed();
                } else {
                    self.events.consume_modifiers(digits);
                }
            }
            _ => self.report_malformed(),
        }
    }

    fn report_malformed(&mut self) {
        if self.malformed {
            return;
        }
        self.malformed = true;
        tracing::debug!(position = self.scanner.position(), "malformed binding key");
        self.events.malformed_key();
    }
}
