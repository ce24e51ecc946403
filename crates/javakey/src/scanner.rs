//! Pull-based tokenizer for binding keys.
//!
//! The scanner walks a single immutable key string with a forward-only byte
//! cursor and classifies one token per [`Scanner::next_token`] call. Every
//! structural character in the key grammar is ASCII, so token spans always
//! fall on `char` boundaries and can be sliced out of the key directly.

/// Classification of the token most recently produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Sentinel state before the first token of a key.
    Start,
    /// A bare dotted package name (only possible for a whole key).
    Package,
    /// A type name, type-variable name or one-character base type.
    Type,
    /// A field selector.
    Field,
    /// A method or constructor selector (empty for constructors).
    Method,
    /// A run of `[` array-dimension markers.
    Array,
    /// A local-variable name or numeric scope index.
    LocalVar,
    /// The decimal digits of a modifier-flag set.
    Flags,
    /// One of the wildcard markers `*`, `+`, `-`.
    Wildcard,
    /// The capture marker `!`.
    Capture,
    /// End of the key, or a token that terminates a production.
    End,
}

/// Letters that encode a primitive, `void` or the null type on their own.
fn is_base_type(b: u8) -> bool {
    matches!(
        b,
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'N' | b'S' | b'V' | b'Z'
    )
}

#[derive(Debug)]
pub struct Scanner<'k> {
    source: &'k str,
    /// Cursor; always on an ASCII boundary of `source`.
    index: usize,
    /// Start of the last token's span.
    start: usize,
    /// End (exclusive) of the last token's span.
    end: usize,
    /// Kind of the last token; `Start` until the first call.
    kind: TokenKind,
}

impl<'k> Scanner<'k> {
    pub fn new(source: &'k str) -> Self {
        Scanner {
            source,
            index: 0,
            start: 0,
            end: 0,
            kind: TokenKind::Start,
        }
    }

    /// Consume characters from the cursor and classify the next token.
    ///
    /// Separator characters at a token boundary (`;`, `$`, `~`, `.`, `%`,
    /// `:`, `>`, `<`, `#`) are skipped silently. Characters that close an
    /// in-progress name span (`$`, `~`, `<`, `(`, `#`, `^`) are left
    /// unconsumed so the lookahead predicates can still observe them; a
    /// closing `;` is consumed since nothing downstream needs it.
    pub fn next_token(&mut self) -> TokenKind {
        let bytes = self.source.as_bytes();
        let len = bytes.len();
        let entry = self.index;
        // Start of the in-progress name span, once one is open.
        let mut span: Option<usize> = None;

        loop {
            if self.index == len {
                return self.finish_at_end(span);
            }
            let b = bytes[self.index];
            match b {
                // A base-type letter is a whole token, but only at the exact
                // position this call started at: after any separator has been
                // skipped the letter is the first character of a name (e.g.
                // the `S` of `$State`).
                _ if is_base_type(b) && span.is_none() && self.index == entry => {
                    self.start = self.index;
                    self.index += 1;
                    self.end = self.index;
                    self.kind = TokenKind::Type;
                    return self.kind;
                }
                b'L' | b'T' if span.is_none() => {
                    // Opens a name span; the marker itself is not part of it.
                    self.index += 1;
                    span = Some(self.index);
                }
                b'*' | b'+' | b'-' if span.is_none() => {
                    self.start = self.index;
                    self.index += 1;
                    self.end = self.index;
                    self.kind = TokenKind::Wildcard;
                    return self.kind;
                }
                b'!' if span.is_none() => {
                    self.start = self.index;
                    self.index += 1;
                    self.end = self.index;
                    self.kind = TokenKind::Capture;
                    return self.kind;
                }
                b'[' if span.is_none() => {
                    self.start = self.index;
                    while self.index < len && bytes[self.index] == b'[' {
                        self.index += 1;
                    }
                    self.end = self.index;
                    self.kind = TokenKind::Array;
                    return self.kind;
                }
                b';' => match span {
                    Some(s) => {
                        self.start = s;
                        self.end = self.index;
                        self.index += 1;
                        self.kind = TokenKind::Type;
                        return self.kind;
                    }
                    None => self.index += 1,
                },
                b'$' | b'~' => match span {
                    Some(s) => {
                        self.start = s;
                        self.end = self.index;
                        self.kind = TokenKind::Type;
                        return self.kind;
                    }
                    None => self.index += 1,
                },
                b'<' => match span {
                    Some(s) => {
                        self.start = s;
                        self.end = self.index;
                        // A selector reached over `.` is a method unless the
                        // `.` itself follows `>` (member of a parameterized
                        // enclosing type).
                        let after_dot = s >= 1 && bytes[s - 1] == b'.';
                        let after_args = s >= 2 && bytes[s - 2] == b'>';
                        self.kind = if after_dot && !after_args {
                            TokenKind::Method
                        } else {
                            TokenKind::Type
                        };
                        return self.kind;
                    }
                    None => self.index += 1,
                },
                b'(' => {
                    // Always closes the selector, which is empty for
                    // constructors. Not consumed: the signature skip needs
                    // to balance it.
                    self.start = span.unwrap_or(self.index);
                    self.end = self.index;
                    self.kind = TokenKind::Method;
                    return self.kind;
                }
                b')' => {
                    self.start = span.unwrap_or(self.index);
                    self.end = self.index;
                    self.index += 1;
                    self.kind = TokenKind::End;
                    return self.kind;
                }
                b'#' => match span {
                    Some(s) => {
                        self.start = s;
                        self.end = self.index;
                        self.kind = TokenKind::LocalVar;
                        return self.kind;
                    }
                    None => self.index += 1,
                },
                b'^' => match span {
                    Some(s) => {
                        self.start = s;
                        self.end = self.index;
                        // Relabel based on what was being scanned: the only
                        // backtracking-like behavior in the grammar.
                        self.kind = match self.kind {
                            TokenKind::Method | TokenKind::LocalVar => TokenKind::LocalVar,
                            _ if s >= 1 && bytes[s - 1] == b'.' => TokenKind::Field,
                            _ => TokenKind::Type,
                        };
                        return self.kind;
                    }
                    None => {
                        self.index += 1;
                        self.start = self.index;
                        while self.index < len && bytes[self.index].is_ascii_digit() {
                            self.index += 1;
                        }
                        self.end = self.index;
                        self.kind = TokenKind::Flags;
                        return self.kind;
                    }
                },
                b'.' | b'%' | b':' | b'>' if span.is_none() => self.index += 1,
                _ => {
                    if span.is_none() {
                        span = Some(self.index);
                    }
                    self.index += 1;
                }
            }
        }
    }

    /// End-of-buffer classification, driven by the previous token kind.
    fn finish_at_end(&mut self, span: Option<usize>) -> TokenKind {
        let bytes = self.source.as_bytes();
        let s = span.unwrap_or(self.index);
        self.start = s;
        self.end = self.index;
        self.kind = match self.kind {
            TokenKind::Start => TokenKind::Package,
            TokenKind::Method | TokenKind::LocalVar => TokenKind::LocalVar,
            TokenKind::Type if span.is_some() && s >= 1 && bytes[s - 1] == b'.' => TokenKind::Field,
            _ => TokenKind::End,
        };
        self.kind
    }

    /// The span of the last token produced by [`Scanner::next_token`].
    pub fn token_text(&self) -> &'k str {
        &self.source[self.start..self.end]
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn slice(&self, from: usize, to: usize) -> &'k str {
        &self.source[from..to]
    }

    pub fn at_eof(&self) -> bool {
        self.index >= self.source.len()
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.index).copied()
    }

    /// `$`, or a `.` that follows `>` (member of a parameterized type).
    pub fn at_member_type(&self) -> bool {
        match self.peek() {
            Some(b'$') => true,
            Some(b'.') => self.index >= 1 && self.source.as_bytes()[self.index - 1] == b'>',
            _ => false,
        }
    }

    pub fn at_field_or_method(&self) -> bool {
        self.peek() == Some(b'.')
    }

    pub fn at_local_variable(&self) -> bool {
        self.peek() == Some(b'#')
    }

    /// `<` for types, `%` for parameterized method invocations.
    pub fn at_parameters_start(&self) -> bool {
        matches!(self.peek(), Some(b'<') | Some(b'%'))
    }

    pub fn at_parameters_end(&self) -> bool {
        self.peek() == Some(b'>')
    }

    /// A `>` immediately after the list opener marks a raw type.
    pub fn at_raw_type_end(&self) -> bool {
        self.peek() == Some(b'>')
    }

    pub fn at_secondary_type(&self) -> bool {
        self.peek() == Some(b'~')
    }

    /// First character after a list opener that marks a declaration list of
    /// type parameters rather than a type-argument list.
    pub fn at_type_parameter(&self) -> bool {
        self.peek() == Some(b'T')
    }

    pub fn at_flags(&self) -> bool {
        self.peek() == Some(b'^')
    }

    pub fn at_type_variable(&self) -> bool {
        self.peek() == Some(b':')
    }

    pub fn at_wildcard(&self) -> bool {
        matches!(self.peek(), Some(b'*') | Some(b'+') | Some(b'-'))
    }

    pub fn at_capture(&self) -> bool {
        self.peek() == Some(b'!')
    }

    /// Skip one or more consecutive parameter-list openers (`<`, `%`).
    pub fn skip_parameters_start(&mut self) {
        let bytes = self.source.as_bytes();
        while self.index < bytes.len() && matches!(bytes[self.index], b'<' | b'%') {
            self.index += 1;
        }
    }

    /// Skip through the next `>`, inclusive.
    pub fn skip_parameters_end(&mut self) {
        let bytes = self.source.as_bytes();
        while self.index < bytes.len() && bytes[self.index] != b'>' {
            self.index += 1;
        }
        if self.index < bytes.len() {
            self.index += 1;
        }
    }

    /// Consume the `;` that trails a `>`-closed type production, if present.
    pub fn skip_type_end(&mut self) {
        if self.peek() == Some(b';') {
            self.index += 1;
        }
    }

    /// Skip an opaque method signature: everything from the current cursor
    /// (normally a `<` or `(`) up to the first unbalanced `#`, `%`, `^` or
    /// top-level `:`, tracking `<`/`(` against `>`/`)` depth. Returns the
    /// skipped span.
    pub fn skip_method_signature(&mut self) -> &'k str {
        let bytes = self.source.as_bytes();
        let len = bytes.len();
        let start = self.index;
        let mut depth = 0i32;
        while self.index < len {
            match bytes[self.index] {
                b'#' | b'%' | b'^' | b':' if depth == 0 => break,
                b'<' | b'(' => depth += 1,
                b'>' | b')' => depth -= 1,
                _ => {}
            }
            self.index += 1;
        }
        &self.source[start..self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(key: &str) -> Vec<(TokenKind, String)> {
        let mut scanner = Scanner::new(key);
        let mut out = Vec::new();
        loop {
            let kind = scanner.next_token();
            out.push((kind, scanner.token_text().to_string()));
            if kind == TokenKind::End || scanner.at_eof() {
                break;
            }
        }
        out
    }

    #[test]
    fn type_name_closed_by_semicolon() {
        let mut scanner = Scanner::new("Ljava.lang.Object;");
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "java.lang.Object");
        assert!(scanner.at_eof());
    }

    #[test]
    fn bare_package_scans_as_package() {
        assert_eq!(tokens("p"), vec![(TokenKind::Package, "p".to_string())]);
        assert_eq!(
            tokens("java.util"),
            vec![(TokenKind::Package, "java.util".to_string())]
        );
    }

    #[test]
    fn base_types_are_one_character_tokens() {
        assert_eq!(tokens("I"), vec![(TokenKind::Type, "I".to_string())]);
        let mut scanner = Scanner::new("[[J");
        assert_eq!(scanner.next_token(), TokenKind::Array);
        assert_eq!(scanner.token_text(), "[[");
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "J");
    }

    #[test]
    fn member_name_starting_with_base_letter_is_not_a_base_type() {
        let mut scanner = Scanner::new("Ljava.lang.Thread$State;");
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "java.lang.Thread");
        assert!(scanner.at_member_type());
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "State");
    }

    #[test]
    fn selector_closed_by_paren_is_a_method() {
        let mut scanner = Scanner::new("Lp.X;.foo()V");
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert!(scanner.at_field_or_method());
        assert_eq!(scanner.next_token(), TokenKind::Method);
        assert_eq!(scanner.token_text(), "foo");
        assert_eq!(scanner.skip_method_signature(), "()V");
    }

    #[test]
    fn constructor_selector_is_empty() {
        let mut scanner = Scanner::new("Lp.X;.()V");
        scanner.next_token();
        assert_eq!(scanner.next_token(), TokenKind::Method);
        assert_eq!(scanner.token_text(), "");
    }

    #[test]
    fn generic_selector_is_closed_by_angle_bracket() {
        let mut scanner = Scanner::new("Lp.X;.foo<T:Ljava.lang.Object;>()V");
        scanner.next_token();
        assert_eq!(scanner.next_token(), TokenKind::Method);
        assert_eq!(scanner.token_text(), "foo");
        assert_eq!(scanner.skip_method_signature(), "<T:Ljava.lang.Object;>()V");
    }

    #[test]
    fn member_after_parameterized_enclosing_type_is_a_type() {
        let mut scanner = Scanner::new("Ljava.util.Map<TK;TV;>.Entry<TK;TV;>;");
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "java.util.Map");
        scanner.skip_parameters_start();
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "K");
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "V");
        scanner.skip_parameters_end();
        scanner.skip_type_end();
        assert!(scanner.at_member_type());
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "Entry");
    }

    #[test]
    fn trailing_name_after_method_is_a_local_variable() {
        let mut scanner = Scanner::new("Lp.X;.foo()V#i");
        scanner.next_token();
        scanner.next_token();
        scanner.skip_method_signature();
        assert!(scanner.at_local_variable());
        assert_eq!(scanner.next_token(), TokenKind::LocalVar);
        assert_eq!(scanner.token_text(), "i");
    }

    #[test]
    fn flags_relabel_a_pending_span() {
        // `^` after a method-side span turns it into a local variable.
        let mut scanner = Scanner::new("Lp.X;.foo()V#i^1");
        scanner.next_token();
        scanner.next_token();
        scanner.skip_method_signature();
        assert_eq!(scanner.next_token(), TokenKind::LocalVar);
        assert_eq!(scanner.token_text(), "i");
        assert!(scanner.at_flags());
        assert_eq!(scanner.next_token(), TokenKind::Flags);
        assert_eq!(scanner.token_text(), "1");

        // `^` after a `.`-led span turns it into a field.
        let mut scanner = Scanner::new("Lp.X;.count^2");
        scanner.next_token();
        assert_eq!(scanner.next_token(), TokenKind::Field);
        assert_eq!(scanner.token_text(), "count");
        assert_eq!(scanner.next_token(), TokenKind::Flags);
        assert_eq!(scanner.token_text(), "2");
    }

    #[test]
    fn field_at_end_of_buffer() {
        let mut scanner = Scanner::new("Lp.X;.serialVersionUID");
        scanner.next_token();
        assert_eq!(scanner.next_token(), TokenKind::Field);
        assert_eq!(scanner.token_text(), "serialVersionUID");
    }

    #[test]
    fn wildcard_and_capture_markers() {
        assert_eq!(tokens("*"), vec![(TokenKind::Wildcard, "*".to_string())]);
        let mut scanner = Scanner::new("!+Ljava.lang.Number;");
        assert_eq!(scanner.next_token(), TokenKind::Capture);
        assert_eq!(scanner.next_token(), TokenKind::Wildcard);
        assert_eq!(scanner.token_text(), "+");
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "java.lang.Number");
    }

    #[test]
    fn secondary_type_marker() {
        let mut scanner = Scanner::new("Lp.X~Y;");
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "p.X");
        assert!(scanner.at_secondary_type());
        assert_eq!(scanner.next_token(), TokenKind::Type);
        assert_eq!(scanner.token_text(), "Y");
    }

    #[test]
    fn empty_flags_span_is_reported_empty() {
        let mut scanner = Scanner::new("^");
        assert_eq!(scanner.next_token(), TokenKind::Flags);
        assert_eq!(scanner.token_text(), "");
    }

    #[test]
    fn signature_skip_balances_nested_delimiters() {
        let mut scanner = Scanner::new("(Ljava.util.List<TT;>;)V%<Ljava.lang.String;>");
        assert_eq!(
            scanner.skip_method_signature(),
            "(Ljava.util.List<TT;>;)V"
        );
        assert!(scanner.at_parameters_start());
    }
}
