//! Single-pass lexer for syntax coloring of code cell sources.
//!
//! The lexer classifies, it never rejects: every byte of the input ends up
//! in exactly one token, so concatenating token texts reproduces the input.

use std::fmt;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    String,
    Comment,
    Number,
    Operator,
    FunctionName,
    Variable,
    Builtin,
    Decorator,
    ClassName,
    /// Whitespace and unclassified characters.
    Default,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::String => "string",
            Self::Comment => "comment",
            Self::Number => "number",
            Self::Operator => "operator",
            Self::FunctionName => "function-name",
            Self::Variable => "variable",
            Self::Builtin => "builtin",
            Self::Decorator => "decorator",
            Self::ClassName => "class-name",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified slice of the source.
///
/// `start` and `end` are byte offsets into the tokenized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    /// Whitespace-only default token.
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Default && self.text.chars().all(char::is_whitespace)
    }
}

const KEYWORDS: [&str; 33] = [
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not",
    "or", "pass", "raise", "return", "try", "while", "with", "yield", "True", "False", "None",
];

const BUILTINS: [&str; 68] = [
    "abs", "all", "any", "ascii", "bin", "bool", "bytearray", "bytes", "callable", "chr",
    "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod", "enumerate", "eval",
    "exec", "filter", "float", "format", "frozenset", "getattr", "globals", "hasattr", "hash",
    "help", "hex", "id", "input", "int", "isinstance", "issubclass", "iter", "len", "list",
    "locals", "map", "max", "memoryview", "min", "next", "object", "oct", "open", "ord", "pow",
    "print", "property", "range", "repr", "reversed", "round", "set", "setattr", "slice",
    "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars", "zip",
    "__import__",
];

const TWO_CHAR_OPERATORS: [&[u8; 2]; 14] = [
    b"==", b"!=", b"<=", b">=", b"//", b"**", b"<<", b">>", b"&&", b"||", b"+=", b"-=", b"*=",
    b"/=",
];

fn is_operator_char(b: u8) -> bool {
    matches!(
        b,
        b'+' | b'-'
            | b'*'
            | b'/'
            | b'%'
            | b'='
            | b'<'
            | b'>'
            | b'!'
            | b'&'
            | b'|'
            | b'^'
            | b'~'
            | b'('
            | b')'
            | b'['
            | b']'
            | b'{'
            | b'}'
            | b','
            | b'.'
            | b':'
            | b';'
    )
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_number_continue(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')
}

/// Tokenize `source` into classified tokens.
///
/// Runs in a single left-to-right pass and is linear in the input length.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}

/// Iterator over the tokens of a source string.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    fn byte_at(&self, index: usize) -> Option<u8> {
        self.bytes().get(index).copied()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.source.get(index..).and_then(|rest| rest.chars().next())
    }

    /// Advance past bytes matching `pred`, starting at `from`.
    fn scan_bytes(&self, from: usize, pred: impl Fn(u8) -> bool) -> usize {
        let rest = &self.bytes()[from..];
        from + rest.iter().take_while(|&&b| pred(b)).count()
    }

    fn scan_whitespace(&self, from: usize) -> usize {
        let rest = &self.source[from..];
        let len: usize = rest
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        from + len
    }

    fn scan_comment(&self, from: usize) -> usize {
        match self.source[from..].find('\n') {
            Some(offset) => from + offset,
            None => self.source.len(),
        }
    }

    fn scan_string(&self, from: usize, quote: u8) -> usize {
        let bytes = self.bytes();
        let triple = [quote; 3];
        if bytes[from..].starts_with(&triple) {
            return match find_subslice(&bytes[from + 3..], &triple) {
                Some(offset) => from + 3 + offset + 3,
                None => bytes.len(),
            };
        }

        let mut i = from + 1;
        while i < bytes.len() {
            match bytes[i] {
                b if b == quote => return i + 1,
                // The escaped character is consumed with the backslash.
                b'\\' => {
                    i += 1;
                    if let Some(escaped) = self.char_at(i) {
                        i += escaped.len_utf8();
                    }
                }
                _ => i += 1,
            }
        }
        bytes.len()
    }

    fn scan_operator(&self, from: usize) -> usize {
        let pair = self.bytes().get(from..from + 2);
        match pair {
            Some(pair) if TWO_CHAR_OPERATORS.iter().any(|op| op.as_slice() == pair) => from + 2,
            _ => from + 1,
        }
    }

    fn classify_identifier(&self, word: &str, end: usize) -> TokenKind {
        if KEYWORDS.contains(&word) {
            TokenKind::Keyword
        } else if BUILTINS.contains(&word) {
            TokenKind::Builtin
        } else if self.byte_at(self.scan_whitespace(end)) == Some(b'(') {
            TokenKind::FunctionName
        } else if word.starts_with(|c: char| c.is_ascii_uppercase()) {
            TokenKind::ClassName
        } else {
            TokenKind::Variable
        }
    }

    fn next_token(&self, start: usize) -> (TokenKind, usize) {
        let Some(c) = self.char_at(start) else {
            return (TokenKind::Default, start);
        };

        if c.is_whitespace() {
            return (TokenKind::Default, self.scan_whitespace(start));
        }

        let b = self.bytes()[start];
        match b {
            b'#' => (TokenKind::Comment, self.scan_comment(start)),
            b'"' | b'\'' => (TokenKind::String, self.scan_string(start, b)),
            b'0'..=b'9' => (TokenKind::Number, self.scan_bytes(start, is_number_continue)),
            b'.' if self.byte_at(start + 1).is_some_and(|n| n.is_ascii_digit()) => {
                (TokenKind::Number, self.scan_bytes(start, is_number_continue))
            }
            _ if is_operator_char(b) => (TokenKind::Operator, self.scan_operator(start)),
            b'@' => {
                let end = self.scan_bytes(start + 1, |b| is_ident_continue(b) || b == b'.');
                (TokenKind::Decorator, end)
            }
            _ if is_ident_start(b) => {
                let end = self.scan_bytes(start, is_ident_continue);
                let kind = self.classify_identifier(&self.source[start..end], end);
                (kind, end)
            }
            _ => (TokenKind::Default, start + c.len_utf8()),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        if start >= self.source.len() {
            return None;
        }
        let (kind, end) = self.next_token(start);
        self.pos = end;
        Some(Token {
            kind,
            text: &self.source[start..end],
            start,
            end,
        })
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
