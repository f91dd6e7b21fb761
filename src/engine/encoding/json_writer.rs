use std::io::Write;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter};

use crate::engine::errors::{EncodeError, JsonGenerationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Root,
    Array,
    Object,
}

impl ScopeKind {
    fn name(self) -> &'static str {
        match self {
            ScopeKind::Root => "root",
            ScopeKind::Array => "array",
            ScopeKind::Object => "object",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    kind: ScopeKind,
    entries: usize,
    name_pending: bool,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            entries: 0,
            name_pending: false,
        }
    }
}

/// Streaming JSON generator. Tracks nesting so separators are placed
/// correctly and rejects structurally invalid call sequences.
pub struct JsonWriter<W: Write> {
    out: W,
    scopes: Vec<Scope>,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            scopes: vec![Scope::new(ScopeKind::Root)],
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Open (non-root) scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    fn top(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    fn before_value(&mut self) -> Result<(), EncodeError> {
        let scope = self.top();
        let separator = match scope.kind {
            ScopeKind::Object => {
                if !scope.name_pending {
                    return Err(JsonGenerationError::FieldNameExpected.into());
                }
                scope.name_pending = false;
                None
            }
            ScopeKind::Array => {
                scope.entries += 1;
                (scope.entries > 1).then_some(b",")
            }
            ScopeKind::Root => {
                scope.entries += 1;
                (scope.entries > 1).then_some(b" ")
            }
        };
        if let Some(separator) = separator {
            self.out.write_all(separator)?;
        }
        Ok(())
    }

    fn end_scope(&mut self, kind: ScopeKind, token: &[u8]) -> Result<(), EncodeError> {
        let scope = *self.top();
        if scope.kind != kind || scope.name_pending {
            return Err(JsonGenerationError::UnbalancedEnd {
                expected: scope.kind.name(),
                found: kind.name(),
            }
            .into());
        }
        self.scopes.pop();
        self.out.write_all(token)?;
        Ok(())
    }

    pub fn write_start_array(&mut self) -> Result<(), EncodeError> {
        self.before_value()?;
        self.scopes.push(Scope::new(ScopeKind::Array));
        self.out.write_all(b"[")?;
        Ok(())
    }

    pub fn write_end_array(&mut self) -> Result<(), EncodeError> {
        self.end_scope(ScopeKind::Array, b"]")
    }

    pub fn write_start_object(&mut self) -> Result<(), EncodeError> {
        self.before_value()?;
        self.scopes.push(Scope::new(ScopeKind::Object));
        self.out.write_all(b"{")?;
        Ok(())
    }

    pub fn write_end_object(&mut self) -> Result<(), EncodeError> {
        self.end_scope(ScopeKind::Object, b"}")
    }

    pub fn write_field_name(&mut self, name: &str) -> Result<(), EncodeError> {
        let scope = self.top();
        if scope.kind != ScopeKind::Object || scope.name_pending {
            return Err(JsonGenerationError::UnexpectedFieldName.into());
        }
        scope.entries += 1;
        scope.name_pending = true;
        let first = scope.entries == 1;
        if !first {
            self.out.write_all(b",")?;
        }
        self.write_quoted(name.as_bytes())?;
        self.out.write_all(b":")?;
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<(), EncodeError> {
        self.before_value()?;
        self.out.write_all(b"null")?;
        Ok(())
    }

    pub fn write_boolean(&mut self, value: bool) -> Result<(), EncodeError> {
        self.before_value()?;
        self.out
            .write_all(if value { b"true" as &[u8] } else { b"false" })?;
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<(), EncodeError> {
        self.write_utf8_string(value.as_bytes())
    }

    /// Writes already UTF-8 encoded bytes as a string value without
    /// validating or re-encoding them; only JSON escaping is applied.
    pub fn write_utf8_string(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.before_value()?;
        self.write_quoted(bytes)
    }

    pub fn write_integer<I: itoa::Integer>(&mut self, value: I) -> Result<(), EncodeError> {
        self.before_value()?;
        let mut buffer = itoa::Buffer::new();
        self.out.write_all(buffer.format(value).as_bytes())?;
        Ok(())
    }

    /// Shortest round-tripping form. Caller must handle non-finite values.
    pub fn write_float<F: ryu::Float>(&mut self, value: F) -> Result<(), EncodeError> {
        self.before_value()?;
        let mut buffer = ryu::Buffer::new();
        self.out.write_all(buffer.format_finite(value).as_bytes())?;
        Ok(())
    }

    pub fn write_decimal(&mut self, value: &Decimal) -> Result<(), EncodeError> {
        self.write_raw_number(&value.to_string())
    }

    /// Writes `text` verbatim as a number token.
    pub fn write_raw_number(&mut self, text: &str) -> Result<(), EncodeError> {
        self.before_value()?;
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Base64 with the standard alphabet and padding.
    pub fn write_binary(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.before_value()?;
        let encoded = BASE64_STANDARD.encode(bytes);
        self.out.write_all(b"\"")?;
        self.out.write_all(encoded.as_bytes())?;
        self.out.write_all(b"\"")?;
        Ok(())
    }

    /// Hands a value to serde for generic serialization.
    pub fn write_serialized<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.before_value()?;
        serde_json::to_writer(&mut self.out, value)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), EncodeError> {
        self.out.flush()?;
        Ok(())
    }

    /// Flushes and verifies every scope was closed.
    pub fn close(&mut self) -> Result<(), EncodeError> {
        if self.depth() > 0 {
            return Err(JsonGenerationError::UnclosedScope(self.depth()).into());
        }
        self.flush()
    }

    /// Copies unescaped runs as-is; escapes are produced by serde_json's
    /// formatter so the escape table matches the rest of the JSON stack.
    fn write_quoted(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        let mut formatter = CompactFormatter;
        formatter.begin_string(&mut self.out)?;
        let mut start = 0;
        for (idx, &byte) in bytes.iter().enumerate() {
            let Some(escape) = char_escape(byte) else {
                continue;
            };
            if start < idx {
                self.out.write_all(&bytes[start..idx])?;
            }
            formatter.write_char_escape(&mut self.out, escape)?;
            start = idx + 1;
        }
        if start < bytes.len() {
            self.out.write_all(&bytes[start..])?;
        }
        formatter.end_string(&mut self.out)?;
        Ok(())
    }
}

/// Escape for `byte`, or `None` when it can be copied verbatim. Bytes of
/// multi-byte UTF-8 sequences are always >= 0x80 and pass through.
fn char_escape(byte: u8) -> Option<CharEscape> {
    let escape = match byte {
        b'"' => CharEscape::Quote,
        b'\\' => CharEscape::ReverseSolidus,
        b'\n' => CharEscape::LineFeed,
        b'\r' => CharEscape::CarriageReturn,
        b'\t' => CharEscape::Tab,
        0x08 => CharEscape::Backspace,
        0x0C => CharEscape::FormFeed,
        0x00..=0x1F => CharEscape::AsciiControl(byte),
        _ => return None,
    };
    Some(escape)
}
