use crate::engine::errors::TypeParseError;
use crate::engine::types::ValueType;

/// Extension type names accepted as opaque columns.
pub const OPAQUE_TYPE_NAMES: &[&str] = &["json", "uuid", "ipaddress"];

const MAX_DECIMAL_PRECISION: u32 = 38;
const MAX_TIME_PRECISION: u32 = 12;
const MAX_TIMESTAMP_PRECISION: u32 = 6;
const MAX_TIMESTAMP_TZ_PRECISION: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Number(u32),
    LParen,
    RParen,
    Comma,
}

fn tokenize(input: &str) -> Result<Vec<Token>, TypeParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            c if c.is_ascii_digit() => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    end = i + d.len_utf8();
                    chars.next();
                }
                let number = input[start..end]
                    .parse::<u32>()
                    .map_err(|_| TypeParseError::Malformed(input.to_string()))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if !(d.is_ascii_alphanumeric() || d == '_') {
                        break;
                    }
                    end = i + d.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Ident(input[start..end].to_ascii_lowercase()));
            }
            _ => return Err(TypeParseError::Malformed(input.to_string())),
        }
    }
    Ok(tokens)
}

struct SignatureParser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> SignatureParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn malformed(&self) -> TypeParseError {
        TypeParseError::Malformed(self.input.to_string())
    }

    fn expect(&mut self, expected: Token) -> Result<(), TypeParseError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            _ => Err(self.malformed()),
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<(), TypeParseError> {
        match self.next() {
            Some(Token::Ident(ident)) if ident == word => Ok(()),
            _ => Err(self.malformed()),
        }
    }

    fn peek_word(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(ident)) if ident == word)
    }

    fn number_params(&mut self) -> Result<Vec<u32>, TypeParseError> {
        if self.peek() != Some(&Token::LParen) {
            return Ok(Vec::new());
        }
        self.next();
        let mut params = Vec::new();
        loop {
            match self.next() {
                Some(Token::Number(n)) => params.push(n),
                _ => return Err(self.malformed()),
            }
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(params),
                _ => return Err(self.malformed()),
            }
        }
    }

    /// Consumes a trailing `with time zone` / `without time zone`.
    fn with_time_zone(&mut self) -> Result<bool, TypeParseError> {
        let with_zone = if self.peek_word("with") {
            true
        } else if self.peek_word("without") {
            false
        } else {
            return Ok(false);
        };
        self.next();
        self.expect_word("time")?;
        self.expect_word("zone")?;
        Ok(with_zone)
    }

    fn parse_type(&mut self) -> Result<ValueType, TypeParseError> {
        let name = match self.next() {
            Some(Token::Ident(name)) => name,
            _ => return Err(self.malformed()),
        };

        let value_type = match name.as_str() {
            "array" => {
                self.expect(Token::LParen)?;
                let element = self.parse_type()?;
                self.expect(Token::RParen)?;
                ValueType::array(element)
            }
            "map" => {
                self.expect(Token::LParen)?;
                let key = self.parse_type()?;
                self.expect(Token::Comma)?;
                let value = self.parse_type()?;
                self.expect(Token::RParen)?;
                ValueType::map(key, value)
            }
            "interval" => {
                let (from, to) = match (self.next(), self.next(), self.next()) {
                    (Some(Token::Ident(from)), Some(Token::Ident(kw)), Some(Token::Ident(to)))
                        if kw == "to" =>
                    {
                        (from, to)
                    }
                    _ => return Err(self.malformed()),
                };
                match (from.as_str(), to.as_str()) {
                    ("year", "month") => ValueType::IntervalYearMonth,
                    ("day", "second") => ValueType::IntervalDayTime,
                    _ => return Err(TypeParseError::UnknownType(format!("interval {from} to {to}"))),
                }
            }
            _ => {
                let params = self.number_params()?;
                self.scalar(&name, &params)?
            }
        };
        Ok(value_type)
    }

    fn scalar(&mut self, name: &str, params: &[u32]) -> Result<ValueType, TypeParseError> {
        let invalid = |param: String| TypeParseError::InvalidParameter {
            name: name.to_string(),
            param,
        };
        let no_params = |value_type: ValueType| {
            if params.is_empty() {
                Ok(value_type)
            } else {
                Err(invalid(format!("{params:?}")))
            }
        };
        let single = |default: u32, max: u32| -> Result<u8, TypeParseError> {
            match params {
                [] => Ok(default as u8),
                [p] if *p <= max => Ok(*p as u8),
                _ => Err(invalid(format!("{params:?}"))),
            }
        };

        match name {
            "varchar" => match params {
                [] => Ok(ValueType::Varchar { length: None }),
                [n] => Ok(ValueType::Varchar { length: Some(*n) }),
                _ => Err(invalid(format!("{params:?}"))),
            },
            "char" => match params {
                [] => Ok(ValueType::Char { length: 1 }),
                [n] if *n > 0 => Ok(ValueType::Char { length: *n }),
                _ => Err(invalid(format!("{params:?}"))),
            },
            "boolean" => no_params(ValueType::Boolean),
            "tinyint" => no_params(ValueType::TinyInt),
            "smallint" => no_params(ValueType::SmallInt),
            "integer" | "int" => no_params(ValueType::Integer),
            "bigint" => no_params(ValueType::BigInt),
            "real" => no_params(ValueType::Real),
            "double" => no_params(ValueType::Double),
            "decimal" => {
                let (precision, scale) = match params {
                    [] => (MAX_DECIMAL_PRECISION, 0),
                    [p] => (*p, 0),
                    [p, s] => (*p, *s),
                    _ => return Err(invalid(format!("{params:?}"))),
                };
                if precision == 0 || precision > MAX_DECIMAL_PRECISION || scale > precision {
                    return Err(invalid(format!("{precision},{scale}")));
                }
                Ok(ValueType::Decimal {
                    precision: precision as u8,
                    scale: scale as u8,
                })
            }
            "date" => no_params(ValueType::Date),
            "time" => {
                let precision = single(3, MAX_TIME_PRECISION)?;
                if self.with_time_zone()? {
                    Ok(ValueType::TimeWithTimeZone { precision })
                } else {
                    Ok(ValueType::Time { precision })
                }
            }
            "timestamp" => {
                if self.with_time_zone_ahead() {
                    let precision = single(3, MAX_TIMESTAMP_TZ_PRECISION)?;
                    self.with_time_zone()?;
                    Ok(ValueType::TimestampWithTimeZone { precision })
                } else {
                    let precision = single(3, MAX_TIMESTAMP_PRECISION)?;
                    self.with_time_zone()?;
                    Ok(ValueType::Timestamp { precision })
                }
            }
            "varbinary" => no_params(ValueType::Varbinary),
            other if OPAQUE_TYPE_NAMES.contains(&other) => no_params(ValueType::Opaque {
                name: other.to_string(),
            }),
            other => Err(TypeParseError::UnknownType(other.to_string())),
        }
    }

    fn with_time_zone_ahead(&self) -> bool {
        self.peek_word("with")
    }
}

/// Parses a SQL type signature such as `map(varchar, array(bigint))`.
pub fn parse_type_signature(input: &str) -> Result<ValueType, TypeParseError> {
    let mut parser = SignatureParser {
        input,
        tokens: tokenize(input)?,
        pos: 0,
    };
    let value_type = parser.parse_type()?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.malformed());
    }
    Ok(value_type)
}
