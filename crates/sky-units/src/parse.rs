//! Parser for generic unit strings such as `km s-1 Mpc-1` or `erg / (s cm2)`.
//!
//! Grammar, loosely:
//!
//! ```text
//! unit    := [number [power]] [product ('/' product)*]
//! product := factor ((' ' | '*' | '.') factor)*
//! factor  := (name[int] | '(' unit ')') [('^' | '**') power]
//! power   := number | '(' number ['/' number] ')'
//! ```

use std::iter::Peekable;
use std::str::Chars;

use sky_core::errors::{ErrorInfo, SkyError};

use crate::power::Power;
use crate::registry::UnitRegistry;
use crate::unit::CompositeUnit;

fn parse_error(input: &str, message: impl Into<String>) -> SkyError {
    SkyError::Units(ErrorInfo::new("parse-error", message).with_context("input", input))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String, Option<i64>),
    Number(f64),
    Star,
    Pow,
    Slash,
    Open,
    Close,
}

fn read_digits(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, SkyError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::Pow);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '^' => {
                chars.next();
                tokens.push(Token::Pow);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '.' => {
                chars.next();
                if chars.peek().is_some_and(|next| next.is_ascii_digit()) {
                    let mut text = String::from("0.");
                    read_digits(&mut chars, &mut text);
                    tokens.push(Token::Number(parse_number(input, &text)?));
                } else {
                    tokens.push(Token::Star);
                }
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                let mut text = String::new();
                text.push(c);
                chars.next();
                read_digits(&mut chars, &mut text);
                if chars.peek() == Some(&'.') {
                    text.push('.');
                    chars.next();
                    read_digits(&mut chars, &mut text);
                }
                if matches!(chars.peek(), Some('e') | Some('E')) {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    let signed = matches!(lookahead.peek(), Some('-') | Some('+'));
                    if signed {
                        lookahead.next();
                    }
                    if lookahead.peek().is_some_and(|d| d.is_ascii_digit()) {
                        text.push('e');
                        chars.next();
                        if signed {
                            text.extend(chars.next());
                        }
                        read_digits(&mut chars, &mut text);
                    }
                }
                tokens.push(Token::Number(parse_number(input, &text)?));
            }
            c if c.is_alphabetic() || c == '_' || c == '%' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_alphabetic() || n == '_' || n == '%' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let mut lookahead = chars.clone();
                let sign = match lookahead.peek() {
                    Some('-') | Some('+') => lookahead.next(),
                    _ => None,
                };
                let trailing = if lookahead.peek().is_some_and(|d| d.is_ascii_digit()) {
                    chars = lookahead;
                    let mut digits = String::new();
                    digits.extend(sign);
                    read_digits(&mut chars, &mut digits);
                    Some(digits.parse::<i64>().map_err(|err| {
                        parse_error(input, format!("invalid power on '{name}': {err}"))
                    })?)
                } else {
                    None
                };
                tokens.push(Token::Name(name, trailing));
            }
            other => {
                return Err(parse_error(input, format!("unexpected character '{other}'")));
            }
        }
    }
    Ok(tokens)
}

fn parse_number(input: &str, text: &str) -> Result<f64, SkyError> {
    text.parse::<f64>()
        .map_err(|err| parse_error(input, format!("invalid number '{text}': {err}")))
}

// Whole floats outside the i64 range would saturate when cast.
fn exact_integer(input: &str, value: f64) -> Result<i64, SkyError> {
    if value.abs() < i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(SkyError::Units(
            ErrorInfo::new("power-overflow", format!("power term {value} is out of range"))
                .with_context("input", input),
        ))
    }
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    registry: &'a UnitRegistry,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect_close(&mut self) -> Result<(), SkyError> {
        match self.next() {
            Some(Token::Close) => Ok(()),
            _ => Err(parse_error(self.input, "expected ')'")),
        }
    }

    fn unit(&mut self) -> Result<CompositeUnit, SkyError> {
        let mut scale = 1.0;
        if let Some(Token::Number(value)) = self.peek().cloned() {
            self.next();
            scale = value;
            if self.peek() == Some(&Token::Pow) {
                self.next();
                scale = scale.powf(self.power()?.as_f64());
            }
        }
        let mut unit = match self.peek() {
            Some(Token::Name(..)) | Some(Token::Open) => self.product()?,
            _ => CompositeUnit::dimensionless(1.0),
        };
        while self.peek() == Some(&Token::Slash) {
            self.next();
            let denominator = self.product()?;
            unit = &unit / &denominator;
        }
        Ok(unit.with_scale(unit.scale() * scale))
    }

    fn product(&mut self) -> Result<CompositeUnit, SkyError> {
        let mut unit = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.next();
                    let rhs = self.factor()?;
                    unit = &unit * &rhs;
                }
                Some(Token::Name(..)) | Some(Token::Open) => {
                    let rhs = self.factor()?;
                    unit = &unit * &rhs;
                }
                _ => return Ok(unit),
            }
        }
    }

    fn factor(&mut self) -> Result<CompositeUnit, SkyError> {
        let mut unit = match self.next() {
            Some(Token::Name(name, trailing)) => {
                let base = self.registry.unit(&name)?;
                match trailing {
                    Some(power) => base.pow(Power::int(power)),
                    None => base,
                }
            }
            Some(Token::Open) => {
                let inner = self.unit()?;
                self.expect_close()?;
                inner
            }
            other => {
                return Err(parse_error(
                    self.input,
                    format!("expected a unit name, found {other:?}"),
                ))
            }
        };
        if self.peek() == Some(&Token::Pow) {
            self.next();
            unit = unit.pow(self.power()?);
        }
        Ok(unit)
    }

    fn power(&mut self) -> Result<Power, SkyError> {
        match self.next() {
            Some(Token::Number(value)) => Ok(Power::from_f64(value)),
            Some(Token::Open) => {
                let numerator = match self.next() {
                    Some(Token::Number(value)) => value,
                    _ => return Err(parse_error(self.input, "expected a number in power")),
                };
                let power = if self.peek() == Some(&Token::Slash) {
                    self.next();
                    let denominator = match self.next() {
                        Some(Token::Number(value)) => value,
                        _ => return Err(parse_error(self.input, "expected a denominator")),
                    };
                    if numerator.fract() != 0.0 || denominator.fract() != 0.0 {
                        return Err(parse_error(self.input, "fractional powers need integers"));
                    }
                    Power::ratio(
                        exact_integer(self.input, numerator)?,
                        exact_integer(self.input, denominator)?,
                    )
                    .map_err(|err| match err {
                        SkyError::Units(info) => SkyError::Units(info.with_context("input", self.input)),
                        other => other,
                    })?
                } else {
                    Power::from_f64(numerator)
                };
                self.expect_close()?;
                Ok(power)
            }
            _ => Err(parse_error(self.input, "expected a power")),
        }
    }
}

/// Parses a unit string against `registry`.
pub fn parse_unit_with(input: &str, registry: &UnitRegistry) -> Result<CompositeUnit, SkyError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(parse_error(input, "empty unit string"));
    }
    let mut parser = Parser {
        input,
        tokens,
        pos: 0,
        registry,
    };
    let unit = parser.unit()?;
    if let Some(token) = parser.peek() {
        return Err(parse_error(input, format!("unexpected trailing {token:?}")));
    }
    tracing::debug!(input, parsed = %unit, "parsed unit string");
    Ok(unit)
}

/// Parses a unit string against the built-in registry.
pub fn parse_unit(input: &str) -> Result<CompositeUnit, SkyError> {
    parse_unit_with(input, UnitRegistry::builtin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_digits_are_powers() {
        let unit = parse_unit("km s-1 Mpc-1").unwrap();
        assert_eq!(unit.to_string(), "km Mpc^-1 s^-1");
        assert_eq!(parse_unit("cm2").unwrap().to_string(), "cm^2");
    }

    #[test]
    fn division_binds_products() {
        let unit = parse_unit("erg / (s cm2)").unwrap();
        assert_eq!(unit.to_string(), "erg s^-1 cm^-2");
        let chained = parse_unit("erg / s / cm**2").unwrap();
        assert_eq!(chained, unit);
        let product_after_slash = parse_unit("erg / s cm2").unwrap();
        assert_eq!(product_after_slash, unit);
    }

    #[test]
    fn rational_and_scaled_units() {
        let unit = parse_unit("Hz^(1/2)").unwrap();
        assert_eq!(unit.powers(), vec![Power::ratio(1, 2).unwrap()]);
        let scaled = parse_unit("1e10 m").unwrap();
        assert_eq!(scaled.scale(), 1.0e10);
        let exponent = parse_unit("10**-3 Jy").unwrap();
        assert!((exponent.scale() - 1.0e-3).abs() < 1e-15);
        assert!(parse_unit("100").unwrap().is_dimensionless());
    }

    #[test]
    fn separators_are_interchangeable() {
        let a = parse_unit("kg.m2.s-2").unwrap();
        let b = parse_unit("kg*m**2*s**-2").unwrap();
        let c = parse_unit("kg m^2 s^-2").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert_eq!(parse_unit("").unwrap_err().code(), "parse-error");
        assert_eq!(parse_unit("m / ").unwrap_err().code(), "parse-error");
        assert_eq!(parse_unit("(m s").unwrap_err().code(), "parse-error");
        assert_eq!(parse_unit("m $").unwrap_err().code(), "parse-error");
        assert_eq!(parse_unit("parsec_furlong").unwrap_err().code(), "unknown-unit");
    }

    #[test]
    fn extreme_powers_are_handled_without_overflow() {
        let unit = parse_unit("m-9223372036854775808").unwrap();
        assert_eq!(unit.powers(), vec![Power::int(i64::MIN)]);
        assert!(parse_unit("m-9223372036854775809").is_err());

        let err = parse_unit("m^(1/-1e30)").unwrap_err();
        assert_eq!(err.code(), "power-overflow");
        assert_eq!(err.info().context.get("input").map(String::as_str), Some("m^(1/-1e30)"));
        assert_eq!(parse_unit("m^(1e30/2)").unwrap_err().code(), "power-overflow");
    }
}
