//! Layout text parser
//!
//! Turns format-definition lines into directives and field definitions.
//!
//! ## Field Line
//! ```text
//! 3  ?name  [1..3]  ESN(12)  replacement("zenkaku")  "default"
//! │   │      │       │        │                       └─ literal -> default value
//! │   │      │       │        └─ converter with arguments
//! │   │      │       └─ data type with size
//! │   │      └─ array bounds: [n], [min..max], [min..*], [*]
//! │   └─ name, `?` marks it optional
//! └─ position
//! ```

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::convert::{ConverterArg, ConverterRegistry, LITERAL_CONVERTER};
use crate::error::{CodecError, Result};
use crate::schema::{ArrayBounds, FieldDefinition};
use crate::value::Decimal;

/// Directives, section name and field definitions read from a layout
#[derive(Debug, Default)]
pub(crate) struct ParsedLayout {
    pub directives: BTreeMap<String, String>,
    pub record_name: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

/// One lexical token of a layout line
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// Bare word, optionally followed by `( args )`
    Word { text: String, args: Option<Vec<ConverterArg>> },
    /// Quoted string
    Quoted(String),
    /// Contents of `[ ... ]`
    Bounds(String),
}

pub(crate) fn parse(text: &str, registry: &ConverterRegistry, padding: char) -> Result<ParsedLayout> {
    let mut layout = ParsedLayout::default();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let err = |msg: String| CodecError::Layout(format!("line {}: {}", line_no, msg));

        if line.starts_with('[') && line.ends_with(']') {
            if layout.record_name.is_some() {
                return Err(err("multiple record types are not supported".to_string()));
            }
            let name = line[1..line.len() - 1].trim();
            if name.is_empty() {
                return Err(err("empty record type name".to_string()));
            }
            layout.record_name = Some(name.to_string());
            continue;
        }

        if layout.record_name.is_none() {
            let (name, value) = parse_directive(line).map_err(err)?;
            layout.directives.insert(name, value);
            continue;
        }

        let tokens = tokenize(line).map_err(err)?;
        let field = parse_field(tokens, registry, padding).map_err(|e| match e {
            CodecError::Layout(msg) => err(msg),
            other => other,
        })?;
        layout.fields.push(field);
    }

    Ok(layout)
}

// =============================================================================
// Directives
// =============================================================================

fn parse_directive(line: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| format!("expected `name: value` directive, got '{}'", line))?;

    let name = name.trim();
    if name.is_empty() {
        return Err("directive name is empty".to_string());
    }

    let tokens = tokenize(value)?;
    let value = match tokens.as_slice() {
        [Token::Quoted(s)] => s.clone(),
        [Token::Word { text, args: None }] => text.clone(),
        _ => return Err(format!("invalid value for directive '{}'", name)),
    };

    Ok((name.to_string(), value))
}

// =============================================================================
// Field Lines
// =============================================================================

fn parse_field(tokens: Vec<Token>, registry: &ConverterRegistry, padding: char) -> Result<FieldDefinition> {
    let layout_err = |msg: String| CodecError::Layout(msg);
    let mut tokens = tokens.into_iter().peekable();

    let position = match tokens.next() {
        Some(Token::Word { text, args: None }) => text
            .parse::<usize>()
            .map_err(|_| layout_err(format!("invalid field position '{}'", text)))?,
        _ => return Err(layout_err("field line must start with a position".to_string())),
    };

    let (name, optional) = match tokens.next() {
        Some(Token::Word { text, args: None }) => {
            let optional = text.starts_with('?');
            (text.trim_start_matches('?').to_string(), optional)
        }
        _ => return Err(layout_err("missing field name".to_string())),
    };

    let bounds = match tokens.next_if(|t| matches!(t, Token::Bounds(_))) {
        Some(Token::Bounds(raw)) => {
            Some(parse_bounds(&raw).map_err(|m| layout_err(format!("{}: {}", name, m)))?)
        }
        _ => None,
    };

    let data_type = match tokens.next() {
        Some(Token::Word { text, args }) => {
            let size = match args.as_deref() {
                None => None,
                Some([ConverterArg::Number(n)]) => Some(
                    n.as_str()
                        .parse::<usize>()
                        .map_err(|_| layout_err(format!("{}: invalid size '{}'", name, n)))?,
                ),
                Some(_) => return Err(layout_err(format!("{}: data type takes one size argument", name))),
            };
            registry.data_type(&text, size, &name, padding)?
        }
        _ => return Err(layout_err(format!("{}: missing data type", name))),
    };

    let required = !optional && bounds.map_or(true, |b| b.min > 0);

    let mut builder = FieldDefinition::builder(name.as_str())
        .position(position)
        .required(required)
        .data_type(data_type);
    if let Some(bounds) = bounds {
        builder = builder.array_bounds(bounds);
    }

    for token in tokens {
        let converter = match token {
            Token::Quoted(s) => registry.converter(LITERAL_CONVERTER, &[ConverterArg::Text(s)], &name)?,
            Token::Word { text, args: None } if is_number_literal(&text) => {
                let number = Decimal::parse(&text, true).map_err(|e| layout_err(format!("{}: {}", name, e)))?;
                registry.converter(LITERAL_CONVERTER, &[ConverterArg::Number(number)], &name)?
            }
            Token::Word { text, args } => registry.converter(&text, args.as_deref().unwrap_or(&[]), &name)?,
            Token::Bounds(_) => return Err(layout_err(format!("{}: unexpected array bounds", name))),
        };
        builder = builder.converter(converter);
    }

    builder.build()
}

fn parse_bounds(raw: &str) -> std::result::Result<ArrayBounds, String> {
    let raw = raw.trim();
    if raw == "*" {
        return Ok(ArrayBounds::UNBOUNDED);
    }

    let parse_num = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid array bounds '[{}]'", raw))
    };

    match raw.split_once("..") {
        Some((min, max)) => {
            let min = parse_num(min)?;
            let max = if max.trim() == "*" { usize::MAX } else { parse_num(max)? };
            Ok(ArrayBounds { min, max })
        }
        None => {
            let n = parse_num(raw)?;
            Ok(ArrayBounds { min: n, max: n })
        }
    }
}

fn is_number_literal(text: &str) -> bool {
    let digits = text.strip_prefix(&['-', '+'][..]).unwrap_or(text);
    digits.bytes().next().map_or(false, |b| b.is_ascii_digit())
}

// =============================================================================
// Tokenizer
// =============================================================================

fn tokenize(line: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => break,
            '"' => {
                chars.next();
                tokens.push(Token::Quoted(read_quoted(&mut chars)?));
            }
            '[' => {
                chars.next();
                let mut inner = String::new();
                loop {
                    match chars.next() {
                        Some((_, ']')) => break,
                        Some((_, ch)) => inner.push(ch),
                        None => return Err("unterminated array bounds".to_string()),
                    }
                }
                tokens.push(Token::Bounds(inner));
            }
            _ => {
                let mut end = start;
                while let Some(&(i, ch)) = chars.peek() {
                    if ch.is_whitespace() || ch == '(' || ch == '"' || ch == '[' {
                        break;
                    }
                    end = i + ch.len_utf8();
                    chars.next();
                }
                let text = line[start..end].to_string();
                if text.is_empty() {
                    return Err(format!("unexpected character '{}'", c));
                }

                let args = match chars.peek() {
                    Some(&(_, '(')) => {
                        chars.next();
                        Some(read_args(&mut chars)?)
                    }
                    _ => None,
                };
                tokens.push(Token::Word { text, args });
            }
        }
    }

    Ok(tokens)
}

fn read_quoted(chars: &mut Peekable<CharIndices<'_>>) -> std::result::Result<String, String> {
    let mut out = String::new();
    loop {
        match chars.next() {
            Some((_, '"')) => return Ok(out),
            Some((_, '\\')) => match chars.next() {
                Some((_, ch)) => out.push(ch),
                None => return Err("unterminated string literal".to_string()),
            },
            Some((_, ch)) => out.push(ch),
            None => return Err("unterminated string literal".to_string()),
        }
    }
}

/// Parse `arg, arg, ...)` after an opening parenthesis
fn read_args(chars: &mut Peekable<CharIndices<'_>>) -> std::result::Result<Vec<ConverterArg>, String> {
    let mut args = Vec::new();
    let mut current = String::new();

    let push_bare = |current: &mut String, args: &mut Vec<ConverterArg>| -> std::result::Result<(), String> {
        let bare = current.trim();
        if !bare.is_empty() {
            let number = Decimal::parse(bare, true).map_err(|e| e.to_string())?;
            args.push(ConverterArg::Number(number));
        }
        current.clear();
        Ok(())
    };

    loop {
        match chars.next() {
            Some((_, ')')) => {
                push_bare(&mut current, &mut args)?;
                return Ok(args);
            }
            Some((_, ',')) => push_bare(&mut current, &mut args)?,
            Some((_, '"')) => {
                if !current.trim().is_empty() {
                    return Err(format!("unexpected '{}' before string argument", current.trim()));
                }
                current.clear();
                args.push(ConverterArg::Text(read_quoted(chars)?));
            }
            Some((_, ch)) => current.push(ch),
            None => return Err("unterminated argument list".to_string()),
        }
    }
}
