use serde::{Deserialize, Serialize};
use tera::{Map, Number, Value};
use thiserror::Error;

/// Structured metadata decoded from the head of a document.
pub type FrontMatter = Map<String, Value>;

const TOML_FENCE: &str = "+++";

/// How a handler extracts front matter from the raw text of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontMatterFormat {
    /// A JSON object at the very start of the file. The object delimits itself.
    #[default]
    Json,
    /// A TOML table between two `+++` lines.
    Toml,
    /// Never decode; the whole file is body.
    None,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no front matter block at the start of the file")]
    Missing,

    #[error("front matter must be a table of key/value pairs")]
    NotAMap,

    #[error("malformed front matter: {0}")]
    Malformed(String),
}

impl FrontMatterFormat {
    /// Split `text` into its front matter and the remaining body.
    ///
    /// One line break directly after the block is dropped from the body.
    pub fn decode(self, text: &str) -> Result<(FrontMatter, String), DecodeError> {
        match self {
            FrontMatterFormat::Json => decode_json(text),
            FrontMatterFormat::Toml => decode_toml(text),
            FrontMatterFormat::None => Err(DecodeError::Missing),
        }
    }
}

fn decode_json(text: &str) -> Result<(FrontMatter, String), DecodeError> {
    // The block must start at the first byte; leading blank lines are body.
    if text.starts_with(char::is_whitespace) {
        return Err(DecodeError::Missing);
    }
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    match stream.next() {
        Some(Ok(Value::Object(map))) => {
            let rest = &text[stream.byte_offset()..];
            Ok((map, strip_leading_newline(rest).to_string()))
        }
        Some(Ok(_)) => Err(DecodeError::NotAMap),
        Some(Err(e)) => Err(DecodeError::Malformed(e.to_string())),
        None => Err(DecodeError::Missing),
    }
}

fn decode_toml(text: &str) -> Result<(FrontMatter, String), DecodeError> {
    let Some(first_end) = text.find('\n') else {
        return Err(DecodeError::Missing);
    };
    if text[..first_end].trim_end() != TOML_FENCE {
        return Err(DecodeError::Missing);
    }

    let table_start = first_end + 1;
    let mut offset = table_start;
    for line in text[table_start..].split_inclusive('\n') {
        if line.trim_end() == TOML_FENCE {
            let table: toml::Table = toml::from_str(&text[table_start..offset])
                .map_err(|e| DecodeError::Malformed(e.message().to_string()))?;
            let Value::Object(map) = toml_to_json(toml::Value::Table(table)) else {
                return Err(DecodeError::NotAMap);
            };
            let fence_len = line.trim_end_matches(['\n', '\r']).len();
            let rest = &text[offset + fence_len..];
            return Ok((map, strip_leading_newline(rest).to_string()));
        }
        offset += line.len();
    }

    Err(DecodeError::Malformed("unterminated +++ block".into()))
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Drop exactly one leading line break (`\n` or `\r\n`), if present.
pub fn strip_leading_newline(text: &str) -> &str {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
}
