//! core types for filter and edit expressions

use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

/// comparison operators supported in filter clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// equality: ==
    Eq,
    /// inequality: !=
    Ne,
    /// less than: <
    Lt,
    /// less than or equal: <=
    Le,
    /// greater than: >
    Gt,
    /// greater than or equal: >=
    Ge,
    /// exclusive or of truthiness: ^
    Xor,
}

impl Operator {
    /// operator tokens in match order, two-character tokens before their prefixes
    pub const TOKENS: [(&'static str, Operator); 7] = [
        ("==", Operator::Eq),
        ("!=", Operator::Ne),
        ("<=", Operator::Le),
        ("<", Operator::Lt),
        (">=", Operator::Ge),
        (">", Operator::Gt),
        ("^", Operator::Xor),
    ];

    /// match the longest operator token at the start of `s`
    pub fn lex(s: &str) -> Option<(Self, usize)> {
        Self::TOKENS
            .iter()
            .find(|(token, _)| s.starts_with(token))
            .map(|(token, op)| (*op, token.len()))
    }

    pub fn token(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Xor => "^",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// an attribute value read from or written to a record
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// attribute not present in either namespace
    Absent,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// multi-valued attribute, nested sequences flattened
    List(Vec<Value>),
    /// nested map, never comparable
    Object,
}

impl Value {
    /// convert a JSON value, flattening nested arrays
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => {
                let mut flat = Vec::with_capacity(items.len());
                flatten_into(items, &mut flat);
                Value::List(flat)
            }
            JsonValue::Object(_) => Value::Object,
        }
    }

    /// name of the value kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object => "object",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// check if value is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Absent | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Object => true,
        }
    }
}

fn flatten_into(items: &[JsonValue], out: &mut Vec<Value>) {
    for item in items {
        match item {
            JsonValue::Array(inner) => flatten_into(inner, out),
            other => out.push(Value::from_json(other)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "<absent>"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Object => write!(f, "{{...}}"),
        }
    }
}

/// right-hand side of a condition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// single literal text
    Literal(String),
    /// set of literals from a list source
    Set(Vec<String>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(s) => write!(f, "{}", s),
            Operand::Set(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// a single attribute comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    /// attribute name (e.g., "artist_name", "duration_ms")
    pub key: String,
    #[serde(rename = "operator")]
    pub op: Operator,
    pub operand: Operand,
}

impl Condition {
    pub fn new(key: impl Into<String>, op: Operator, literal: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            op,
            operand: Operand::Literal(literal.into()),
        }
    }

    /// create a membership condition ("value is one of")
    pub fn one_of(key: impl Into<String>, literals: Vec<String>) -> Self {
        Self {
            key: key.into(),
            op: Operator::Eq,
            operand: Operand::Set(literals),
        }
    }

    /// create an exclusion condition ("value is none of")
    pub fn none_of(key: impl Into<String>, literals: Vec<String>) -> Self {
        Self {
            key: key.into(),
            op: Operator::Ne,
            operand: Operand::Set(literals),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.key, self.op, self.operand)
    }
}

/// a single field assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub key: String,
    pub value: String,
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
