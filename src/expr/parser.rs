//! expression parser - converts text to conditions and edits
//!
//! supports:
//! - filter clauses: `key<op>value` joined by `&&`
//! - operators: == != <= < >= > ^ (longest token wins)
//! - edits: `key=value`, the value is everything after the first `=`
//! - list sources: JSON objects mapping keys to lists of literals

use serde_json::Value as JsonValue;

use super::error::{ExprError, Result};
use super::types::{Condition, Edit, Operator};

/// separator between clauses of a filter
pub const CONJUNCTION: &str = "&&";

/// characters that can start an operator token
const OPERATOR_START: [char; 5] = ['=', '!', '<', '>', '^'];

/// parse a filter into its clauses, in order
///
/// blank text yields no conditions.
pub fn parse_filter(text: &str) -> Result<Vec<Condition>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(CONJUNCTION).map(parse_clause).collect()
}

/// parse a single `key<op>value` clause
pub fn parse_clause(clause: &str) -> Result<Condition> {
    let invalid = || ExprError::InvalidClause {
        clause: clause.trim().to_string(),
    };

    let clause_text = clause.trim();
    let start = clause_text.find(&OPERATOR_START[..]).ok_or_else(invalid)?;

    let key = clause_text[..start].trim_end();
    if !is_valid_key(key) {
        return Err(invalid());
    }

    let (op, len) = Operator::lex(&clause_text[start..]).ok_or_else(invalid)?;
    let literal = clause_text[start + len..].trim_start();

    Ok(Condition::new(key, op, literal))
}

/// parse a `key=value` edit
pub fn parse_edit(expression: &str) -> Result<Edit> {
    let invalid = || ExprError::InvalidEdit {
        expression: expression.to_string(),
    };

    let (key, value) = expression.split_once('=').ok_or_else(invalid)?;
    let key = key.trim();
    if !is_valid_key(key) {
        return Err(invalid());
    }

    Ok(Edit {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// parse a list source into `(key, literals)` pairs
///
/// `source_name` only appears in error messages.
pub fn parse_list_source(content: &str, source_name: &str) -> Result<Vec<(String, Vec<String>)>> {
    let malformed = |message: String| ExprError::MalformedListSource {
        source_name: source_name.to_string(),
        message,
    };

    let json: JsonValue = serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;
    let obj = json
        .as_object()
        .ok_or_else(|| malformed("expected an object at the top level".to_string()))?;

    obj.iter()
        .map(|(key, value)| {
            let invalid_entry = || ExprError::InvalidListEntry {
                source_name: source_name.to_string(),
                key: key.clone(),
            };

            let items = value.as_array().ok_or_else(invalid_entry)?;
            let mut literals = Vec::with_capacity(items.len());
            collect_literals(items, &mut literals).ok_or_else(invalid_entry)?;

            Ok((key.clone(), literals))
        })
        .collect()
}

fn collect_literals(items: &[JsonValue], out: &mut Vec<String>) -> Option<()> {
    for item in items {
        match item {
            JsonValue::String(s) => out.push(s.clone()),
            JsonValue::Number(n) => out.push(n.to_string()),
            JsonValue::Bool(b) => out.push(b.to_string()),
            JsonValue::Array(inner) => collect_literals(inner, out)?,
            JsonValue::Null | JsonValue::Object(_) => return None,
        }
    }
    Some(())
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(char::is_whitespace)
}
