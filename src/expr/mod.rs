//! filter and edit expressions for listen records
//!
//! provides:
//! - filter clauses: `key<op>value` joined by `&&` (implicit AND)
//! - comparison operators: ==, !=, <, <=, >, >=, and ^ (truthiness XOR)
//! - include/exclude list sources (set membership per key)
//! - exclusive time bounds
//! - edits: `key=value` assignments
//!
//! filters and modifiers are built once and then applied to every record.

mod compare;
mod error;
mod eval;
mod filter;
mod modifier;
mod parser;
mod record;
mod time;
mod types;

pub use compare::{compare, literal_is_truthy, parse_number, Incomparable};
pub use error::{ExprError, Result};
pub use eval::{evaluate, Evaluation, SkipReason};
pub use filter::{build_filter, Filter, FilterOptions, ListSource, Verdict, Warning};
pub use modifier::{build_modifier, Modifier};
pub use parser::{parse_clause, parse_edit, parse_filter, parse_list_source, CONJUNCTION};
pub use record::Record;
pub use time::{parse_timestamp, TimeRange};
pub use types::{Condition, Edit, Operand, Operator, Value};
