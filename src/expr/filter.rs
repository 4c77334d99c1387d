//! filter builder
//!
//! combines filter text, time bounds and list sources into a [`Filter`].
//! all parsing happens in [`build_filter`]; a built filter only evaluates.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use super::error::{ExprError, Result};
use super::eval::{evaluate, Evaluation, SkipReason};
use super::parser::{parse_filter, parse_list_source};
use super::record::Record;
use super::time::{parse_timestamp, TimeRange};
use super::types::Condition;

/// a named JSON list source mapping attribute keys to literal values
#[derive(Debug, Clone)]
pub struct ListSource {
    name: String,
    content: String,
}

impl ListSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// read a list source from a file, named after its path
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|error| ExprError::ListSourceIo {
            source_name: name.clone(),
            error,
        })?;
        Ok(Self { name, content })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// parse the source into `(key, literals)` pairs
    pub fn entries(&self) -> Result<Vec<(String, Vec<String>)>> {
        parse_list_source(&self.content, &self.name)
    }
}

/// inputs for [`build_filter`]
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// clauses joined by `&&`
    pub filter: Option<String>,
    /// only keep records after this time (exclusive)
    pub after: Option<String>,
    /// only keep records before this time (exclusive)
    pub before: Option<String>,
    /// reject records whose attribute matches any listed value
    pub exclude: Option<ListSource>,
    /// keep only records whose attribute matches a listed value
    pub include: Option<ListSource>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn with_exclude(mut self, source: ListSource) -> Self {
        self.exclude = Some(source);
        self
    }

    pub fn with_include(mut self, source: ListSource) -> Self {
        self.include = Some(source);
        self
    }
}

/// a condition that was skipped while checking a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub key: String,
    pub reason: SkipReason,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "condition on '{}' skipped: {}", self.key, self.reason)
    }
}

/// result of checking one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub accepted: bool,
    /// skipped conditions, in evaluation order
    pub warnings: Vec<Warning>,
}

/// compiled filter: a time range plus conditions that must all hold
#[derive(Debug, Clone, Default)]
pub struct Filter {
    range: TimeRange,
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new(range: TimeRange, conditions: Vec<Condition>) -> Self {
        Self { range, conditions }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// check a record, collecting skipped conditions
    ///
    /// stops at the first failing condition.
    pub fn check<R: Record + ?Sized>(&self, record: &R) -> Result<Verdict> {
        let mut verdict = Verdict::default();

        if !self.range.contains(record.timestamp()) {
            return Ok(verdict);
        }

        for condition in &self.conditions {
            let actual = record.get(&condition.key);
            match evaluate(condition, &actual)? {
                Evaluation::Pass => {}
                Evaluation::Fail => return Ok(verdict),
                Evaluation::Skipped(reason) => verdict.warnings.push(Warning {
                    key: condition.key.clone(),
                    reason,
                }),
            }
        }

        verdict.accepted = true;
        Ok(verdict)
    }

    /// check a record, logging skipped conditions as warnings
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> Result<bool> {
        let verdict = self.check(record)?;
        for w in &verdict.warnings {
            warn!(key = %w.key, timestamp = record.timestamp(), "{}", w);
        }
        Ok(verdict.accepted)
    }
}

/// build a filter, failing on the first invalid clause, bound or list source
pub fn build_filter(options: &FilterOptions) -> Result<Filter> {
    let mut conditions = match &options.filter {
        Some(text) => parse_filter(text)?,
        None => Vec::new(),
    };

    let after = parse_bound(options.after.as_deref(), "after")?;
    let before = parse_bound(options.before.as_deref(), "before")?;

    if let Some(source) = &options.exclude {
        let entries = source.entries()?;
        debug!(source = source.name(), keys = entries.len(), "loaded exclude list");
        conditions.extend(
            entries
                .into_iter()
                .map(|(key, literals)| Condition::none_of(key, literals)),
        );
    }

    if let Some(source) = &options.include {
        let entries = source.entries()?;
        debug!(source = source.name(), keys = entries.len(), "loaded include list");
        conditions.extend(
            entries
                .into_iter()
                .map(|(key, literals)| Condition::one_of(key, literals)),
        );
    }

    let range = TimeRange::new(after, before);
    debug!(
        min = range.min,
        max = range.max,
        conditions = conditions.len(),
        "built filter"
    );

    Ok(Filter::new(range, conditions))
}

fn parse_bound(input: Option<&str>, bound: &'static str) -> Result<Option<i64>> {
    input
        .map(|s| {
            parse_timestamp(s).ok_or_else(|| ExprError::InvalidTimestamp {
                bound,
                input: s.to_string(),
            })
        })
        .transpose()
}
