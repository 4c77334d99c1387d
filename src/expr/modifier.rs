//! edit builder

use tracing::debug;

use super::error::Result;
use super::parser::parse_edit;
use super::record::Record;
use super::types::Edit;

/// compiled list of edits, applied in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifier {
    edits: Vec<Edit>,
}

impl Modifier {
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// apply all edits; a later edit of the same key overwrites an earlier one
    pub fn apply<R: Record + ?Sized>(&self, record: &mut R) {
        for edit in &self.edits {
            record.set(&edit.key, &edit.value);
        }
    }
}

/// build a modifier from `key=value` expressions
pub fn build_modifier<S: AsRef<str>>(expressions: &[S]) -> Result<Modifier> {
    let edits = expressions
        .iter()
        .map(|e| parse_edit(e.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    debug!(edits = edits.len(), "built modifier");
    Ok(Modifier { edits })
}
