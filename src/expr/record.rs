//! attribute access over records
//!
//! expressions address attributes by name. a record exposes a fixed set of
//! primary fields and an open metadata map; lookups try the primary fields
//! first, so a primary field shadows a metadata entry of the same name.

use super::types::Value;

/// a record that expressions can read and edit
pub trait Record {
    /// event time in seconds since the unix epoch
    fn timestamp(&self) -> i64;

    /// read a primary field, `None` if `key` is not a primary field
    fn primary(&self, key: &str) -> Option<Value>;

    /// read a metadata entry, `None` if absent
    fn metadata(&self, key: &str) -> Option<Value>;

    /// write a primary field, returns false if `key` is not a primary field
    fn set_primary(&mut self, key: &str, value: &str) -> bool;

    /// write a metadata entry, creating the metadata map if needed
    fn set_metadata(&mut self, key: &str, value: &str);

    /// look up an attribute: primary fields, then metadata, else absent
    fn get(&self, key: &str) -> Value {
        self.primary(key)
            .or_else(|| self.metadata(key))
            .unwrap_or(Value::Absent)
    }

    /// assign an attribute: primary field if recognised, else metadata
    fn set(&mut self, key: &str, value: &str) {
        if !self.set_primary(key, value) {
            self.set_metadata(key, value);
        }
    }
}
