// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// Original position of a body row, stable across reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(usize);

impl RowId {
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for RowId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Document-level identifier of a table element (its `id` attribute).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableId(String);

impl TableId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Class shared by every sort indicator of this table.
    pub fn indicator_class(&self) -> String {
        format!("{}-arrow", self.0)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TableId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{RowId, TableId};

    #[test]
    fn indicator_class_appends_arrow_suffix() {
        assert_eq!(TableId::new("people").indicator_class(), "people-arrow");
    }

    #[test]
    fn row_ids_round_trip_their_value() {
        assert_eq!(RowId::new(4).get(), 4);
        assert_eq!(RowId::from(2).get(), 2);
    }
}
