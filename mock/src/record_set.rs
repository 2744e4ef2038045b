use std::sync::Arc;

use crate::error::{Error, Result};
use crate::row::Row;
use crate::schema::RowSchema;

/// Ordered rows sharing one schema. Failure rows may be mixed in anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    schema: Arc<RowSchema>,
    rows: Vec<Row>,
}

impl RecordSet {
    pub fn new(schema: Arc<RowSchema>) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(schema: Arc<RowSchema>, rows: impl IntoIterator<Item = Row>) -> Result<Self> {
        let mut set = Self::new(schema);
        for row in rows {
            set.add(row)?;
        }
        Ok(set)
    }

    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }

    /// Appends `row`, which must be a failure row or share this set's schema.
    pub fn add(&mut self, row: Row) -> Result<()> {
        if !row.is_failure() && row.schema_id() != self.schema.id() {
            return Err(Error::Argument(
                "The row's schema does not match the record set's schema.".to_string(),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Removes the first row equal to `row`.
    pub fn remove(&mut self, row: &Row) -> bool {
        match self.rows.iter().position(|r| r == row) {
            Some(index) => {
                self.rows.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, row: &Row) -> bool {
        self.rows.contains(row)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for RecordSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
