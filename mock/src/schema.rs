use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use crate::column::ColumnSchema;
use crate::error::{Error, Result};
use crate::types::SqlType;

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`RowSchema`]. Two schemas with identical columns are still
/// different schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u64);

/// Name of the single column of the failure schema.
pub const FAILURE_COLUMN: &str = "Exception";

static FAILURE_SCHEMA: LazyLock<Arc<RowSchema>> = LazyLock::new(|| {
    let column = ColumnSchema::new(FAILURE_COLUMN, SqlType::Variant)
        .expect("variant column is always valid");
    Arc::new(RowSchema::new(vec![column]).expect("single column schema is always valid"))
});

/// Ordered, immutable set of columns shared by all data rows of a record set.
#[derive(Debug)]
pub struct RowSchema {
    id: SchemaId,
    columns: Vec<ColumnSchema>,
}

impl RowSchema {
    /// Takes ownership of `columns` and assigns each its ordinal.
    ///
    /// Fails if there are no columns, if a column already belongs to another
    /// schema (e.g. a clone of an attached column), or if two names compare equal.
    pub fn new(columns: Vec<ColumnSchema>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::Range(
                "The column definitions must have at least one column.".to_string(),
            ));
        }
        let id = SchemaId(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed));

        let mut folded: Vec<String> = Vec::with_capacity(columns.len());
        let mut columns = columns;
        for (ordinal, column) in columns.iter_mut().enumerate() {
            if column.owner.is_some() {
                return Err(Error::Range(format!(
                    "{column} cannot be added to the row schema as it already belongs to a different row schema."
                )));
            }
            let name = fold_name(column.name());
            if folded.contains(&name) {
                return Err(Error::Range(format!(
                    "Duplicate column name '{}' at ordinal {ordinal}.",
                    column.name()
                )));
            }
            folded.push(name);
            column.owner = Some(id);
            column.ordinal = Some(ordinal);
        }
        tracing::trace!("created row schema {:?} with {} columns", id, columns.len());
        Ok(Self { id, columns })
    }

    /// The schema reported by failure rows.
    pub fn failure() -> Arc<RowSchema> {
        FAILURE_SCHEMA.clone()
    }

    pub(crate) fn failure_ref() -> &'static Arc<RowSchema> {
        &FAILURE_SCHEMA
    }

    pub fn is_failure(&self) -> bool {
        self.id == FAILURE_SCHEMA.id
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, ordinal: usize) -> Result<&ColumnSchema> {
        self.columns.get(ordinal).ok_or_else(|| {
            Error::Index(format!(
                "column {ordinal} (schema has {} columns)",
                self.columns.len()
            ))
        })
    }

    /// Case, width and kana insensitive lookup.
    pub fn ordinal(&self, name: &str) -> Result<usize> {
        let wanted = fold_name(name);
        self.columns
            .iter()
            .position(|c| fold_name(c.name()) == wanted)
            .ok_or_else(|| Error::Index(name.to_string()))
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSchema> {
        self.columns.iter()
    }
}

impl PartialEq for RowSchema {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RowSchema {}

impl<'a> IntoIterator for &'a RowSchema {
    type Item = &'a ColumnSchema;
    type IntoIter = std::slice::Iter<'a, ColumnSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Folds a column name for comparison: full-width ASCII to ASCII, hiragana to
/// katakana, then lowercase.
fn fold_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            '\u{3000}' => ' ',
            '\u{3041}'..='\u{3096}' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        })
        .flat_map(char::to_lowercase)
        .collect()
}
