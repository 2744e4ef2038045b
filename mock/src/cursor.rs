use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime};
use tracing::{instrument, Level};
use uuid::Uuid;

use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::record_set::RecordSet;
use crate::row::Row;
use crate::schema::RowSchema;
use crate::types::{FromValue, Value, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowPosition {
    BeforeFirst,
    On(usize),
    AfterLast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    /// Index of the current record set; equal to the set count once exhausted.
    set: usize,
    row: RowPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Unstarted,
    Reading(Position),
    Closed,
}

/// Forward-only reader over a sequence of record sets.
///
/// The cursor starts unstarted: record sets can be added and removed until the
/// first call to [`Cursor::advance_result_set`] or [`Cursor::read_row`].
/// [`Cursor::close`] ends reading, and [`Cursor::reset`] rewinds to the
/// unstarted state so the same data can be replayed.
///
/// ```
/// # use std::sync::Arc;
/// # use turso_mock::{ColumnSchema, Cursor, RecordSet, Row, RowSchema, SqlType, Value};
/// # fn main() -> turso_mock::Result<()> {
/// let schema = Arc::new(RowSchema::new(vec![ColumnSchema::new("ID", SqlType::Int)?])?);
/// let rows = (1..=3).map(|i| Row::new(&schema, vec![Value::Int32(i)]));
/// let set = RecordSet::with_rows(schema.clone(), rows.collect::<turso_mock::Result<Vec<_>>>()?)?;
///
/// let mut cursor = Cursor::from_record_sets([set]);
/// let mut sum = 0;
/// while cursor.read_row()? {
///     sum += cursor.get_int32(0)?;
/// }
/// assert_eq!(sum, 6);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Cursor {
    record_sets: Vec<RecordSet>,
    state: CursorState,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! typed_getter {
    ($($name:ident -> $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&self, i: usize) -> Result<$ty> {
                self.current_row()?.$name(i)
            }
        )*
    };
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            record_sets: Vec::new(),
            state: CursorState::Unstarted,
        }
    }

    pub fn from_record_sets(record_sets: impl IntoIterator<Item = RecordSet>) -> Self {
        Self {
            record_sets: record_sets.into_iter().collect(),
            state: CursorState::Unstarted,
        }
    }

    fn ensure_mutable(&self) -> Result<()> {
        match self.state {
            CursorState::Unstarted => Ok(()),
            CursorState::Reading(_) => Err(Error::InvalidState(
                "Cannot modify the record sets once reading has started.".to_string(),
            )),
            CursorState::Closed => Err(Error::InvalidState(
                "Cannot modify the record sets of a closed cursor.".to_string(),
            )),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == CursorState::Closed {
            return Err(Error::InvalidState("The cursor is closed.".to_string()));
        }
        Ok(())
    }

    pub fn add_record_set(&mut self, record_set: RecordSet) -> Result<()> {
        self.ensure_mutable()?;
        self.record_sets.push(record_set);
        Ok(())
    }

    /// Removes the first record set equal to `record_set`.
    pub fn remove_record_set(&mut self, record_set: &RecordSet) -> Result<bool> {
        self.ensure_mutable()?;
        match self.record_sets.iter().position(|s| s == record_set) {
            Some(index) => {
                self.record_sets.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        self.record_sets.clear();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.record_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_sets.is_empty()
    }

    pub fn contains(&self, record_set: &RecordSet) -> bool {
        self.record_sets.contains(record_set)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecordSet> {
        self.record_sets.iter()
    }

    pub fn is_closed(&self) -> bool {
        self.state == CursorState::Closed
    }

    /// Nesting depth; always 0 as record sets do not nest.
    pub fn depth(&self) -> usize {
        0
    }

    /// Always -1: reading never modifies anything.
    pub fn records_affected(&self) -> i64 {
        -1
    }

    /// Moves to the next record set and reports whether there is one.
    ///
    /// The first call positions on the first record set.
    #[instrument(skip(self), level = Level::DEBUG)]
    pub fn advance_result_set(&mut self) -> Result<bool> {
        let set = match self.state {
            CursorState::Closed => {
                return Err(Error::InvalidState("The cursor is closed.".to_string()))
            }
            CursorState::Unstarted => 0,
            CursorState::Reading(position) => (position.set + 1).min(self.record_sets.len()),
        };
        self.state = CursorState::Reading(Position {
            set,
            row: RowPosition::BeforeFirst,
        });
        let found = set < self.record_sets.len();
        tracing::debug!(set, found, "advanced result set");
        Ok(found)
    }

    /// Moves to the next row of the current record set and reports whether
    /// there is one. Starts on the first record set if reading has not begun.
    #[instrument(skip(self), level = Level::TRACE)]
    pub fn read_row(&mut self) -> Result<bool> {
        let mut position = match self.state {
            CursorState::Closed => {
                return Err(Error::InvalidState("The cursor is closed.".to_string()))
            }
            CursorState::Unstarted => Position {
                set: 0,
                row: RowPosition::BeforeFirst,
            },
            CursorState::Reading(position) => position,
        };
        let Some(record_set) = self.record_sets.get(position.set) else {
            self.state = CursorState::Reading(position);
            return Ok(false);
        };
        let next = match position.row {
            RowPosition::BeforeFirst => 0,
            RowPosition::On(row) => row + 1,
            RowPosition::AfterLast => {
                self.state = CursorState::Reading(position);
                return Ok(false);
            }
        };
        let found = next < record_set.len();
        position.row = if found {
            RowPosition::On(next)
        } else {
            RowPosition::AfterLast
        };
        self.state = CursorState::Reading(position);
        tracing::trace!(set = position.set, row = next, found, "read row");
        Ok(found)
    }

    /// Releases the positions and marks the cursor closed. Closing twice is fine.
    pub fn close(&mut self) {
        if self.state != CursorState::Closed {
            tracing::debug!("closing cursor");
        }
        self.state = CursorState::Closed;
    }

    /// Releases the positions but leaves the closed flag as it is.
    pub fn dispose(&mut self) {
        if self.state != CursorState::Closed {
            self.state = CursorState::Unstarted;
        }
    }

    /// Rewinds to the unstarted state, reopening a closed cursor.
    pub fn reset(&mut self) {
        tracing::debug!("resetting cursor");
        self.state = CursorState::Unstarted;
    }

    /// The record set being read, if any.
    pub fn current_record_set(&self) -> Option<&RecordSet> {
        match self.state {
            CursorState::Reading(position) => self.record_sets.get(position.set),
            _ => None,
        }
    }

    /// The row the cursor is positioned on.
    pub fn current_row(&self) -> Result<&Row> {
        self.ensure_open()?;
        if let CursorState::Reading(Position {
            set,
            row: RowPosition::On(row),
        }) = self.state
        {
            if let Some(row) = self.record_sets.get(set).and_then(|s| s.get(row)) {
                return Ok(row);
            }
        }
        Err(Error::InvalidOperation(
            "No row is available; call read_row first.".to_string(),
        ))
    }

    fn current_schema(&self) -> Result<&RowSchema> {
        self.ensure_open()?;
        let set = match self.state {
            CursorState::Reading(position) => position.set,
            _ => 0,
        };
        self.record_sets
            .get(set)
            .map(|s| s.schema().as_ref())
            .ok_or_else(|| Error::InvalidOperation("No record set is available.".to_string()))
    }

    pub fn field_count(&self) -> Result<usize> {
        Ok(self.current_schema()?.field_count())
    }

    pub fn get_name(&self, i: usize) -> Result<&str> {
        Ok(self.current_schema()?.column(i)?.name())
    }

    pub fn get_data_type_name(&self, i: usize) -> Result<&'static str> {
        Ok(self.current_schema()?.column(i)?.type_name())
    }

    pub fn get_field_type(&self, i: usize) -> Result<ValueKind> {
        Ok(self.current_schema()?.column(i)?.field_kind())
    }

    pub fn get_ordinal(&self, name: &str) -> Result<usize> {
        self.current_schema()?.ordinal(name)
    }

    pub fn get_value(&self, i: usize) -> Result<&Value> {
        self.current_row()?.get_value(i)
    }

    pub fn value_by_name(&self, name: &str) -> Result<&Value> {
        self.current_row()?.value_by_name(name)
    }

    pub fn get_values(&self, out: &mut [Value]) -> Result<usize> {
        self.current_row()?.get_values(out)
    }

    pub fn get<T>(&self, i: usize) -> Result<T>
    where
        T: FromValue,
    {
        self.current_row()?.get(i)
    }

    typed_getter! {
        is_null -> bool,
        get_boolean -> bool,
        get_byte -> u8,
        get_int16 -> i16,
        get_int32 -> i32,
        get_int64 -> i64,
        get_float -> f32,
        get_double -> f64,
        get_decimal -> Decimal,
        get_string -> String,
        get_char -> char,
        get_guid -> Uuid,
        get_date_time -> NaiveDateTime,
        get_time -> NaiveTime,
        get_date_time_offset -> DateTime<FixedOffset>,
    }

    pub fn get_bytes(
        &self,
        i: usize,
        field_offset: usize,
        buffer: Option<&mut [u8]>,
        buffer_offset: usize,
        length: usize,
    ) -> Result<usize> {
        self.current_row()?
            .get_bytes(i, field_offset, buffer, buffer_offset, length)
    }

    pub fn get_chars(
        &self,
        i: usize,
        field_offset: usize,
        buffer: Option<&mut [char]>,
        buffer_offset: usize,
        length: usize,
    ) -> Result<usize> {
        self.current_row()?
            .get_chars(i, field_offset, buffer, buffer_offset, length)
    }
}

impl<'a> IntoIterator for &'a Cursor {
    type Item = &'a RecordSet;
    type IntoIter = std::slice::Iter<'a, RecordSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.record_sets.iter()
    }
}
