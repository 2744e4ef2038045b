use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime};
use rand::Rng;
use uuid::Uuid;

use crate::column::ColumnSchema;
use crate::decimal::Decimal;
use crate::error::{Error, InjectedError, Result};
use crate::profile::GenerationProfile;
use crate::schema::{RowSchema, SchemaId};
use crate::types::{FromValue, Value, ValueKind};

/// Produces the value of one column given the row number.
pub type ColumnGenerator = Box<dyn Fn(usize) -> Value>;

/// How [`Row::generate`] fills columns that have no generator.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOptions {
    /// Random values instead of column defaults.
    pub randomize: bool,
    /// Chance of a null for each nullable randomized column.
    pub null_probability: f64,
    /// Passed to column generators.
    pub row_number: usize,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self {
            randomize: false,
            null_probability: 0.1,
            row_number: 1,
        }
    }
}

/// A row of values conforming to a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    schema: Arc<RowSchema>,
    values: Vec<Value>,
}

/// A row that raises its error from every field accessor.
#[derive(Debug, Clone)]
pub struct FailureRow {
    error: InjectedError,
}

impl FailureRow {
    pub fn error(&self) -> &InjectedError {
        &self.error
    }
}

/// A row of a record set.
///
/// Failure rows stand in for a server error raised mid-stream: they report the
/// single column failure schema, but reading any field returns
/// [`Error::Injected`] carrying the original payload.
#[derive(Debug, Clone)]
pub enum Row {
    Data(DataRow),
    Failure(FailureRow),
}

impl Row {
    /// Builds a data row. Missing trailing values take the column defaults.
    pub fn new(schema: &Arc<RowSchema>, values: Vec<Value>) -> Result<Self> {
        let expected = schema.field_count();
        if values.len() > expected {
            return Err(Error::Argument(format!(
                "The number of values specified '{}' cannot exceed the number of expected columns '{expected}'.",
                values.len()
            )));
        }
        let mut values = values.into_iter();
        let stored = schema
            .iter()
            .map(|column| {
                let value = values
                    .next()
                    .unwrap_or_else(|| column.default_value().clone());
                checked(column, &value)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Row::Data(DataRow {
            schema: schema.clone(),
            values: stored,
        }))
    }

    /// A data row holding every column's default value.
    pub fn with_defaults(schema: &Arc<RowSchema>) -> Self {
        Row::Data(DataRow {
            schema: schema.clone(),
            values: schema.iter().map(|c| c.default_value().clone()).collect(),
        })
    }

    /// Builds a data row from generators, random values or defaults, in that
    /// order of preference per column.
    pub fn generate<R: Rng + ?Sized>(
        schema: &Arc<RowSchema>,
        options: &RowOptions,
        generators: &[Option<ColumnGenerator>],
        rng: &mut R,
        profile: &GenerationProfile,
    ) -> Result<Self> {
        if generators.len() > schema.field_count() {
            return Err(Error::Argument(format!(
                "The number of column generators '{}' cannot exceed the number of columns '{}'.",
                generators.len(),
                schema.field_count()
            )));
        }
        let mut values = Vec::with_capacity(schema.field_count());
        for (ordinal, column) in schema.iter().enumerate() {
            let value = match generators.get(ordinal) {
                Some(Some(generator)) => checked(column, &generator(options.row_number))?,
                _ if options.randomize => {
                    let value = column.random_value(rng, options.null_probability, profile);
                    checked(column, &value)?
                }
                _ => column.default_value().clone(),
            };
            values.push(value);
        }
        Ok(Row::Data(DataRow {
            schema: schema.clone(),
            values,
        }))
    }

    pub fn failure<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::from_injected(Arc::new(error))
    }

    pub fn from_injected(error: InjectedError) -> Self {
        Row::Failure(FailureRow { error })
    }

    /// Like [`Row::failure`] but rejects a missing payload.
    pub fn try_failure<E>(error: Option<E>) -> Result<Self>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        error
            .map(Self::failure)
            .ok_or_else(|| Error::Argument("A failure row requires an error.".to_string()))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Row::Failure(_))
    }

    /// The row's schema; the shared failure schema for failure rows.
    pub fn schema(&self) -> &Arc<RowSchema> {
        match self {
            Row::Data(row) => &row.schema,
            Row::Failure(_) => RowSchema::failure_ref(),
        }
    }

    pub fn schema_id(&self) -> SchemaId {
        self.schema().id()
    }

    fn data(&self) -> Result<&DataRow> {
        match self {
            Row::Data(row) => Ok(row),
            Row::Failure(row) => Err(Error::Injected(row.error.clone())),
        }
    }

    fn data_mut(&mut self) -> Result<&mut DataRow> {
        match self {
            Row::Data(row) => Ok(row),
            Row::Failure(row) => Err(Error::Injected(row.error.clone())),
        }
    }

    fn column(&self, i: usize) -> Result<&ColumnSchema> {
        self.data()?.schema.column(i)
    }

    pub fn field_count(&self) -> Result<usize> {
        Ok(self.data()?.values.len())
    }

    pub fn get_name(&self, i: usize) -> Result<&str> {
        Ok(self.column(i)?.name())
    }

    pub fn get_data_type_name(&self, i: usize) -> Result<&'static str> {
        Ok(self.column(i)?.type_name())
    }

    pub fn get_field_type(&self, i: usize) -> Result<ValueKind> {
        Ok(self.column(i)?.field_kind())
    }

    pub fn get_ordinal(&self, name: &str) -> Result<usize> {
        self.data()?.schema.ordinal(name)
    }

    pub fn get_value(&self, i: usize) -> Result<&Value> {
        let row = self.data()?;
        row.values.get(i).ok_or_else(|| {
            Error::Index(format!(
                "column {i} (row has {} columns)",
                row.values.len()
            ))
        })
    }

    pub fn value_by_name(&self, name: &str) -> Result<&Value> {
        let i = self.get_ordinal(name)?;
        self.get_value(i)
    }

    /// All values of the row.
    pub fn values(&self) -> Result<&[Value]> {
        Ok(&self.data()?.values)
    }

    /// Copies as many values as fit into `out` and returns how many were copied.
    pub fn get_values(&self, out: &mut [Value]) -> Result<usize> {
        let values = &self.data()?.values;
        let n = values.len().min(out.len());
        out[..n].clone_from_slice(&values[..n]);
        Ok(n)
    }

    pub fn get<T>(&self, i: usize) -> Result<T>
    where
        T: FromValue,
    {
        T::from_sql(self.get_value(i)?)
    }

    pub fn is_null(&self, i: usize) -> Result<bool> {
        Ok(self.get_value(i)?.is_null())
    }

    pub fn get_boolean(&self, i: usize) -> Result<bool> {
        self.get(i)
    }

    pub fn get_byte(&self, i: usize) -> Result<u8> {
        self.get(i)
    }

    pub fn get_int16(&self, i: usize) -> Result<i16> {
        self.get(i)
    }

    pub fn get_int32(&self, i: usize) -> Result<i32> {
        self.get(i)
    }

    pub fn get_int64(&self, i: usize) -> Result<i64> {
        self.get(i)
    }

    pub fn get_float(&self, i: usize) -> Result<f32> {
        self.get(i)
    }

    pub fn get_double(&self, i: usize) -> Result<f64> {
        self.get(i)
    }

    pub fn get_decimal(&self, i: usize) -> Result<Decimal> {
        self.get(i)
    }

    pub fn get_string(&self, i: usize) -> Result<String> {
        self.get(i)
    }

    pub fn get_char(&self, i: usize) -> Result<char> {
        self.get(i)
    }

    pub fn get_guid(&self, i: usize) -> Result<Uuid> {
        self.get(i)
    }

    pub fn get_date_time(&self, i: usize) -> Result<NaiveDateTime> {
        self.get(i)
    }

    pub fn get_time(&self, i: usize) -> Result<NaiveTime> {
        self.get(i)
    }

    pub fn get_date_time_offset(&self, i: usize) -> Result<DateTime<FixedOffset>> {
        self.get(i)
    }

    /// Copies up to `length` bytes of a binary field, starting at
    /// `field_offset`, into `buffer[buffer_offset..]`. Returns the number of
    /// bytes copied, or `0` when no buffer is given.
    pub fn get_bytes(
        &self,
        i: usize,
        field_offset: usize,
        buffer: Option<&mut [u8]>,
        buffer_offset: usize,
        length: usize,
    ) -> Result<usize> {
        let value = self.get_value(i)?;
        let Some(buffer) = buffer else {
            return Ok(0);
        };
        let bytes = match value {
            Value::Bytes(bytes) => bytes,
            Value::Null => return Err(Error::NullValue { expected: "bytes" }),
            other => {
                return Err(Error::Cast {
                    expected: "bytes",
                    found: other.kind(),
                })
            }
        };
        let source = bytes.get(field_offset..).unwrap_or_default();
        copy_into(source, buffer, buffer_offset, length)
    }

    /// Character counterpart of [`Row::get_bytes`], reading a string field.
    pub fn get_chars(
        &self,
        i: usize,
        field_offset: usize,
        buffer: Option<&mut [char]>,
        buffer_offset: usize,
        length: usize,
    ) -> Result<usize> {
        let value = self.get_value(i)?;
        let Some(buffer) = buffer else {
            return Ok(0);
        };
        let chars: Vec<char> = match value {
            Value::String(s) => s.chars().skip(field_offset).collect(),
            Value::Null => return Err(Error::NullValue { expected: "string" }),
            other => {
                return Err(Error::Cast {
                    expected: "string",
                    found: other.kind(),
                })
            }
        };
        copy_into(&chars, buffer, buffer_offset, length)
    }

    /// Replaces the value at `i`. Setting the current value again is a no-op.
    pub fn set_value(&mut self, i: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let row = self.data_mut()?;
        let column = row.schema.column(i)?;
        if row.values[i] == value {
            return Ok(());
        }
        let stored = checked(column, &value)?;
        tracing::trace!("setting column {i} to {stored}");
        row.values[i] = stored;
        Ok(())
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Row::Data(a), Row::Data(b)) => a == b,
            (Row::Failure(a), Row::Failure(b)) => Arc::ptr_eq(&a.error, &b.error),
            _ => false,
        }
    }
}

fn checked(column: &ColumnSchema, value: &Value) -> Result<Value> {
    column.validate(value).ok_or_else(|| {
        Error::Argument(format!(
            "Cannot set the value of {column} to '{value}'."
        ))
    })
}

fn copy_into<T: Copy>(
    source: &[T],
    buffer: &mut [T],
    buffer_offset: usize,
    length: usize,
) -> Result<usize> {
    let n = source.len().min(length);
    let buffer_len = buffer.len();
    let target = buffer
        .get_mut(buffer_offset..buffer_offset.saturating_add(n))
        .ok_or_else(|| {
            Error::Argument(format!(
                "Buffer of length {buffer_len} cannot hold {n} items at offset {buffer_offset}."
            ))
        })?;
    target.copy_from_slice(&source[..n]);
    Ok(n)
}
