use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;

use crate::error::{Error, Result};
use crate::profile::GenerationProfile;
use crate::random;
use crate::schema::SchemaId;
use crate::types::{SqlType, Value, ValueKind};

/// Earliest value a `smalldatetime` column can hold.
pub fn min_small_date_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid constant date")
}

/// Latest value a `smalldatetime` column can hold.
pub fn max_small_date_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2079, 6, 6)
        .and_then(|d| d.and_hms_opt(23, 59, 0))
        .expect("valid constant date")
}

/// Definition of one column of a [`RowSchema`](crate::RowSchema).
///
/// Built through [`ColumnSchema::builder`]; the default value is validated
/// against the column at build time, so every column hands out a usable default.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    name: String,
    sql_type: SqlType,
    kind: ValueKind,
    length: Option<usize>,
    fill: bool,
    nullable: bool,
    default: Value,
    pub(crate) owner: Option<SchemaId>,
    pub(crate) ordinal: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    name: String,
    sql_type: SqlType,
    length: Option<usize>,
    fill: bool,
    nullable: bool,
    default: Value,
}

impl ColumnBuilder {
    /// Declared length. Rejected at build time for types with an intrinsic length.
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Random values use the full declared length instead of any length up to it.
    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn not_null(self) -> Self {
        self.nullable(false)
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    pub fn build(self) -> Result<ColumnSchema> {
        if self.name.is_empty() {
            return Err(Error::Range("column name must not be empty".to_string()));
        }
        let kind = self.sql_type.value_kind()?;

        let mut length = self.sql_type.intrinsic_length();
        let fill = self.fill || length.is_some();
        if let Some(explicit) = self.length {
            if let Some(fixed) = length {
                return Err(Error::Range(format!(
                    "The '{}' sql type has a fixed length of '{fixed}' and so cannot be set explicitly to '{explicit}'.",
                    self.sql_type
                )));
            }
            length = Some(explicit);
        }

        let mut column = ColumnSchema {
            name: self.name,
            sql_type: self.sql_type,
            kind,
            length,
            fill,
            nullable: self.nullable,
            default: Value::Null,
            owner: None,
            ordinal: None,
        };

        if self.default.is_null() && !column.nullable {
            return Err(Error::Range(format!(
                "The '{column}' column is not nullable and so requires a default value."
            )));
        }
        match column.validate(&self.default) {
            Some(default) => column.default = default,
            None => {
                return Err(Error::Range(format!(
                    "The '{column}' column's default value '{}' is not valid.",
                    self.default
                )))
            }
        }
        Ok(column)
    }
}

impl ColumnSchema {
    pub fn builder(name: impl Into<String>, sql_type: SqlType) -> ColumnBuilder {
        ColumnBuilder {
            name: name.into(),
            sql_type,
            length: None,
            fill: false,
            nullable: true,
            default: Value::Null,
        }
    }

    /// A nullable column with no declared length.
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Result<Self> {
        Self::builder(name, sql_type).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    pub fn type_name(&self) -> &'static str {
        self.sql_type.type_name()
    }

    /// Kind of the values this column accepts.
    pub fn field_kind(&self) -> ValueKind {
        self.kind
    }

    /// Declared or intrinsic length; `None` means variable length.
    pub fn fixed_length(&self) -> Option<usize> {
        self.length
    }

    pub fn is_fixed_length(&self) -> bool {
        self.length.is_some()
    }

    pub fn fill(&self) -> bool {
        self.fill
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Position within the owning schema, once attached.
    pub fn ordinal(&self) -> Option<usize> {
        self.ordinal
    }

    pub fn schema_id(&self) -> Option<SchemaId> {
        self.owner
    }

    /// Checks `value` against this column.
    ///
    /// Returns the value as it should be stored, or `None` if the column does
    /// not accept it. `date` columns drop the time of day.
    pub fn validate(&self, value: &Value) -> Option<Value> {
        if value.is_null() {
            return self.nullable.then_some(Value::Null);
        }
        if self.kind != ValueKind::Any && self.kind != value.kind() {
            return None;
        }

        match value {
            Value::String(s) if self.sql_type.is_length_bounded() => {
                self.fits(s.chars().count()).then(|| value.clone())
            }
            Value::Bytes(b) if self.sql_type.is_length_bounded() => {
                self.fits(b.len()).then(|| value.clone())
            }
            Value::DateTime(dt) => match self.sql_type {
                SqlType::SmallDateTime => (*dt >= min_small_date_time()
                    && *dt <= max_small_date_time())
                .then(|| value.clone()),
                SqlType::Date => Some(Value::DateTime(dt.date().and_time(NaiveTime::MIN))),
                _ => Some(value.clone()),
            },
            _ => Some(value.clone()),
        }
    }

    fn fits(&self, len: usize) -> bool {
        let Some(length) = self.length else {
            return true;
        };
        let limit = if self.sql_type.is_unicode() {
            length / 2
        } else {
            length
        };
        len <= limit
    }

    /// A random value this column accepts. `null_probability` is ignored for
    /// non-nullable columns.
    pub fn random_value<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        null_probability: f64,
        profile: &GenerationProfile,
    ) -> Value {
        let null_probability = if self.nullable { null_probability } else { 0.0 };
        random::random_value(
            rng,
            self.sql_type,
            self.length,
            null_probability,
            self.fill,
            profile,
        )
    }
}

impl fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal {
            Some(ordinal) => write!(f, "Column #{ordinal}")?,
            None => write!(f, "Column")?,
        }
        write!(f, " \"{}\" {}", self.name, self.sql_type)?;
        if let Some(length) = self.length {
            write!(f, "[{length}]")?;
        }
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        if !self.default.is_null() {
            write!(f, " (Default Value='{}')", self.default)?;
        }
        Ok(())
    }
}
