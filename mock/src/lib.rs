//! # Turso mock record sets
//!
//! In-memory result sets for testing code that consumes database readers,
//! without a database.
//!
//! ## Getting Started
//!
//! Describe the columns with a [`RowSchema`], fill one or more [`RecordSet`]s
//! with [`Row`]s and hand them to a [`Cursor`], which reads them forward only,
//! one result set after the other:
//!
//! ```rust
//! # fn run() -> turso_mock::Result<()> {
//! use std::sync::Arc;
//! use turso_mock::{ColumnSchema, Cursor, RecordSet, Row, RowSchema, SqlType, Value};
//!
//! let schema = Arc::new(RowSchema::new(vec![
//!     ColumnSchema::new("ID", SqlType::Int)?,
//!     ColumnSchema::builder("Name", SqlType::NVarChar).length(100).build()?,
//! ])?);
//! let mut users = RecordSet::new(schema.clone());
//! users.add(Row::new(&schema, vec![Value::Int32(1), Value::from("alice")])?)?;
//!
//! let mut cursor = Cursor::from_record_sets([users]);
//! while cursor.read_row()? {
//!     println!("{} {}", cursor.get_int32(0)?, cursor.get_string(1)?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Rows can also be synthesized. A [`RandomGenerator`] seeded from a
//! [`GenerationProfile`] produces random schemas and record sets whose values
//! always satisfy their columns:
//!
//! ```rust
//! # fn run() -> turso_mock::Result<()> {
//! use turso_mock::{Cursor, RandomGenerator, RecordSetOptions};
//!
//! let mut generator = RandomGenerator::from_seed(42);
//! let set = generator.random_record_set(5, &RecordSetOptions::default().rows(10, 10), &[])?;
//! let mut cursor = Cursor::from_record_sets([set]);
//! assert_eq!(cursor.field_count()?, 5);
//! # Ok(())
//! # }
//! ```
//!
//! To make a consumer hit a server error mid-stream, add a failure row built
//! with [`Row::failure`], typically carrying a [`SqlException`].

mod column;
mod cursor;
mod decimal;
mod error;
mod failure;
mod profile;
mod random;
mod record_set;
mod row;
mod schema;
mod types;

pub use column::{max_small_date_time, min_small_date_time, ColumnBuilder, ColumnSchema};
pub use cursor::Cursor;
pub use decimal::{Decimal, MAX_SCALE};
pub use error::{Error, InjectedError, Result};
pub use failure::{SqlError, SqlErrorCollection, SqlException, DEFAULT_CLASS};
pub use profile::GenerationProfile;
pub use random::{
    random_column, random_row_schema, random_value, RandomGenerator, RecordSetOptions,
};
pub use record_set::RecordSet;
pub use row::{ColumnGenerator, DataRow, FailureRow, Row, RowOptions};
pub use schema::{RowSchema, SchemaId, FAILURE_COLUMN};
pub use types::{FromValue, SqlType, UdtValue, Value, ValueKind};

/// Assert that a type implements both Send and Sync at compile time.
macro_rules! assert_send_sync {
    ($($t:ty),+ $(,)?) => {
        #[cfg(test)]
        $(const _: () = {
            const fn _assert_send<T: ?Sized + Send>() {}
            const fn _assert_sync<T: ?Sized + Sync>() {}
            _assert_send::<$t>();
            _assert_sync::<$t>();
        };)+
    };
}

assert_send_sync!(RowSchema, Row, RecordSet, Cursor, SqlException);
