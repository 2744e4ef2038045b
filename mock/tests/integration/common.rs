use std::sync::Arc;

use turso_mock::{
    ColumnSchema, Decimal, RecordSet, Row, RowSchema, SqlError, SqlException, SqlType, Value,
};

/// The users table used across the cursor tests.
pub(crate) fn users_schema() -> Arc<RowSchema> {
    Arc::new(
        RowSchema::new(vec![
            ColumnSchema::new("ID", SqlType::Int).unwrap(),
            ColumnSchema::builder("Name", SqlType::NVarChar)
                .length(100)
                .not_null()
                .default_value("nobody")
                .build()
                .unwrap(),
            ColumnSchema::builder("Balance", SqlType::Money)
                .not_null()
                .default_value(Decimal::ZERO)
                .build()
                .unwrap(),
            ColumnSchema::new("Joined", SqlType::Date).unwrap(),
        ])
        .unwrap(),
    )
}

pub(crate) fn orders_schema() -> Arc<RowSchema> {
    Arc::new(
        RowSchema::new(vec![
            ColumnSchema::new("OrderID", SqlType::UniqueIdentifier).unwrap(),
            ColumnSchema::new("Total", SqlType::Float).unwrap(),
        ])
        .unwrap(),
    )
}

pub(crate) fn record_set(schema: &Arc<RowSchema>, rows: usize) -> RecordSet {
    let rows = (0..rows).map(|i| Row::new(schema, vec![Value::Int32(i as i32 + 1)]).unwrap());
    RecordSet::with_rows(schema.clone(), rows).unwrap()
}

pub(crate) fn timeout() -> SqlException {
    SqlException::new(
        SqlError::new(1000, 80)
            .with_server("MyFakeServer")
            .with_message("Connection Timeout.")
            .with_procedure("spMySproc")
            .with_line_number(54),
    )
    .with_server_version("9.0.0.0")
}
