use std::sync::Arc;

use chrono::NaiveDate;
use turso_mock::{Cursor, Error, RecordSet, Row, SqlException, Value};

use crate::common::{orders_schema, record_set, timeout, users_schema};

fn ids(cursor: &mut Cursor) -> Vec<i32> {
    let mut ids = Vec::new();
    while cursor.read_row().unwrap() {
        ids.push(cursor.get_int32(0).unwrap());
    }
    ids
}

#[test]
fn test_empty_cursor() {
    let mut cursor = Cursor::new();
    assert!(!cursor.read_row().unwrap());
    assert!(!cursor.advance_result_set().unwrap());
    assert!(matches!(cursor.get_value(0), Err(Error::InvalidOperation(_))));
    assert!(matches!(
        cursor.value_by_name("ID"),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn test_two_record_sets() {
    let users = users_schema();
    let mut cursor = Cursor::from_record_sets([record_set(&users, 3), record_set(&users, 2)]);

    assert!(cursor.advance_result_set().unwrap());
    assert!(cursor.read_row().unwrap());
    assert!(cursor.read_row().unwrap());
    assert!(cursor.read_row().unwrap());
    assert_eq!(cursor.get_int32(0).unwrap(), 3);
    assert!(!cursor.read_row().unwrap());
    assert!(!cursor.read_row().unwrap());

    assert!(cursor.advance_result_set().unwrap());
    assert_eq!(ids(&mut cursor), vec![1, 2]);
    assert!(!cursor.advance_result_set().unwrap());
}

#[test]
fn test_result_set_loop() {
    let users = users_schema();
    let orders = orders_schema();
    let order_rows = (0..4).map(|_| Row::with_defaults(&orders));
    let mut cursor = Cursor::from_record_sets([
        record_set(&users, 2),
        RecordSet::with_rows(orders.clone(), order_rows).unwrap(),
        record_set(&users, 1),
    ]);

    let mut shapes = Vec::new();
    loop {
        let mut rows = 0;
        while cursor.read_row().unwrap() {
            rows += 1;
        }
        shapes.push((cursor.field_count().unwrap(), rows));
        if !cursor.advance_result_set().unwrap() {
            break;
        }
    }
    assert_eq!(shapes, vec![(4, 2), (2, 4), (4, 1)]);
}

#[test]
fn test_mismatched_schema_is_rejected() {
    let mut set = record_set(&users_schema(), 1);
    let err = set.add(Row::with_defaults(&orders_schema())).unwrap_err();
    assert!(matches!(err, Error::Argument(_)));
    // a schema with the same columns is still a different schema
    let err = set.add(Row::with_defaults(&users_schema())).unwrap_err();
    assert!(matches!(err, Error::Argument(_)));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_close_then_reset_replays() {
    let users = users_schema();
    let mut cursor = Cursor::from_record_sets([record_set(&users, 3), record_set(&users, 2)]);

    let mut first = Vec::new();
    loop {
        first.push(ids(&mut cursor));
        if !cursor.advance_result_set().unwrap() {
            break;
        }
    }

    cursor.close();
    assert!(matches!(cursor.read_row(), Err(Error::InvalidState(_))));
    assert!(matches!(
        cursor.advance_result_set(),
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        cursor.add_record_set(record_set(&users, 1)),
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(cursor.get_name(0), Err(Error::InvalidState(_))));

    cursor.reset();
    let mut second = Vec::new();
    loop {
        second.push(ids(&mut cursor));
        if !cursor.advance_result_set().unwrap() {
            break;
        }
    }
    assert_eq!(first, vec![vec![1, 2, 3], vec![1, 2]]);
    assert_eq!(first, second);
}

#[test]
fn test_failure_row_mid_stream() {
    let users = users_schema();
    let mut set = record_set(&users, 2);
    set.add(Row::failure(timeout())).unwrap();
    set.add(Row::new(&users, vec![Value::Int32(9)]).unwrap())
        .unwrap();
    let mut cursor = Cursor::from_record_sets([set]);

    assert_eq!(ids_until_error(&mut cursor), (vec![1, 2], 1000));
    // the cursor keeps going past the failure
    assert!(cursor.read_row().unwrap());
    assert_eq!(cursor.get_int32(0).unwrap(), 9);
}

fn ids_until_error(cursor: &mut Cursor) -> (Vec<i32>, i32) {
    let mut ids = Vec::new();
    while cursor.read_row().unwrap() {
        match cursor.get_int32(0) {
            Ok(id) => ids.push(id),
            Err(err) => {
                let exception = err
                    .injected()
                    .and_then(|e| e.downcast_ref::<SqlException>())
                    .unwrap();
                return (ids, exception.number());
            }
        }
    }
    panic!("no failure row was read");
}

#[test]
fn test_failure_row_accessors() {
    let row = Row::failure(timeout());
    let Row::Failure(failure) = &row else {
        panic!("expected a failure row")
    };
    let errors = vec![
        row.field_count().unwrap_err(),
        row.get_value(0).unwrap_err(),
        row.value_by_name("Exception").unwrap_err(),
        row.get_ordinal("Exception").unwrap_err(),
        row.get_name(0).unwrap_err(),
        row.get_data_type_name(0).unwrap_err(),
        row.get_field_type(0).unwrap_err(),
        row.get_string(0).unwrap_err(),
        row.get_bytes(0, 0, None, 0, 0).unwrap_err(),
        row.get_values(&mut []).unwrap_err(),
    ];
    for err in errors {
        assert!(Arc::ptr_eq(err.injected().unwrap(), failure.error()));
        assert_eq!(err.to_string(), "Connection Timeout.");
    }
}

#[test]
fn test_typed_getters_round_trip() {
    let users = users_schema();
    let joined = NaiveDate::from_ymd_opt(2020, 2, 29)
        .unwrap()
        .and_hms_opt(13, 30, 0)
        .unwrap();
    let balance = turso_mock::Decimal::new(125_050, 4).unwrap();
    let row = Row::new(
        &users,
        vec![
            Value::Int32(7),
            Value::from("Zoë"),
            Value::Decimal(balance),
            Value::DateTime(joined),
        ],
    )
    .unwrap();
    let mut cursor = Cursor::from_record_sets([RecordSet::with_rows(users.clone(), [row]).unwrap()]);
    assert!(cursor.read_row().unwrap());

    assert_eq!(cursor.get_int32(0).unwrap(), 7);
    assert_eq!(cursor.get_string(1).unwrap(), "Zoë");
    assert_eq!(cursor.get_decimal(2).unwrap(), balance);
    assert_eq!(
        cursor.get_date_time(3).unwrap(),
        joined.date().and_hms_opt(0, 0, 0).unwrap()
    );
    assert_eq!(cursor.get::<Option<i32>>(0).unwrap(), Some(7));
    assert_eq!(cursor.value_by_name("name").unwrap(), &Value::from("Zoë"));
    assert!(matches!(cursor.get_int64(0), Err(Error::Cast { .. })));
}
