use std::sync::Arc;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use turso_mock::{
    ColumnSchema, Cursor, Error, GenerationProfile, RandomGenerator, RecordSet, RecordSetOptions,
    Row, RowOptions, RowSchema, SqlType, Value,
};

fn sql_type() -> impl Strategy<Value = SqlType> {
    proptest::sample::select(SqlType::SUPPORTED.to_vec())
}

proptest! {
    #[test]
    fn column_builds_iff_length_is_allowed(
        ty in sql_type(),
        length in proptest::option::of(1usize..200),
        fill in any::<bool>(),
    ) {
        let mut builder = ColumnSchema::builder("c", ty).fill(fill);
        if let Some(length) = length {
            builder = builder.length(length);
        }
        let result = builder.build();
        let conflicts = length.is_some() && ty.intrinsic_length().is_some();
        prop_assert_eq!(result.is_ok(), !conflicts);
    }

    #[test]
    fn generated_default_always_validates(
        ty in sql_type(),
        length in proptest::option::of(1usize..200),
        fill in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let length = length.filter(|_| ty.intrinsic_length().is_none() && ty.is_length_bounded());
        let mut builder = ColumnSchema::builder("c", ty).fill(fill).not_null();
        let effective_length = length.or(ty.intrinsic_length());
        if let Some(length) = length {
            builder = builder.length(length);
        }
        let fill = fill || ty.intrinsic_length().is_some();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let default = turso_mock::random_value(
            &mut rng,
            ty,
            effective_length,
            0.0,
            fill,
            &GenerationProfile::default(),
        );
        let column = builder.default_value(default).build();
        prop_assert!(column.is_ok(), "{:?}", column.err());
    }

    #[test]
    fn rows_without_randomize_hold_defaults(seed in any::<u64>(), columns in 1usize..12) {
        let mut generator = RandomGenerator::from_seed(seed);
        let schema = generator.row_schema(columns).unwrap();
        let row = generator.row(&schema, &RowOptions::default(), &[]).unwrap();
        for (i, column) in schema.iter().enumerate() {
            prop_assert_eq!(row.get_value(i).unwrap(), column.default_value());
        }
    }

    #[test]
    fn randomized_rows_without_nulls_are_never_null(seed in any::<u64>(), columns in 1usize..12) {
        let mut generator = RandomGenerator::from_seed(seed);
        let schema = generator.row_schema(columns).unwrap();
        let options = RowOptions { randomize: true, null_probability: 0.0, row_number: 1 };
        let row = generator.row(&schema, &options, &[]).unwrap();
        for i in 0..columns {
            prop_assert!(!row.is_null(i).unwrap());
        }
    }

    #[test]
    fn explicit_values_round_trip(
        id in any::<i64>(),
        flag in any::<bool>(),
        name in "[a-zA-Z ]{0,20}",
        data in proptest::collection::vec(any::<u8>(), 0..16),
    ) {
        let schema = Arc::new(RowSchema::new(vec![
            ColumnSchema::new("id", SqlType::BigInt).unwrap(),
            ColumnSchema::new("flag", SqlType::Bit).unwrap(),
            ColumnSchema::builder("name", SqlType::VarChar).length(20).build().unwrap(),
            ColumnSchema::new("data", SqlType::VarBinary).unwrap(),
        ]).unwrap());
        let row = Row::new(&schema, vec![
            Value::Int64(id),
            Value::Boolean(flag),
            Value::from(name.as_str()),
            Value::Bytes(data.clone()),
        ]).unwrap();

        prop_assert_eq!(row.get_int64(0).unwrap(), id);
        prop_assert_eq!(row.get_boolean(1).unwrap(), flag);
        prop_assert_eq!(row.get_string(2).unwrap(), name);
        prop_assert_eq!(row.get::<Vec<u8>>(3).unwrap(), data);
    }

    #[test]
    fn cursor_reads_every_row_once(sizes in proptest::collection::vec(0usize..6, 0..5)) {
        let schema = Arc::new(RowSchema::new(vec![ColumnSchema::new("n", SqlType::Int).unwrap()]).unwrap());
        let sets = sizes.iter().map(|&size| {
            let rows = (0..size).map(|i| Row::new(&schema, vec![Value::Int32(i as i32)]).unwrap());
            RecordSet::with_rows(schema.clone(), rows).unwrap()
        });
        let mut cursor = Cursor::from_record_sets(sets);

        let mut seen = Vec::new();
        loop {
            let mut n = 0;
            while cursor.read_row().unwrap() {
                prop_assert_eq!(cursor.get_int32(0).unwrap(), n as i32);
                n += 1;
            }
            seen.push(n);
            if !cursor.advance_result_set().unwrap() {
                break;
            }
        }
        // an empty cursor still reports one (empty) pass
        let expected = if sizes.is_empty() { vec![0] } else { sizes.clone() };
        prop_assert_eq!(seen, expected);
        prop_assert!(matches!(cursor.get_value(0), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn record_set_row_count_within_bounds(seed in any::<u64>(), min in 0usize..10, extra in 0usize..10) {
        let mut generator = RandomGenerator::from_seed(seed);
        let max = min + extra;
        let set = generator
            .random_record_set(2, &RecordSetOptions::default().rows(min, max), &[])
            .unwrap();
        if min == max {
            prop_assert_eq!(set.len(), min);
        } else {
            prop_assert!(set.len() >= min && set.len() < max);
        }
    }
}
