use std::io::Write;
use std::sync::Arc;

use turso_mock::{
    ColumnGenerator, ColumnSchema, Cursor, Error, GenerationProfile, RandomGenerator,
    RecordSetOptions, Row, RowOptions, RowSchema, SqlType, Value,
};

#[test]
fn test_same_seed_same_data() {
    let collect = |seed: u64| {
        let mut generator = RandomGenerator::from_seed(seed);
        let set = generator
            .random_record_set(6, &RecordSetOptions::default().rows(20, 20), &[])
            .unwrap();
        set.iter()
            .map(|row| row.values().unwrap().to_vec())
            .collect::<Vec<_>>()
    };
    assert_eq!(collect(1234), collect(1234));
    assert_ne!(collect(1234), collect(4321));
}

#[test]
fn test_row_numbers_start_at_one() {
    let mut generator = RandomGenerator::from_seed(8);
    let schema = generator.row_schema(2).unwrap();
    let generators: Vec<Option<ColumnGenerator>> = vec![None];
    let set = generator
        .record_set(&schema, &RecordSetOptions::default().rows(3, 3), &generators)
        .unwrap();
    assert_eq!(set.len(), 3);

    // variant columns accept whatever the generator returns
    let schema = Arc::new(
        RowSchema::new(vec![ColumnSchema::new("n", SqlType::Variant).unwrap()]).unwrap(),
    );
    let echo: ColumnGenerator = Box::new(|n| Value::Int64(n as i64));
    let generators = vec![Some(echo)];
    let set = generator
        .record_set(&schema, &RecordSetOptions::default().rows(4, 4), &generators)
        .unwrap();
    let numbers: Vec<i64> = set.iter().map(|r| r.get_int64(0).unwrap()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[test]
fn test_defaults_when_not_randomized() {
    let mut generator = RandomGenerator::from_seed(77);
    for _ in 0..10 {
        let schema = generator.row_schema(0).unwrap();
        let row = generator.row(&schema, &RowOptions::default(), &[]).unwrap();
        for (column, value) in schema.iter().zip(row.values().unwrap()) {
            assert_eq!(column.default_value(), value);
        }
    }
}

#[test]
fn test_never_null_without_null_probability() {
    let mut generator = RandomGenerator::from_seed(99);
    let options = RowOptions {
        randomize: true,
        null_probability: 0.0,
        row_number: 1,
    };
    for _ in 0..10 {
        let schema = generator.row_schema(0).unwrap();
        for _ in 0..5 {
            let row = generator.row(&schema, &options, &[]).unwrap();
            assert!(row.values().unwrap().iter().all(|v| !v.is_null()));
        }
    }
}

#[test]
fn test_random_sets_read_through_a_cursor() {
    let mut generator = RandomGenerator::from_seed(5);
    let options = RecordSetOptions::default().rows(0, 10);
    let sets = (0..3)
        .map(|_| generator.random_record_set(0, &options, &[]))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let expected: Vec<usize> = sets.iter().map(|s| s.len()).collect();

    let mut cursor = Cursor::from_record_sets(sets);
    let mut counted = Vec::new();
    loop {
        let mut n = 0;
        while cursor.read_row().unwrap() {
            let mut values = vec![Value::Null; cursor.field_count().unwrap()];
            cursor.get_values(&mut values).unwrap();
            n += 1;
        }
        counted.push(n);
        if !cursor.advance_result_set().unwrap() {
            break;
        }
    }
    assert_eq!(counted, expected);
}

#[test]
fn test_profile_from_file_drives_generation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"seed": 3, "min_columns": 2, "max_columns": 3, "nullable_probability": 1.0}}"#
    )
    .unwrap();
    let profile = GenerationProfile::from_file(file.path()).unwrap();
    let mut generator = RandomGenerator::new(profile).unwrap();
    assert_eq!(generator.seed(), 3);

    let schema = generator.row_schema(0).unwrap();
    assert!((2..=3).contains(&schema.field_count()));
    assert!(schema.iter().all(|c| c.is_nullable()));
}

#[test]
fn test_missing_profile_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = GenerationProfile::from_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, Error::Profile(_)));
}

#[test]
fn test_failure_rows_in_random_sets() {
    let mut generator = RandomGenerator::from_seed(21);
    let mut set = generator
        .random_record_set(3, &RecordSetOptions::default().rows(2, 2), &[])
        .unwrap();
    set.add(Row::failure(crate::common::timeout())).unwrap();
    assert_eq!(set.len(), 3);
    assert!(set.get(2).unwrap().schema().is_failure());
}
