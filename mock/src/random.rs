//! Random values, schemas, rows and record sets.
//!
//! Everything here produces data that passes the validation of the column it
//! is generated for: lengths respect the declared length and fill flag, dates
//! stay inside the type's range, and non-nullable columns never get a null.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::column::{max_small_date_time, min_small_date_time, ColumnSchema};
use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::profile::GenerationProfile;
use crate::record_set::RecordSet;
use crate::row::{ColumnGenerator, Row, RowOptions};
use crate::schema::RowSchema;
use crate::types::{SqlType, UdtValue, Value};

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ";

const NAME_PREFIXES: &[&str] = &[
    "amber", "brisk", "calm", "dusty", "eager", "fuzzy", "gentle", "hollow", "icy", "jolly",
];
const NAME_SUFFIXES: &[&str] = &[
    "otter", "maple", "comet", "harbor", "falcon", "meadow", "quartz", "lantern", "pebble", "river",
];

/// Types a variant column draws its values from.
const VARIANT_TYPES: &[SqlType] = &[
    SqlType::BigInt,
    SqlType::Bit,
    SqlType::Int,
    SqlType::SmallInt,
    SqlType::TinyInt,
    SqlType::Float,
    SqlType::Real,
    SqlType::Decimal,
    SqlType::Money,
    SqlType::NVarChar,
    SqlType::VarBinary,
    SqlType::UniqueIdentifier,
    SqlType::DateTime,
];

fn pick<'a, T, R: Rng + ?Sized>(choices: &'a [T], rng: &mut R) -> &'a T {
    let index = rng.random_range(0..choices.len());
    &choices[index]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// A random value of `sql_type`.
///
/// `length` is the declared length (bytes for unicode types). With `fill` the
/// value has exactly that length, otherwise a length in `[0, length]`. Variable
/// length types without a declared length draw up to
/// [`GenerationProfile::max_unbounded_length`].
pub fn random_value<R: Rng + ?Sized>(
    rng: &mut R,
    sql_type: SqlType,
    length: Option<usize>,
    null_probability: f64,
    fill: bool,
    profile: &GenerationProfile,
) -> Value {
    if null_probability > 0.0 && rng.random_bool(null_probability.min(1.0)) {
        return Value::Null;
    }

    let limit = length.map(|l| if sql_type.is_unicode() { l / 2 } else { l });
    let random_len = |rng: &mut R| match limit {
        Some(limit) if fill => limit,
        Some(limit) => rng.random_range(0..=limit),
        None => rng.random_range(0..=profile.max_unbounded_length),
    };

    match sql_type {
        SqlType::BigInt => Value::Int64(rng.random()),
        SqlType::Int => Value::Int32(rng.random()),
        SqlType::SmallInt => Value::Int16(rng.random()),
        SqlType::TinyInt => Value::Byte(rng.random()),
        SqlType::Bit => Value::Boolean(rng.random()),
        SqlType::Float => Value::Double(rng.random_range(-1e10..1e10)),
        SqlType::Real => Value::Float(rng.random_range(-1e6f32..1e6f32)),
        SqlType::Decimal => {
            let mantissa = rng.random_range(-999_999_999_999_999_999i128..=999_999_999_999_999_999);
            let scale = rng.random_range(0..=8u8);
            Value::Decimal(Decimal::new(mantissa, scale).unwrap_or(Decimal::ZERO))
        }
        SqlType::Money => {
            let mantissa = rng.random::<i64>() as i128;
            Value::Decimal(Decimal::new(mantissa, 4).unwrap_or(Decimal::ZERO))
        }
        SqlType::SmallMoney => {
            let mantissa = rng.random::<i32>() as i128;
            Value::Decimal(Decimal::new(mantissa, 4).unwrap_or(Decimal::ZERO))
        }
        SqlType::Char | SqlType::VarChar | SqlType::Text => {
            let len = random_len(rng);
            Value::String(random_ascii(rng, len))
        }
        SqlType::NChar | SqlType::NVarChar | SqlType::NText => {
            let len = random_len(rng);
            Value::String(random_unicode(rng, len))
        }
        SqlType::Xml => {
            let len = random_len(rng);
            Value::String(random_xml(rng, len))
        }
        SqlType::Binary | SqlType::VarBinary | SqlType::Image | SqlType::Timestamp => {
            let len = random_len(rng);
            let mut bytes = vec![0u8; len];
            rng.fill_bytes(&mut bytes);
            Value::Bytes(bytes)
        }
        SqlType::UniqueIdentifier => Value::Guid(random_guid(rng)),
        SqlType::DateTime => {
            // datetime has a resolution of roughly a millisecond
            let nanos = rng.random_range(0..1000u32) * 1_000_000;
            Value::DateTime(random_date_time(
                rng,
                date(1753, 1, 1),
                date(9999, 12, 31),
                nanos,
            ))
        }
        SqlType::DateTime2 => {
            let nanos = rng.random_range(0..10_000_000u32) * 100;
            Value::DateTime(random_date_time(
                rng,
                date(1, 1, 1),
                date(9999, 12, 31),
                nanos,
            ))
        }
        SqlType::SmallDateTime => {
            let min = min_small_date_time();
            let minutes = (max_small_date_time() - min).num_minutes();
            Value::DateTime(min + TimeDelta::minutes(rng.random_range(0..=minutes)))
        }
        SqlType::Date => {
            let dt = random_date_time(rng, date(1, 1, 1), date(9999, 12, 31), 0);
            Value::DateTime(dt.date().and_time(NaiveTime::MIN))
        }
        SqlType::Time => {
            let nanos = rng.random_range(0..10_000_000u32) * 100;
            Value::Time(random_time(rng, nanos))
        }
        SqlType::DateTimeOffset => {
            let nanos = rng.random_range(0..10_000_000u32) * 100;
            let utc = random_date_time(rng, date(1, 1, 2), date(9999, 12, 30), nanos);
            let minutes = rng.random_range(-840..=840);
            let offset = FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix());
            Value::DateTimeOffset(DateTime::from_naive_utc_and_offset(utc, offset))
        }
        SqlType::Variant => {
            let inner = *pick(VARIANT_TYPES, rng);
            random_value(rng, inner, None, 0.0, false, profile)
        }
        SqlType::Udt => Value::Udt(random_udt(rng)),
        SqlType::Structured => Value::Null,
    }
}

fn random_ascii<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| *pick(ALPHANUMERIC, rng) as char)
        .collect()
}

fn random_unicode<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| {
            // printable basic multilingual plane, below the surrogate block
            let code = rng.random_range(0x20u32..0xD800);
            char::from_u32(code).unwrap_or('?')
        })
        .collect()
}

/// An XML fragment of exactly `len` characters when it fits a `<v></v>` wrapper.
fn random_xml<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    const OPEN: &str = "<v>";
    const CLOSE: &str = "</v>";
    if len < OPEN.len() + CLOSE.len() {
        return random_ascii(rng, len);
    }
    let body = random_ascii(rng, len - OPEN.len() - CLOSE.len());
    format!("{OPEN}{body}{CLOSE}")
}

fn random_guid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

fn random_time<R: Rng + ?Sized>(rng: &mut R, nanos: u32) -> NaiveTime {
    let secs = rng.random_range(0..86_400u32);
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).unwrap_or(NaiveTime::MIN)
}

fn random_date_time<R: Rng + ?Sized>(
    rng: &mut R,
    min: NaiveDate,
    max: NaiveDate,
    nanos: u32,
) -> NaiveDateTime {
    let days = (max - min).num_days();
    let date = min + TimeDelta::days(rng.random_range(0..=days));
    date.and_time(random_time(rng, nanos))
}

fn random_udt<R: Rng + ?Sized>(rng: &mut R) -> UdtValue {
    match rng.random_range(0..3) {
        0 => {
            let lon = rng.random_range(-180.0..180.0f64);
            let lat = rng.random_range(-90.0..90.0f64);
            UdtValue::Geography(format!("POINT ({lon:.6} {lat:.6})"))
        }
        1 => {
            let x = rng.random_range(-1e6..1e6f64);
            let y = rng.random_range(-1e6..1e6f64);
            UdtValue::Geometry(format!("POINT ({x:.3} {y:.3})"))
        }
        _ => {
            let depth = rng.random_range(0..4);
            let mut path = String::from("/");
            for _ in 0..depth {
                path.push_str(&format!("{}/", rng.random_range(1..100)));
            }
            UdtValue::HierarchyId(path)
        }
    }
}

/// A random column that is valid by construction. Fails with
/// [`Error::Profile`] when `profile` does not validate.
pub fn random_column<R: Rng + ?Sized>(
    rng: &mut R,
    name: impl Into<String>,
    profile: &GenerationProfile,
) -> Result<ColumnSchema> {
    profile.validate()?;
    let sql_type = *pick(&SqlType::SUPPORTED, rng);
    let mut builder = ColumnSchema::builder(name, sql_type);

    let mut length = None;
    let mut fill = false;
    if sql_type.is_length_bounded() && sql_type.intrinsic_length().is_none() && rng.random_bool(0.5)
    {
        let declared = rng.random_range(1..=profile.max_declared_length);
        fill = rng.random_bool(profile.fill_probability);
        builder = builder.length(declared).fill(fill);
        length = Some(declared);
    }
    let fill = fill || sql_type.intrinsic_length().is_some();
    let length = length.or(sql_type.intrinsic_length());

    if rng.random_bool(profile.nullable_probability) {
        builder = builder.nullable(true);
    } else {
        let default = random_value(rng, sql_type, length, 0.0, fill, profile);
        builder = builder.not_null().default_value(default);
    }
    builder.build()
}

/// A schema of `column_count` random columns; `0` picks a count from the profile.
pub fn random_row_schema<R: Rng + ?Sized>(
    rng: &mut R,
    column_count: usize,
    profile: &GenerationProfile,
) -> Result<RowSchema> {
    profile.validate()?;
    let count = if column_count < 1 {
        rng.random_range(profile.min_columns..=profile.max_columns)
    } else {
        column_count
    };
    let columns = (0..count)
        .map(|i| {
            let name = format!(
                "{}_{}_{i}",
                pick(NAME_PREFIXES, rng),
                pick(NAME_SUFFIXES, rng)
            );
            random_column(rng, name, profile)
        })
        .collect::<Result<Vec<_>>>()?;
    RowSchema::new(columns)
}

/// Row count and null settings for a random record set.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSetOptions {
    pub min_rows: usize,
    /// Exclusive unless equal to `min_rows`.
    pub max_rows: usize,
    pub null_probability: f64,
}

impl Default for RecordSetOptions {
    fn default() -> Self {
        Self {
            min_rows: 0,
            max_rows: 1000,
            null_probability: 0.1,
        }
    }
}

impl RecordSetOptions {
    pub fn rows(mut self, min_rows: usize, max_rows: usize) -> Self {
        self.min_rows = min_rows;
        self.max_rows = max_rows;
        self
    }

    pub fn null_probability(mut self, null_probability: f64) -> Self {
        self.null_probability = null_probability;
        self
    }
}

/// Seeded source of random schemas, rows and record sets.
///
/// Two generators built from the same seed and profile produce the same data.
pub struct RandomGenerator {
    rng: ChaCha8Rng,
    seed: u64,
    profile: GenerationProfile,
}

impl RandomGenerator {
    pub fn new(profile: GenerationProfile) -> Result<Self> {
        profile.validate()?;
        let seed = profile.seed.unwrap_or_else(|| rand::rng().random());
        tracing::debug!("random generator seed: {seed}");
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            profile,
        })
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            profile: GenerationProfile::default().with_seed(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn profile(&self) -> &GenerationProfile {
        &self.profile
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn value(
        &mut self,
        sql_type: SqlType,
        length: Option<usize>,
        null_probability: f64,
        fill: bool,
    ) -> Value {
        random_value(
            &mut self.rng,
            sql_type,
            length,
            null_probability,
            fill,
            &self.profile,
        )
    }

    pub fn column_value(&mut self, column: &ColumnSchema, null_probability: f64) -> Value {
        column.random_value(&mut self.rng, null_probability, &self.profile)
    }

    pub fn row_schema(&mut self, column_count: usize) -> Result<Arc<RowSchema>> {
        random_row_schema(&mut self.rng, column_count, &self.profile).map(Arc::new)
    }

    pub fn row(
        &mut self,
        schema: &Arc<RowSchema>,
        options: &RowOptions,
        generators: &[Option<ColumnGenerator>],
    ) -> Result<Row> {
        Row::generate(schema, options, generators, &mut self.rng, &self.profile)
    }

    /// A record set of randomized rows, numbered from 1.
    pub fn record_set(
        &mut self,
        schema: &Arc<RowSchema>,
        options: &RecordSetOptions,
        generators: &[Option<ColumnGenerator>],
    ) -> Result<RecordSet> {
        if options.min_rows > options.max_rows {
            return Err(Error::Range(format!(
                "The minimum number of rows '{}' cannot exceed the maximum number of rows '{}'.",
                options.min_rows, options.max_rows
            )));
        }
        let rows = if options.min_rows == options.max_rows {
            options.min_rows
        } else {
            self.rng.random_range(options.min_rows..options.max_rows)
        };
        tracing::debug!("generating random record set with {rows} rows");

        let mut set = RecordSet::new(schema.clone());
        for r in 0..rows {
            let row_options = RowOptions {
                randomize: true,
                null_probability: options.null_probability,
                row_number: r + 1,
            };
            set.add(self.row(schema, &row_options, generators)?)?;
        }
        Ok(set)
    }

    /// A record set over a fresh random schema of `column_count` columns.
    pub fn random_record_set(
        &mut self,
        column_count: usize,
        options: &RecordSetOptions,
        generators: &[Option<ColumnGenerator>],
    ) -> Result<RecordSet> {
        let schema = self.row_schema(column_count)?;
        self.record_set(&schema, options, generators)
    }
}
