//! DuckDB client using the `duckdb` crate (bundled engine).

use crate::database::connection::{ConnectionTarget, validate_db_path};
use crate::database::result::{CellValue, Column};
use crate::database::traits::{DatabaseClient, TableQuery};
use crate::error::{DatabaseError, DbResult};
use crate::render::TableWriter;
use ::duckdb::arrow::datatypes::DataType;
use ::duckdb::core::{LogicalTypeHandle, LogicalTypeId};
use ::duckdb::types::{TimeUnit, Value};
use ::duckdb::{AccessMode, Config, Connection, Statement};
use chrono::{DateTime, NaiveDate, NaiveTime};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A single DuckDB connection.
///
/// The connection lives behind a mutex so `close` waits for any query
/// still running on it.
pub struct DuckDbClient {
    db_path: String,
    read_only: bool,
    conn: Mutex<Option<Connection>>,
}

impl DuckDbClient {
    fn connect(target: &ConnectionTarget) -> ::duckdb::Result<Connection> {
        if target.is_memory() {
            return Connection::open_in_memory();
        }
        if target.read_only() {
            let config = Config::default().access_mode(AccessMode::ReadOnly)?;
            return Connection::open_with_flags(target.path(), config);
        }
        Connection::open(target.path())
    }

    fn close_connection(conn: Connection) {
        if let Err((_, e)) = conn.close() {
            warn!("Error closing DuckDB connection: {}", e);
        }
    }

    fn describe_columns(stmt: &Statement<'_>) -> Vec<Column> {
        stmt.column_names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let data_type = logical_type_name(&stmt.column_logical_type(i))
                    .unwrap_or_else(|| type_name(&stmt.column_type(i)));
                Column::new(name, data_type)
            })
            .collect()
    }
}

impl DatabaseClient for DuckDbClient {
    fn backend(&self) -> &'static str {
        "duckdb"
    }

    fn open(path: &str, read_only: bool) -> DbResult<Self> {
        validate_db_path(path)?;
        let target = ConnectionTarget::new(path, read_only);
        info!("Opening DuckDB database: {}", target);

        let conn = Self::connect(&target).map_err(|e| DatabaseError::OpenFailed(e.to_string()))?;

        if let Err(e) = conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0)) {
            Self::close_connection(conn);
            return Err(DatabaseError::ConnectionFailed(e.to_string()));
        }

        Ok(Self {
            db_path: path.to_string(),
            read_only,
            conn: Mutex::new(Some(conn)),
        })
    }

    fn db_path(&self) -> &str {
        &self.db_path
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn is_open(&self) -> bool {
        self.conn.lock().is_some()
    }

    fn close(&self) {
        if let Some(conn) = self.conn.lock().take() {
            debug!("Closing DuckDB database: {}", self.db_path);
            Self::close_connection(conn);
        }
    }
}

impl TableQuery for DuckDbClient {
    fn query(&self, sql: &str) -> DbResult<String> {
        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or(DatabaseError::NotEstablished)?;

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let columns = rows
            .as_ref()
            .map(Self::describe_columns)
            .unwrap_or_default();
        let mut table = TableWriter::new(&columns);

        while let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::ResultFailed(e.to_string()))?
        {
            let cells = (0..columns.len())
                .map(|i| row.get::<_, Value>(i).map(cell_from_value))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DatabaseError::ResultFailed(e.to_string()))?;
            table.push_row(cells);
        }

        debug!("DuckDB query returned {} rows", table.row_count());
        Ok(table.finish())
    }
}

impl Drop for DuckDbClient {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.get_mut().take() {
            Self::close_connection(conn);
        }
    }
}

/// The type name DuckDB itself reports, e.g. `HUGEINT`, `UUID` or
/// `MAP(VARCHAR, INTEGER)`. `None` when a type (or a nested child) has no
/// fixed name here, such as fixed-size arrays.
fn logical_type_name(logical: &LogicalTypeHandle) -> Option<String> {
    if let Some(alias) = logical.get_alias() {
        return Some(alias.to_uppercase());
    }

    let name = match logical.id() {
        LogicalTypeId::Boolean => "BOOLEAN",
        LogicalTypeId::Tinyint => "TINYINT",
        LogicalTypeId::Smallint => "SMALLINT",
        LogicalTypeId::Integer => "INTEGER",
        LogicalTypeId::Bigint => "BIGINT",
        LogicalTypeId::Hugeint => "HUGEINT",
        LogicalTypeId::UTinyint => "UTINYINT",
        LogicalTypeId::USmallint => "USMALLINT",
        LogicalTypeId::UInteger => "UINTEGER",
        LogicalTypeId::UBigint => "UBIGINT",
        LogicalTypeId::UHugeint => "UHUGEINT",
        LogicalTypeId::Float => "FLOAT",
        LogicalTypeId::Double => "DOUBLE",
        LogicalTypeId::Varchar => "VARCHAR",
        LogicalTypeId::Blob => "BLOB",
        LogicalTypeId::Bit => "BIT",
        LogicalTypeId::Bignum => "BIGNUM",
        LogicalTypeId::Uuid => "UUID",
        LogicalTypeId::Enum => "ENUM",
        LogicalTypeId::Date => "DATE",
        LogicalTypeId::Time => "TIME",
        LogicalTypeId::TimeNs => "TIME_NS",
        LogicalTypeId::TimeTZ => "TIME WITH TIME ZONE",
        LogicalTypeId::Timestamp => "TIMESTAMP",
        LogicalTypeId::TimestampS => "TIMESTAMP_S",
        LogicalTypeId::TimestampMs => "TIMESTAMP_MS",
        LogicalTypeId::TimestampNs => "TIMESTAMP_NS",
        LogicalTypeId::TimestampTZ => "TIMESTAMP WITH TIME ZONE",
        LogicalTypeId::Interval => "INTERVAL",
        LogicalTypeId::Geometry => "GEOMETRY",
        LogicalTypeId::Variant => "VARIANT",
        LogicalTypeId::SqlNull => "NULL",
        LogicalTypeId::Decimal => {
            return Some(format!(
                "DECIMAL({},{})",
                logical.decimal_width(),
                logical.decimal_scale()
            ));
        }
        LogicalTypeId::List => return Some(format!("{}[]", logical_type_name(&logical.child(0))?)),
        LogicalTypeId::Map => {
            return Some(format!(
                "MAP({}, {})",
                logical_type_name(&logical.child(0))?,
                logical_type_name(&logical.child(1))?
            ));
        }
        LogicalTypeId::Struct | LogicalTypeId::Union => {
            let members = (0..logical.num_children())
                .map(|i| {
                    logical_type_name(&logical.child(i))
                        .map(|ty| format!("{} {}", logical.child_name(i), ty))
                })
                .collect::<Option<Vec<_>>>()?;
            let kind = if logical.id() == LogicalTypeId::Struct { "STRUCT" } else { "UNION" };
            return Some(format!("{kind}({})", members.join(", ")));
        }
        _ => return None,
    };
    Some(name.to_string())
}

/// DuckDB's SQL name for an Arrow column type. Used when the logical type
/// has no name of its own.
fn type_name(data_type: &DataType) -> String {
    match data_type {
        DataType::Null => "NULL".into(),
        DataType::Boolean => "BOOLEAN".into(),
        DataType::Int8 => "TINYINT".into(),
        DataType::Int16 => "SMALLINT".into(),
        DataType::Int32 => "INTEGER".into(),
        DataType::Int64 => "BIGINT".into(),
        DataType::UInt8 => "UTINYINT".into(),
        DataType::UInt16 => "USMALLINT".into(),
        DataType::UInt32 => "UINTEGER".into(),
        DataType::UInt64 => "UBIGINT".into(),
        DataType::Float16 | DataType::Float32 => "FLOAT".into(),
        DataType::Float64 => "DOUBLE".into(),
        DataType::Decimal128(p, s) | DataType::Decimal256(p, s) => format!("DECIMAL({p},{s})"),
        DataType::Utf8 | DataType::LargeUtf8 => "VARCHAR".into(),
        DataType::Binary | DataType::LargeBinary | DataType::FixedSizeBinary(_) => "BLOB".into(),
        DataType::Date32 | DataType::Date64 => "DATE".into(),
        DataType::Time32(_) | DataType::Time64(_) => "TIME".into(),
        DataType::Timestamp(_, None) => "TIMESTAMP".into(),
        DataType::Timestamp(_, Some(_)) => "TIMESTAMP WITH TIME ZONE".into(),
        DataType::Interval(_) | DataType::Duration(_) => "INTERVAL".into(),
        DataType::List(field) | DataType::LargeList(field) => {
            format!("{}[]", type_name(field.data_type()))
        }
        DataType::FixedSizeList(field, len) => format!("{}[{len}]", type_name(field.data_type())),
        DataType::Struct(fields) => {
            let inner: Vec<String> = fields
                .iter()
                .map(|f| format!("{} {}", f.name(), type_name(f.data_type())))
                .collect();
            format!("STRUCT({})", inner.join(", "))
        }
        DataType::Dictionary(_, value) => type_name(value),
        other => format!("{other:?}").to_uppercase(),
    }
}

fn micros(unit: &TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

fn cell_from_value(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Boolean(b) => CellValue::Bool(b),
        Value::TinyInt(v) => CellValue::Int(v.into()),
        Value::SmallInt(v) => CellValue::Int(v.into()),
        Value::Int(v) => CellValue::Int(v.into()),
        Value::UTinyInt(v) => CellValue::Int(v.into()),
        Value::USmallInt(v) => CellValue::Int(v.into()),
        Value::UInt(v) => CellValue::Int(v.into()),
        Value::BigInt(v) => CellValue::BigInt(v),
        Value::UBigInt(v) => CellValue::UBigInt(v),
        Value::HugeInt(v) => CellValue::HugeInt(v),
        Value::Float(v) => CellValue::Float(v.into()),
        Value::Double(v) => CellValue::Float(v),
        Value::Decimal(d) => CellValue::Decimal(d.to_string()),
        Value::Text(s) | Value::Enum(s) => CellValue::Text(s),
        Value::Blob(b) => CellValue::Bytes(b),
        Value::Timestamp(unit, v) => DateTime::from_timestamp_micros(micros(&unit, v))
            .map(|ts| CellValue::Text(ts.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string()))
            .unwrap_or(CellValue::BigInt(v)),
        Value::Date32(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(|d| CellValue::Text(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(CellValue::Int(days.into())),
        Value::Time64(unit, v) => {
            let us = micros(&unit, v);
            let secs = u32::try_from(us.div_euclid(1_000_000)).unwrap_or(0);
            let nanos = u32::try_from(us.rem_euclid(1_000_000) * 1_000).unwrap_or(0);
            NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
                .map(|t| CellValue::Text(t.format("%H:%M:%S%.f").to_string()))
                .unwrap_or(CellValue::BigInt(v))
        }
        Value::List(items) | Value::Array(items) => {
            CellValue::List(items.into_iter().map(cell_from_value).collect())
        }
        Value::Struct(fields) => CellValue::Struct(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), cell_from_value(v.clone())))
                .collect(),
        ),
        Value::Map(entries) => CellValue::Map(
            entries
                .iter()
                .map(|(k, v)| (cell_from_value(k.clone()), cell_from_value(v.clone())))
                .collect(),
        ),
        Value::Union(inner) => cell_from_value(*inner),
        Value::UHugeInt(v) => i128::try_from(v)
            .map(CellValue::HugeInt)
            .unwrap_or_else(|_| CellValue::Text(v.to_string())),
        Value::Interval {
            months,
            days,
            nanos,
        } => CellValue::Text(format_interval(months, days, nanos)),
        Value::Geometry(wkb) => CellValue::Bytes(wkb),
        other => {
            warn!("Unsupported DuckDB value rendered as NULL: {:?}", other);
            CellValue::Null
        }
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 { format!("{n} {unit}") } else { format!("{n} {unit}s") }
}

/// Formats an interval the way DuckDB casts it to text: calendar parts
/// first (`1 year 2 months 3 days`), then a clock part for the sub-day
/// remainder (`00:00:01.5`). A zero interval is `00:00:00`.
fn format_interval(months: i32, days: i32, nanos: i64) -> String {
    let mut parts = Vec::new();
    let (years, months) = (months / 12, months % 12);
    if years != 0 {
        parts.push(plural(years.into(), "year"));
    }
    if months != 0 {
        parts.push(plural(months.into(), "month"));
    }
    if days != 0 {
        parts.push(plural(days.into(), "day"));
    }

    let micros = nanos / 1_000;
    if micros != 0 || parts.is_empty() {
        let sign = if micros < 0 { "-" } else { "" };
        let micros = micros.unsigned_abs();
        let (secs, frac) = (micros / 1_000_000, micros % 1_000_000);
        let mut clock = format!(
            "{sign}{:02}:{:02}:{:02}",
            secs / 3_600,
            secs / 60 % 60,
            secs % 60
        );
        if frac != 0 {
            let digits = format!("{frac:06}");
            clock.push('.');
            clock.push_str(digits.trim_end_matches('0'));
        }
        parts.push(clock);
    }

    parts.join(" ")
}
