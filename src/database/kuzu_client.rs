//! Kuzu graph client using the `kuzu` crate.

use crate::database::connection::{ConnectionTarget, validate_db_path};
use crate::database::result::{CellValue, RowMap};
use crate::database::traits::{CatalogSource, DatabaseClient};
use crate::error::{DatabaseError, DbResult};
use ::kuzu::{Connection, Database, InternalID, SystemConfig, Value};
use parking_lot::Mutex;
use tracing::{debug, info};

/// A single Kuzu database.
///
/// `kuzu::Connection` borrows the database, so a short-lived connection is
/// created per call while the database mutex is held.
pub struct KuzuClient {
    db_path: String,
    read_only: bool,
    db: Mutex<Option<Database>>,
}

impl KuzuClient {
    fn run(db: &Database, statement: &str) -> DbResult<Vec<RowMap>> {
        let conn = Connection::new(db).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
        let result = conn
            .query(statement)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let columns = result.get_column_names();
        let rows: Vec<RowMap> = result
            .map(|values| {
                columns
                    .iter()
                    .cloned()
                    .zip(values.into_iter().map(cell_from_value))
                    .collect()
            })
            .collect();
        Ok(rows)
    }
}

impl DatabaseClient for KuzuClient {
    fn backend(&self) -> &'static str {
        "kuzu"
    }

    /// A writable open creates the database when `path` does not exist yet.
    /// Read-only opens need an existing database.
    fn open(path: &str, read_only: bool) -> DbResult<Self> {
        if read_only {
            validate_db_path(path)?;
        }
        let target = ConnectionTarget::new(path, read_only);
        info!("Opening Kuzu database: {}", target);

        let config = SystemConfig::default().read_only(target.read_only());
        let db = Database::new(target.path(), config)
            .map_err(|e| DatabaseError::OpenFailed(e.to_string()))?;

        // Dropping `db` on failure releases the partially opened database.
        Self::run(&db, "RETURN 1")
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            db_path: path.to_string(),
            read_only,
            db: Mutex::new(Some(db)),
        })
    }

    fn db_path(&self) -> &str {
        &self.db_path
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn is_open(&self) -> bool {
        self.db.lock().is_some()
    }

    fn close(&self) {
        if self.db.lock().take().is_some() {
            debug!("Closed Kuzu database: {}", self.db_path);
        }
    }
}

impl CatalogSource for KuzuClient {
    fn fetch_rows(&self, statement: &str) -> DbResult<Vec<RowMap>> {
        let guard = self.db.lock();
        let db = guard.as_ref().ok_or(DatabaseError::NotEstablished)?;
        let rows = Self::run(db, statement)?;
        debug!("Kuzu statement returned {} rows", rows.len());
        Ok(rows)
    }
}

fn internal_id(id: &InternalID) -> CellValue {
    CellValue::Struct(vec![
        ("offset".into(), CellValue::UBigInt(id.offset)),
        ("table".into(), CellValue::UBigInt(id.table_id)),
    ])
}

fn properties(props: &[(String, Value)]) -> impl Iterator<Item = (String, CellValue)> + '_ {
    props
        .iter()
        .map(|(name, value)| (name.clone(), cell_from_value(value.clone())))
}

fn cell_from_value(value: Value) -> CellValue {
    match value {
        Value::Null(_) => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(b),
        Value::Int8(v) => CellValue::Int(v.into()),
        Value::Int16(v) => CellValue::Int(v.into()),
        Value::Int32(v) => CellValue::Int(v.into()),
        Value::UInt8(v) => CellValue::Int(v.into()),
        Value::UInt16(v) => CellValue::Int(v.into()),
        Value::UInt32(v) => CellValue::Int(v.into()),
        Value::Int64(v) => CellValue::BigInt(v),
        Value::UInt64(v) => CellValue::UBigInt(v),
        Value::Int128(v) => CellValue::HugeInt(v),
        Value::Float(v) => CellValue::Float(v.into()),
        Value::Double(v) => CellValue::Float(v),
        Value::String(s) => CellValue::Text(s),
        Value::Blob(b) => CellValue::Bytes(b),
        Value::InternalID(id) => internal_id(&id),
        Value::List(_, items) | Value::Array(_, items) => {
            CellValue::List(items.into_iter().map(cell_from_value).collect())
        }
        Value::Struct(fields) => CellValue::Struct(
            fields
                .into_iter()
                .map(|(name, v)| (name, cell_from_value(v)))
                .collect(),
        ),
        Value::Node(node) => {
            let mut fields = vec![
                ("_id".to_string(), internal_id(node.get_node_id())),
                ("_label".to_string(), CellValue::Text(node.get_label_name().clone())),
            ];
            fields.extend(properties(node.get_properties()));
            CellValue::Struct(fields)
        }
        Value::Rel(rel) => {
            let mut fields = vec![
                ("_src".to_string(), internal_id(rel.get_src_node())),
                ("_dst".to_string(), internal_id(rel.get_dst_node())),
                ("_label".to_string(), CellValue::Text(rel.get_label_name().clone())),
            ];
            fields.extend(properties(rel.get_properties()));
            CellValue::Struct(fields)
        }
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaIntrospector;

    fn memory() -> KuzuClient {
        KuzuClient::open(":memory:", false).unwrap()
    }

    #[test]
    fn test_return_rows() {
        let client = memory();
        let rows = client
            .fetch_rows("RETURN 1 AS one, 'x' AS s, 9007199254740993 AS big")
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["s"], CellValue::from("x"));
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json[0]["big"], "9007199254740993");
    }

    #[test]
    fn test_query_failure() {
        let client = memory();
        assert!(matches!(
            client.fetch_rows("MATCH (n:Missing) RETURN n"),
            Err(DatabaseError::QueryFailed(_))
        ));
    }

    #[test]
    fn test_closed_client() {
        let client = memory();
        client.close();
        client.close();
        assert!(matches!(
            client.fetch_rows("RETURN 1"),
            Err(DatabaseError::NotEstablished)
        ));
    }

    #[test]
    fn test_creates_database_at_new_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("memory.kuzu");
        let path = path.to_str().unwrap();

        let client = KuzuClient::open(path, false).unwrap();
        assert_eq!(client.db_path(), path);
        assert_eq!(client.fetch_rows("RETURN 1 AS one").unwrap().len(), 1);
        client.close();

        assert!(std::path::Path::new(path).exists());
        assert!(KuzuClient::open(path, true).is_ok());
    }

    #[test]
    fn test_read_only_needs_existing_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.kuzu");
        assert!(matches!(
            KuzuClient::open(path.to_str().unwrap(), true),
            Err(DatabaseError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_introspects_real_catalog() {
        let client = memory();
        for stmt in [
            "CREATE NODE TABLE Person(name STRING, age INT64, PRIMARY KEY(name))",
            "CREATE NODE TABLE City(name STRING, PRIMARY KEY(name))",
            "CREATE REL TABLE LivesIn(FROM Person TO City, since INT64)",
        ] {
            client.fetch_rows(stmt).unwrap();
        }

        let schema = SchemaIntrospector::new(&client).introspect().unwrap();
        let names: Vec<_> = schema.node_tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["City", "Person"]);

        let person = &schema.node_tables[1];
        assert!(person.properties.iter().any(|p| p.name == "name" && p.is_primary_key));
        assert!(person.properties.iter().any(|p| p.name == "age" && !p.is_primary_key));

        let lives_in = &schema.rel_tables[0];
        assert_eq!(lives_in.connectivity[0].src, "Person");
        assert_eq!(lives_in.connectivity[0].dst, "City");
    }
}
