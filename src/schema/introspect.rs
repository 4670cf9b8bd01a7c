//! Schema introspection over catalog calls.

use crate::database::result::RowMap;
use crate::database::traits::CatalogSource;
use crate::error::{DatabaseError, DbResult};
use crate::schema::types::*;
use tracing::{debug, instrument};

pub const SHOW_TABLES: &str = "CALL show_tables() RETURN *";

pub fn table_info_statement(table: &str) -> String {
    format!("CALL TABLE_INFO('{}') RETURN *", escape_literal(table))
}

pub fn show_connection_statement(table: &str) -> String {
    format!("CALL SHOW_CONNECTION('{}') RETURN *", escape_literal(table))
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn text(row: &RowMap, key: &str) -> Option<String> {
    row.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// Builds a [`Schema`] from a backend's catalog functions.
pub struct SchemaIntrospector<'a, S: CatalogSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: CatalogSource + ?Sized> SchemaIntrospector<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    #[instrument(skip(self))]
    pub fn introspect(&self) -> DbResult<Schema> {
        let tables = self.source.fetch_rows(SHOW_TABLES)?;
        debug!("Catalog lists {} tables", tables.len());

        let mut descriptors = Vec::with_capacity(tables.len());
        for row in &tables {
            let (Some(name), Some(kind)) = (text(row, "name"), text(row, "type")) else {
                continue;
            };
            let Some(kind) = TableKind::parse(&kind) else {
                debug!("Skipping table {} of unsupported kind {}", name, kind);
                continue;
            };
            let comment = text(row, "comment").unwrap_or_default();
            descriptors.push(self.describe(name, kind, comment)?);
        }

        Ok(Schema::from_tables(descriptors))
    }

    fn describe(&self, name: String, kind: TableKind, comment: String) -> DbResult<TableDescriptor> {
        let properties = self.properties(&name)?;
        match kind {
            TableKind::Node => Ok(TableDescriptor::Node(NodeTable {
                name,
                comment,
                properties,
            })),
            TableKind::Rel => {
                let connectivity = self.connectivity(&name)?;
                Ok(TableDescriptor::Rel(RelTable {
                    name,
                    comment,
                    properties: properties.into_iter().map(RelProperty::from).collect(),
                    connectivity,
                }))
            }
        }
    }

    fn properties(&self, table: &str) -> DbResult<Vec<NodeProperty>> {
        let rows = self
            .source
            .fetch_rows(&table_info_statement(table))
            .map_err(|e| catalog_error(table, e))?;

        Ok(rows
            .iter()
            .map(|row| NodeProperty {
                name: text(row, "name").unwrap_or_default(),
                data_type: text(row, "type").unwrap_or_default(),
                is_primary_key: row
                    .get("primary key")
                    .and_then(|v| v.as_flag())
                    .unwrap_or(false),
            })
            .collect())
    }

    fn connectivity(&self, table: &str) -> DbResult<Vec<Connectivity>> {
        let rows = self
            .source
            .fetch_rows(&show_connection_statement(table))
            .map_err(|e| catalog_error(table, e))?;

        Ok(rows
            .iter()
            .map(|row| Connectivity {
                src: text(row, "source table name").unwrap_or_default(),
                dst: text(row, "destination table name").unwrap_or_default(),
            })
            .collect())
    }
}

fn catalog_error(table: &str, e: DatabaseError) -> DatabaseError {
    DatabaseError::Catalog {
        table: table.to_string(),
        message: e.to_string(),
    }
}
