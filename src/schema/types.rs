//! Normalized graph schema.

use serde::Serialize;

/// Table kind reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Node,
    Rel,
}

impl TableKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NODE" => Some(Self::Node),
            "REL" => Some(Self::Rel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(rename = "isPrimaryKey")]
    pub is_primary_key: bool,
}

/// Relationship properties have no primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl From<NodeProperty> for RelProperty {
    fn from(property: NodeProperty) -> Self {
        Self {
            name: property.name,
            data_type: property.data_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connectivity {
    pub src: String,
    pub dst: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeTable {
    pub name: String,
    pub comment: String,
    pub properties: Vec<NodeProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelTable {
    pub name: String,
    pub comment: String,
    pub properties: Vec<RelProperty>,
    pub connectivity: Vec<Connectivity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableDescriptor {
    Node(NodeTable),
    Rel(RelTable),
}

impl TableDescriptor {
    pub fn name(&self) -> &str {
        match self {
            Self::Node(t) => &t.name,
            Self::Rel(t) => &t.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub node_tables: Vec<NodeTable>,
    pub rel_tables: Vec<RelTable>,
}

impl Schema {
    /// Builds a schema with both lists sorted by name.
    pub fn from_tables(tables: impl IntoIterator<Item = TableDescriptor>) -> Self {
        let mut schema = Self::default();
        for table in tables {
            match table {
                TableDescriptor::Node(t) => schema.node_tables.push(t),
                TableDescriptor::Rel(t) => schema.rel_tables.push(t),
            }
        }
        schema.node_tables.sort_by(|a, b| a.name.cmp(&b.name));
        schema.rel_tables.sort_by(|a, b| a.name.cmp(&b.name));
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_kind_parse() {
        assert_eq!(TableKind::parse("NODE"), Some(TableKind::Node));
        assert_eq!(TableKind::parse("REL"), Some(TableKind::Rel));
        assert_eq!(TableKind::parse("RDF"), None);
    }

    #[test]
    fn test_schema_json_shape() {
        let schema = Schema::from_tables([
            TableDescriptor::Rel(RelTable {
                name: "Knows".into(),
                comment: String::new(),
                properties: vec![RelProperty {
                    name: "since".into(),
                    data_type: "INT64".into(),
                }],
                connectivity: vec![Connectivity {
                    src: "Person".into(),
                    dst: "Person".into(),
                }],
            }),
            TableDescriptor::Node(NodeTable {
                name: "Person".into(),
                comment: "people".into(),
                properties: vec![NodeProperty {
                    name: "id".into(),
                    data_type: "INT64".into(),
                    is_primary_key: true,
                }],
            }),
        ]);

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["nodeTables"][0]["properties"][0]["isPrimaryKey"], true);
        assert_eq!(json["nodeTables"][0]["properties"][0]["type"], "INT64");
        assert_eq!(json["relTables"][0]["connectivity"][0]["src"], "Person");
        assert!(json["relTables"][0]["properties"][0].get("isPrimaryKey").is_none());
    }

    #[test]
    fn test_empty_schema_serializes_empty_lists() {
        let json = serde_json::to_string(&Schema::default()).unwrap();
        assert_eq!(json, r#"{"nodeTables":[],"relTables":[]}"#);
    }
}
