//! Relational schema recovered from generated SQL DDL.
//!
//! [`parse`] recognizes the `CREATE TABLE` subset that the upstream generator
//! emits: column definitions with their constraint flags, table-level
//! `PRIMARY KEY`/`UNIQUE` lists, and `FOREIGN KEY … REFERENCES` clauses. It
//! never fails; text it cannot make sense of yields fewer tables.

mod lexer;
mod parser;

use serde::{Deserialize, Serialize};

use lexer::Lexer;
use parser::Parser;

/// A column declared in a `CREATE TABLE` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name as written (quotes removed).
    pub name: String,
    /// Raw type text, e.g. `VARCHAR(255)` or `DECIMAL(10,2)`. Not normalized.
    #[serde(rename = "type")]
    pub data_type: String,
    /// Declared `PRIMARY KEY`, inline or through a table constraint.
    pub is_primary: bool,
    /// Declared `NOT NULL`.
    pub is_not_null: bool,
    /// Declared `UNIQUE`, inline or through a table constraint.
    pub is_unique: bool,
    /// Carries a `DEFAULT` clause.
    pub has_default: bool,
}

impl Column {
    /// Creates a column with all constraint flags cleared.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary: false,
            is_not_null: false,
            is_unique: false,
            has_default: false,
        }
    }
}

/// A directed foreign-key reference from a column of the owning table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Referencing column in the owning table.
    pub from_column: String,
    /// Referenced table. May name a table that does not exist in the schema.
    pub to_table: String,
    /// Referenced column.
    pub to_column: String,
}

/// A table with its columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Table name (last segment of a qualified name).
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Foreign-key references declared in this table.
    pub relationships: Vec<Relationship>,
}

impl Table {
    /// Creates an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), columns: Vec::new(), relationships: Vec::new() }
    }

    fn mark_column(&mut self, name: &str, mut mark: impl FnMut(&mut Column)) {
        for column in self.columns.iter_mut().filter(|c| c.name.eq_ignore_ascii_case(name)) {
            mark(column);
        }
    }
}

/// Tables recovered from one DDL document, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Tables in order of appearance. Duplicate names are kept.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Looks up a table by exact name. When a name is declared twice the
    /// later declaration wins.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().rev().find(|t| t.name == name)
    }

    /// Returns `true` when no table was recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of columns across all tables.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Total number of relationships across all tables.
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.tables.iter().map(|t| t.relationships.len()).sum()
    }

    /// Relationships whose target table is not part of this schema, paired
    /// with the table that declares them.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<(&Table, &Relationship)> {
        self.tables
            .iter()
            .flat_map(|table| table.relationships.iter().map(move |rel| (table, rel)))
            .filter(|(_, rel)| !self.tables.iter().any(|t| t.name.eq_ignore_ascii_case(&rel.to_table)))
            .collect()
    }
}

/// Parses SQL DDL text into a [`Schema`].
///
/// Only `CREATE TABLE` statements are recognized; everything else is
/// skipped. Commas nested in type arguments such as `DECIMAL(10,2)` do not
/// split column definitions.
#[must_use]
pub fn parse(ddl: &str) -> Schema {
    let tokens = Lexer::new(ddl).tokenize();
    let schema = Parser::new(tokens, ddl).parse();
    tracing::debug!(
        tables = schema.tables.len(),
        columns = schema.column_count(),
        relationships = schema.relationship_count(),
        "parsed DDL"
    );
    schema
}
