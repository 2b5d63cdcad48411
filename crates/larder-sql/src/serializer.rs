mod delim;
use delim::Comma;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

mod ty;
use ty::sql_type;

use larder_core::driver::operation::{CreateTable, Insert, Select, Sql};
use larder_core::driver::Operation;

use std::fmt::Write;

/// Serialize a driver operation to a SQL string plus its parameters.
#[derive(Debug, Default)]
pub struct Serializer {
    _private: (),
}

impl Serializer {
    pub fn postgresql() -> Self {
        Self::default()
    }

    pub fn serialize(&self, op: &Operation, params: &mut impl Params) -> String {
        let mut ret = match op {
            Operation::CreateTable(op) => self.create_table(op),
            Operation::Insert(op) => self.insert(op, params),
            Operation::Select(op) => self.select(op),
            Operation::Sql(op) => self.raw(op, params),
        };
        ret.push(';');
        ret
    }

    fn create_table(&self, op: &CreateTable) -> String {
        let table = &op.table;
        let mut sql = String::new();

        write!(sql, "CREATE TABLE IF NOT EXISTS {} (", Ident(&table.name)).unwrap();

        for (index, column) in table.columns.iter().enumerate() {
            write!(sql, "\n    {} {}", Ident(&column.name), sql_type(column.ty)).unwrap();
            if column.required {
                sql.push_str(" NOT NULL");
            }
            if let Some(fk) = &column.foreign_key {
                write!(sql, " REFERENCES {} ({})", Ident(&fk.table), Ident(&fk.column)).unwrap();
            }
            if index < table.columns.len() - 1 {
                sql.push(',');
            }
        }

        if let Some(unique) = table.unique_column() {
            write!(sql, ",\n    UNIQUE ({})", Ident(&unique.name)).unwrap();
        }

        sql.push_str("\n)");
        sql
    }

    fn insert(&self, op: &Insert, params: &mut impl Params) -> String {
        let mut sql = String::new();
        let columns: Vec<_> = op.columns.iter().map(Ident).collect();

        write!(
            sql,
            "INSERT INTO {} ({}) VALUES ",
            Ident(&op.table.name),
            Comma(&columns)
        )
        .unwrap();

        for (index, row) in op.rows.iter().enumerate() {
            if index > 0 {
                sql.push_str(", ");
            }
            let placeholders: Vec<_> = row.iter().map(|value| params.push(value)).collect();
            write!(sql, "({})", Comma(&placeholders)).unwrap();
        }

        if let Some(key) = &op.conflict {
            write!(sql, " ON CONFLICT ({})", Ident(key)).unwrap();

            let updates: Vec<String> = op
                .columns
                .iter()
                .filter(|column| *column != key)
                .map(|column| format!("{} = excluded.{}", Ident(column), Ident(column)))
                .collect();

            if updates.is_empty() {
                sql.push_str(" DO NOTHING");
            } else {
                write!(sql, " DO UPDATE SET {}", Comma(&updates)).unwrap();
            }
        }

        sql
    }

    fn select(&self, op: &Select) -> String {
        let columns: Vec<_> = op.columns.iter().map(Ident).collect();
        format!("SELECT {} FROM {}", Comma(&columns), Ident(&op.table.name))
    }

    fn raw(&self, op: &Sql, params: &mut impl Params) -> String {
        for value in &op.params {
            params.push(value);
        }
        op.sql.trim_end_matches(&[';', ' '][..]).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use larder_core::{
        doc::{Type, Value},
        schema::{ColumnDef, Schema, TableDef},
    };
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn users_schema() -> Schema {
        Schema::build(
            vec![
                TableDef::new("servers")
                    .column(ColumnDef::new("server_id", Type::String).unique()),
                TableDef::new("users")
                    .column(ColumnDef::new("user_id", Type::String).source("id").unique())
                    .column(ColumnDef::new("token", Type::String))
                    .column(
                        ColumnDef::new("server_id", Type::String)
                            .references("servers", "server_id"),
                    ),
            ],
            &HashSet::new(),
        )
        .unwrap()
    }

    #[test]
    fn create_table_with_unique_and_references() {
        let schema = users_schema();
        let op = CreateTable {
            table: schema.table_by_name("users").unwrap().clone(),
        };

        let mut params = Vec::new();
        let sql = Serializer::postgresql().serialize(&op.into(), &mut params);

        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"users\" (\n    \
             \"user_id\" TEXT NOT NULL,\n    \
             \"token\" TEXT,\n    \
             \"server_id\" TEXT REFERENCES \"servers\" (\"server_id\"),\n    \
             UNIQUE (\"user_id\")\n);"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn insert_plain() {
        let schema = users_schema();
        let op = Insert {
            table: schema.table_by_name("servers").unwrap().clone(),
            columns: vec!["server_id".to_string()],
            rows: vec![vec![Value::String("s1".to_string())]],
            conflict: None,
        };

        let mut params = Vec::new();
        let sql = Serializer::postgresql().serialize(&op.into(), &mut params);

        assert_eq!(sql, "INSERT INTO \"servers\" (\"server_id\") VALUES ($1);");
        assert_eq!(params, vec![Value::String("s1".to_string())]);
    }

    #[test]
    fn insert_upserts_on_unique_column() {
        let schema = users_schema();
        let op = Insert {
            table: schema.table_by_name("users").unwrap().clone(),
            columns: vec![
                "user_id".to_string(),
                "token".to_string(),
                "server_id".to_string(),
            ],
            rows: vec![vec![
                Value::String("u1".to_string()),
                Value::String("t".to_string()),
                Value::Null,
            ]],
            conflict: Some("user_id".to_string()),
        };

        let mut params = Vec::new();
        let sql = Serializer::postgresql().serialize(&op.into(), &mut params);

        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"user_id\", \"token\", \"server_id\") VALUES ($1, $2, $3) \
             ON CONFLICT (\"user_id\") DO UPDATE SET \
             \"token\" = excluded.\"token\", \"server_id\" = excluded.\"server_id\";"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn upsert_with_only_the_key_does_nothing_on_conflict() {
        let schema = users_schema();
        let op = Insert {
            table: schema.table_by_name("servers").unwrap().clone(),
            columns: vec!["server_id".to_string()],
            rows: vec![vec![Value::String("s1".to_string())]],
            conflict: Some("server_id".to_string()),
        };

        let mut params = Vec::new();
        let sql = Serializer::postgresql().serialize(&op.into(), &mut params);

        assert_eq!(
            sql,
            "INSERT INTO \"servers\" (\"server_id\") VALUES ($1) \
             ON CONFLICT (\"server_id\") DO NOTHING;"
        );
    }

    #[test]
    fn select_projects_columns() {
        let schema = users_schema();
        let op = Select {
            table: schema.table_by_name("users").unwrap().clone(),
            columns: vec!["user_id".to_string(), "token".to_string()],
        };

        let mut params = Vec::new();
        let sql = Serializer::postgresql().serialize(&op.into(), &mut params);

        assert_eq!(sql, "SELECT \"user_id\", \"token\" FROM \"users\";");
    }

    #[test]
    fn raw_passes_parameters_through() {
        let op = Sql::with_params(
            "UPDATE \"users\" SET \"staff\" = $1;",
            vec![Value::Bool(true)],
        );

        let mut params = Vec::new();
        let sql = Serializer::postgresql().serialize(&op.into(), &mut params);

        assert_eq!(sql, "UPDATE \"users\" SET \"staff\" = $1;");
        assert_eq!(params, vec![Value::Bool(true)]);
    }
}
