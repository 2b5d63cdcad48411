mod value;
pub(crate) use value::PgValue;

use larder_core::{
    async_trait,
    doc::{Type as ColumnType, Value},
    driver::{operation::Select, Connection, Driver, Operation, Response},
    err, Error, Result,
};
use larder_sql as sql;

use postgres::{tls::MakeTlsConnect, types::ToSql, Socket};
use std::fmt;
use tokio_postgres::{Client, Config, Row};
use url::Url;

/// Destination driver for PostgreSQL. Validates the connection URL once;
/// the pool calls [`Driver::connect`] for each connection it opens.
#[derive(Debug, Clone)]
pub struct PostgresDriver {
    config: Config,
}

impl PostgresDriver {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            config: parse_url(url)?,
        })
    }
}

#[async_trait]
impl Driver for PostgresDriver {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        let connection =
            Postgres::connect_with_config(self.config.clone(), tokio_postgres::NoTls).await?;
        Ok(Box::new(connection))
    }
}

/// A single connection to a PostgreSQL destination.
pub struct Postgres {
    client: Client,
}

impl Postgres {
    /// Wraps an already-established connection.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects to a PostgreSQL database using a connection string.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(parse_url(url)?, tokio_postgres::NoTls).await
    }

    /// Connects to a PostgreSQL database using a [`tokio_postgres::Config`].
    pub async fn connect_with_config<T>(config: Config, tls: T) -> Result<Self>
    where
        T: MakeTlsConnect<Socket> + 'static,
        T::Stream: Send,
    {
        let (client, connection) = config
            .connect(tls)
            .await
            .map_err(|err| Error::connection(err.to_string()))?;

        tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::error!(error = %err, "postgres connection task failed");
            }
        });

        Ok(Self::new(client))
    }

    async fn execute(&self, sql_text: &str, params: Vec<Value>) -> Result<u64> {
        let params = params.into_iter().map(PgValue::from).collect::<Vec<_>>();
        let args = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();

        self.client
            .execute(sql_text, &args)
            .await
            .map_err(translate)
    }

    async fn select(&self, op: &Select, sql_text: &str) -> Result<Vec<Vec<Value>>> {
        let types = op
            .columns
            .iter()
            .map(|name| {
                op.table
                    .column(name)
                    .map(|column| column.ty)
                    .ok_or_else(|| err!("unknown column `{}` in select", name))
            })
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .client
            .query(sql_text, &[])
            .await
            .map_err(translate)?;

        rows.iter()
            .map(|row| {
                types
                    .iter()
                    .enumerate()
                    .map(|(index, ty)| column_value(row, index, *ty))
                    .collect()
            })
            .collect()
    }
}

impl From<Client> for Postgres {
    fn from(client: Client) -> Self {
        Self { client }
    }
}

impl fmt::Debug for Postgres {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Postgres").finish_non_exhaustive()
    }
}

#[async_trait]
impl Connection for Postgres {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let serializer = sql::Serializer::postgresql();
        let mut params = Vec::new();
        let sql_text = serializer.serialize(&op, &mut params);

        match op {
            Operation::CreateTable(_) => {
                assert!(
                    params.is_empty(),
                    "creating a table shouldn't involve any parameters"
                );
                self.execute(&sql_text, params).await?;
                Ok(Response::count(0))
            }
            Operation::Insert(_) | Operation::Sql(_) => {
                let count = self.execute(&sql_text, params).await?;
                Ok(Response::count(count))
            }
            Operation::Select(ref op) => {
                assert!(
                    params.is_empty(),
                    "a full-scan select shouldn't involve any parameters"
                );
                let rows = self.select(op, &sql_text).await?;
                Ok(Response::rows(rows))
            }
        }
    }
}

fn parse_url(url: &str) -> Result<Config> {
    let url = Url::parse(url)?;

    if url.scheme() != "postgresql" {
        return Err(Error::connection(format!(
            "connection URL does not have a `postgresql` scheme; url={url}"
        )));
    }

    let host = url.host_str().ok_or_else(|| {
        Error::connection(format!("missing host in connection URL; url={url}"))
    })?;

    if url.path().is_empty() {
        return Err(Error::connection(format!(
            "no database specified - missing path in connection URL; url={url}"
        )));
    }

    let mut config = Config::new();
    config.host(host);
    config.dbname(url.path().trim_start_matches('/'));

    if let Some(port) = url.port() {
        config.port(port);
    }

    if !url.username().is_empty() {
        config.user(url.username());
    }

    if let Some(password) = url.password() {
        config.password(password);
    }

    Ok(config)
}

/// Converts one result column to an engine [`Value`], guided by the
/// declared column type.
fn column_value(row: &Row, index: usize, ty: ColumnType) -> Result<Value> {
    let value = match ty {
        ColumnType::Bool => row
            .try_get::<_, Option<bool>>(index)
            .map(|v| v.map(Value::Bool)),
        ColumnType::I64 => row
            .try_get::<_, Option<i64>>(index)
            .map(|v| v.map(Value::I64)),
        ColumnType::F64 => row
            .try_get::<_, Option<f64>>(index)
            .map(|v| v.map(Value::F64)),
        ColumnType::String => row
            .try_get::<_, Option<String>>(index)
            .map(|v| v.map(Value::String)),
    }
    .map_err(translate)?;

    Ok(value.unwrap_or(Value::Null))
}

fn translate(err: tokio_postgres::Error) -> Error {
    if let Some(db) = err.as_db_error() {
        // SQLSTATE class 23: integrity constraint violations, recoverable
        // per row
        if db.code().code().starts_with("23") {
            return Error::constraint(db.message().to_string());
        }
        return err!("{db}");
    }

    Error::connection(err.to_string())
}
