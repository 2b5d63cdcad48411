//! Connection pooling for destination connections.

use crate::db::Connect;

use larder_core::{
    doc::Value,
    driver::{operation::Sql, Connection, Driver, Operation, Response},
    Error, Result,
};

use std::ops::{Deref, DerefMut};

/// A pool of destination connections, shared by the backup engine and the
/// migration runner. Owned by the caller and passed by reference; there is
/// no process-wide instance.
#[derive(Debug)]
pub struct Pool {
    inner: deadpool::managed::Pool<Manager>,
}

impl Pool {
    /// Creates a new connection pool from the given driver.
    pub async fn new(driver: impl Driver) -> Result<Self> {
        let max_connections = driver.max_connections();
        let mut builder = deadpool::managed::Pool::builder(Manager {
            driver: Box::new(driver),
        })
        .runtime(deadpool::Runtime::Tokio1);

        if let Some(max_connections) = max_connections {
            builder = builder.max_size(max_connections);
        }

        let inner = builder
            .build()
            .map_err(|err| Error::connection(err.to_string()))?;

        // Prime one connection so misconfiguration surfaces here rather
        // than mid-run.
        let _connection = inner.get().await.map_err(pool_error)?;

        Ok(Self { inner })
    }

    /// Creates a new connection pool from a connection URL.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::new(Connect::new(url)?).await
    }

    /// Retrieves a connection from the pool.
    pub async fn get(&self) -> Result<PoolConnection> {
        let connection = self.inner.get().await.map_err(pool_error)?;
        Ok(PoolConnection { inner: connection })
    }

    /// Executes a single operation on a pooled connection.
    pub async fn exec(&self, op: impl Into<Operation>) -> Result<Response> {
        let mut connection = self.get().await?;
        connection.exec(op.into()).await
    }

    /// Executes a raw statement, returning the affected-row count. This is
    /// the surface migration bodies use.
    pub async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<u64> {
        self.exec(Sql::with_params(sql, params)).await?.into_count()
    }
}

fn pool_error(err: deadpool::managed::PoolError<Error>) -> Error {
    match err {
        deadpool::managed::PoolError::Backend(err) => err,
        other => Error::connection(other.to_string()),
    }
}

#[derive(Debug)]
struct Manager {
    driver: Box<dyn Driver>,
}

impl deadpool::managed::Manager for Manager {
    type Type = Box<dyn Connection>;
    type Error = Error;

    async fn create(&self) -> Result<Self::Type> {
        self.driver.connect().await
    }

    async fn recycle(
        &self,
        _obj: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        Ok(())
    }
}

/// A connection retrieved from a pool.
///
/// When dropped, the connection is returned to the pool for reuse.
pub struct PoolConnection {
    inner: deadpool::managed::Object<Manager>,
}

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
