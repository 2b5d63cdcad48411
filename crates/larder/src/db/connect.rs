use larder_core::{
    async_trait,
    driver::{Connection, Driver},
    err, Result,
};

use url::Url;

/// Opens destination connections for a connection URL, dispatching on its
/// scheme. Connection parameters are opaque to the engine.
#[derive(Debug)]
pub struct Connect {
    url: Url,
}

impl Connect {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        Ok(Self { url })
    }
}

#[async_trait]
impl Driver for Connect {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        match self.url.scheme() {
            "postgresql" => connect_postgresql(&self.url).await,
            scheme => Err(err!(
                "unsupported destination; scheme={scheme}; url={}",
                self.url
            )),
        }
    }
}

#[cfg(feature = "postgresql")]
async fn connect_postgresql(url: &Url) -> Result<Box<dyn Connection>> {
    let connection = larder_driver_postgresql::Postgres::connect(url.as_str()).await?;
    Ok(Box::new(connection))
}

#[cfg(not(feature = "postgresql"))]
async fn connect_postgresql(_url: &Url) -> Result<Box<dyn Connection>> {
    Err(err!("`postgresql` feature not enabled"))
}
