//! Opens document sources from connection URLs.

use larder_core::{err, Result, Source};

use url::Url;

/// Opens a source adapter for a connection URL, dispatching on its
/// scheme. Connection parameters are opaque to the engine.
pub fn connect(url: &str) -> Result<Box<dyn Source>> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "mongodb" => connect_mongodb(url),
        scheme => Err(err!("unsupported source; scheme={scheme}; url={parsed}")),
    }
}

#[cfg(feature = "mongodb")]
fn connect_mongodb(url: &str) -> Result<Box<dyn Source>> {
    let source = larder_driver_mongodb::MongoSource::new(url)?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "mongodb"))]
fn connect_mongodb(_url: &str) -> Result<Box<dyn Source>> {
    Err(err!("`mongodb` feature not enabled"))
}
