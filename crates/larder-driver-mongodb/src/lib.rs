mod value;

use larder_core::{async_trait, doc::DocumentStream, Error, Result, Source};

use futures::StreamExt;
use mongodb::{Client, Database};
use std::fmt;
use url::Url;

/// Source adapter over a MongoDB database. The database name comes from
/// the connection URL's path.
pub struct MongoSource {
    url: Url,
    database_name: String,
    database: Option<Database>,
}

impl MongoSource {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;

        if url.scheme() != "mongodb" {
            return Err(Error::connection(format!(
                "connection URL does not have a `mongodb` scheme; url={url}"
            )));
        }

        let database_name = url.path().trim_start_matches('/').to_string();
        if database_name.is_empty() {
            return Err(Error::connection(format!(
                "no database specified - missing path in connection URL; url={url}"
            )));
        }

        Ok(Self {
            url,
            database_name,
            database: None,
        })
    }

    /// Overrides the database name parsed from the URL.
    pub fn with_database(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }
}

impl fmt::Debug for MongoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoSource")
            .field("database", &self.database_name)
            .field("connected", &self.database.is_some())
            .finish()
    }
}

#[async_trait]
impl Source for MongoSource {
    async fn connect(&mut self) -> Result<()> {
        let client = Client::with_uri_str(self.url.as_str())
            .await
            .map_err(translate)?;
        self.database = Some(client.database(&self.database_name));
        Ok(())
    }

    async fn fetch(&self, collection: &str) -> Result<DocumentStream> {
        let database = self
            .database
            .as_ref()
            .ok_or_else(|| Error::connection("source is not connected"))?;

        let mut cursor = database
            .collection::<bson::Document>(collection)
            .find(bson::doc! {})
            .await
            .map_err(translate)?;

        Ok(DocumentStream::from_stream(async_stream::stream! {
            while let Some(result) = cursor.next().await {
                yield result.map(|doc| value::to_document(&doc)).map_err(translate);
            }
        }))
    }
}

fn translate(err: mongodb::error::Error) -> Error {
    Error::connection(err.to_string())
}
