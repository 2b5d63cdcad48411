use super::Document;

use std::{
    collections::VecDeque,
    fmt,
    pin::Pin,
    task::{Context, Poll},
};
use tokio_stream::{Stream, StreamExt};

type DynStream = Pin<Box<dyn Stream<Item = crate::Result<Document>> + Send + 'static>>;

/// A finite, single-pass sequence of documents fetched from a source
/// collection. May be backed by an in-memory buffer, a live cursor, or
/// both.
#[derive(Default)]
pub struct DocumentStream {
    buffer: VecDeque<Document>,
    stream: Option<DynStream>,
}

struct Iter<I> {
    iter: I,
}

impl DocumentStream {
    pub fn from_vec(documents: Vec<Document>) -> Self {
        Self {
            buffer: documents.into(),
            stream: None,
        }
    }

    pub fn from_stream<T>(stream: T) -> Self
    where
        T: Stream<Item = crate::Result<Document>> + Send + 'static,
    {
        Self {
            buffer: VecDeque::new(),
            stream: Some(Box::pin(stream)),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: Iterator<Item = crate::Result<Document>> + Send + Unpin + 'static,
    {
        Self::from_stream(Iter { iter })
    }

    /// Returns the next document in the stream
    pub async fn next(&mut self) -> Option<crate::Result<Document>> {
        StreamExt::next(self).await
    }

    pub async fn collect(mut self) -> crate::Result<Vec<Document>> {
        let mut ret = Vec::with_capacity(self.buffer.len());

        while let Some(res) = self.next().await {
            ret.push(res?);
        }

        Ok(ret)
    }
}

impl From<Vec<Document>> for DocumentStream {
    fn from(src: Vec<Document>) -> Self {
        Self::from_vec(src)
    }
}

impl Stream for DocumentStream {
    type Item = crate::Result<Document>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(document) = self.buffer.pop_front() {
            return Poll::Ready(Some(Ok(document)));
        }

        match &mut self.stream {
            Some(stream) => Pin::new(stream).poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

impl<I> Stream for Iter<I>
where
    I: Iterator<Item = crate::Result<Document>> + Unpin,
{
    type Item = crate::Result<Document>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.iter.next())
    }
}

impl fmt::Debug for DocumentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStream")
            .field("buffered", &self.buffer.len())
            .field("live", &self.stream.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Value;

    #[tokio::test]
    async fn buffered_stream_drains_in_order() {
        let mut first = Document::new();
        first.insert("id", Value::I64(1));
        let mut second = Document::new();
        second.insert("id", Value::I64(2));

        let mut stream = DocumentStream::from_vec(vec![first.clone(), second.clone()]);
        assert_eq!(stream.next().await.unwrap().unwrap(), first);
        assert_eq!(stream.next().await.unwrap().unwrap(), second);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn empty_stream_is_valid() {
        let docs = DocumentStream::from_vec(vec![]).collect().await.unwrap();
        assert!(docs.is_empty());
    }
}
