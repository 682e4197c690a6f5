use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

use crate::docstore::DocPath;

/// One observed state of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocChange {
    pub path: DocPath,
    /// Version after the write; `0` when the document does not exist.
    pub version: u64,
    pub value: Option<Value>,
}

/// Live change feed for a single document.
///
/// Delivery is eventually consistent: a slow consumer skips intermediate
/// changes but always sees the latest one that arrives after it catches up.
#[derive(Debug)]
pub struct Subscription {
    path: DocPath,
    initial: Option<DocChange>,
    inner: BroadcastStream<DocChange>,
}

impl Subscription {
    pub(crate) fn new(initial: DocChange, rx: broadcast::Receiver<DocChange>) -> Self {
        Self {
            path: initial.path.clone(),
            initial: Some(initial),
            inner: BroadcastStream::new(rx),
        }
    }

    pub fn path(&self) -> &DocPath {
        &self.path
    }
}

impl Stream for Subscription {
    type Item = DocChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(initial) = self.initial.take() {
            return Poll::Ready(Some(initial));
        }
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(change))) => return Poll::Ready(Some(change)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    debug!(path = %self.path, skipped, "Subscriber lagged, skipping ahead");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
