//! Background fetch worker for the browser TUI.
//!
//! The event loop is synchronous; network calls run on a dedicated
//! thread that owns the API client and a current-thread runtime.
//! Requests and responses carry the epoch of the search that issued
//! them so the UI side can discard results from a superseded search.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use kinodex_api::omdb::{LocalOmdbApi, OmdbClient, SearchPage, SearchParams, TitleDetail};

use crate::session::search::{Epoch, fetch_details};

/// Requests sent from the UI thread to the fetch thread.
#[derive(Debug)]
pub enum FetchRequest {
    /// Run a list search.
    Page {
        /// Epoch of the issuing search.
        epoch: Epoch,
        /// Search parameters including the page number.
        params: SearchParams,
    },
    /// Fetch detail records for a batch of identifiers.
    Details {
        /// Epoch of the issuing search.
        epoch: Epoch,
        /// Identifiers to fetch.
        ids: Vec<String>,
    },
    /// Stop the worker thread.
    Shutdown,
}

/// Responses sent from the fetch thread back to the UI thread.
#[derive(Debug)]
pub enum FetchResponse {
    /// Outcome of a list search.
    Page {
        /// Epoch the request carried.
        epoch: Epoch,
        /// Parsed page, or the transport/API error.
        result: Result<SearchPage>,
    },
    /// Outcome of a detail batch. Per-item failures are `None`.
    Details {
        /// Epoch the request carried.
        epoch: Epoch,
        /// Identifier/record pairs in request order.
        fetched: Vec<(String, Option<TitleDetail>)>,
    },
}

/// Handle to the fetch thread. Dropping it shuts the thread down.
#[derive(Debug)]
pub struct FetchWorker {
    request_tx: Sender<FetchRequest>,
    response_rx: Receiver<FetchResponse>,
    handle: Option<JoinHandle<()>>,
}

impl FetchWorker {
    /// Spawns the fetch thread around an owned API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(client: OmdbClient) -> Result<Self> {
        let (request_tx, request_rx) = channel::<FetchRequest>();
        let (response_tx, response_rx) = channel::<FetchResponse>();

        let handle = std::thread::Builder::new()
            .name(String::from("kinodex-fetch"))
            .spawn(move || run_worker(&client, &request_rx, &response_tx))
            .context("failed to spawn fetch worker thread")?;

        Ok(Self {
            request_tx,
            response_rx,
            handle: Some(handle),
        })
    }

    /// Queues a request. Errors only if the worker thread is gone.
    pub fn request(&self, request: FetchRequest) -> Result<()> {
        self.request_tx
            .send(request)
            .context("fetch worker thread is not running")
    }

    /// Drains every response currently waiting, without blocking.
    pub fn drain_responses(&self) -> Vec<FetchResponse> {
        let mut responses = Vec::new();
        loop {
            match self.response_rx.try_recv() {
                Ok(response) => responses.push(response),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        responses
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        let _ = self.request_tx.send(FetchRequest::Shutdown);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("fetch worker thread panicked");
        }
    }
}

/// Worker thread body: one request at a time, in arrival order.
fn run_worker(
    client: &OmdbClient,
    request_rx: &Receiver<FetchRequest>,
    response_tx: &Sender<FetchResponse>,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "failed to build fetch runtime");
            return;
        }
    };

    while let Ok(request) = request_rx.recv() {
        let response = match request {
            FetchRequest::Page { epoch, params } => {
                let result = runtime.block_on(client.search(&params));
                FetchResponse::Page { epoch, result }
            }
            FetchRequest::Details { epoch, ids } => {
                let fetched = runtime.block_on(fetch_details(client, &ids));
                FetchResponse::Details { epoch, fetched }
            }
            FetchRequest::Shutdown => break,
        };
        if response_tx.send(response).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn test_client() -> OmdbClient {
        OmdbClient::builder()
            .api_key("test-key")
            .user_agent("kinodex-test/0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_spawn_and_shutdown() {
        // Arrange
        let worker = FetchWorker::spawn(test_client()).unwrap();

        // Assert: no responses pending, drop joins cleanly
        assert!(worker.drain_responses().is_empty());
        drop(worker);
    }

    #[test]
    fn test_drain_is_non_blocking() {
        // Arrange
        let worker = FetchWorker::spawn(test_client()).unwrap();

        // Act: drain twice with nothing queued
        let first = worker.drain_responses();
        let second = worker.drain_responses();

        // Assert
        assert!(first.is_empty());
        assert!(second.is_empty());
    }
}
