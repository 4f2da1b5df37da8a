//! Bounded crawl worker pool
//!
//! A fixed number of workers drain a shared queue of admitted URLs. Each
//! worker fetches a URL, persists the page, resolves its links, and feeds
//! admitted discoveries back into the queue. Completion cannot be read off
//! an empty queue alone, because expansion re-populates it; the pool keeps
//! an outstanding-work count (incremented on enqueue, decremented when an
//! item's fetch and expansion have fully finished) and is done exactly when
//! that count reaches zero.
//!
//! Cancellation is cooperative: the token is checked before a dequeued URL
//! is fetched and before each admit. Once set, workers drain without new
//! fetches or admits and the pool reports done as soon as outstanding work
//! reaches zero; in-flight requests are not aborted.

use std::sync::{Arc, Mutex};

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::resolver::resolve;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::storage::SharedStorage;

/// One job's worker pool
#[derive(Clone)]
pub(crate) struct CrawlPool {
    pub job_id: i64,
    pub host: String,
    pub pool_size: usize,
    pub frontier: Arc<Frontier>,
    pub fetcher: Arc<Fetcher>,
    pub store: SharedStorage,
    pub sink: Arc<dyn ProgressSink>,
    pub cancel: CancellationToken,
    /// Serializes counter read + emit so the event stream stays monotonic
    pub emit_gate: Arc<Mutex<()>>,
}

impl CrawlPool {
    /// Runs the pool to completion, seeded with the start URL.
    ///
    /// Returns when there is no outstanding work left, either because the
    /// frontier stopped admitting (budget or exhaustion) or because
    /// cancellation drained the queue.
    pub async fn run(&self, start_url: Url) {
        let (work_tx, work_rx) = mpsc::unbounded_channel::<String>();
        let (expanded_tx, mut expanded_rx) = mpsc::unbounded_channel::<Vec<String>>();

        // The seed admit can only fail if the budget is zero, which job
        // creation rejects.
        let mut outstanding: usize = 0;
        if self.frontier.try_admit(start_url.as_str()) {
            outstanding += 1;
            let _ = work_tx.send(start_url.to_string());
        }
        if outstanding == 0 {
            return;
        }

        let workers = {
            let pool = self.clone();
            let expanded_tx = expanded_tx.clone();
            tokio::spawn(async move {
                UnboundedReceiverStream::new(work_rx)
                    .for_each_concurrent(pool.pool_size, |url| {
                        let pool = pool.clone();
                        let expanded_tx = expanded_tx.clone();
                        async move {
                            let admitted = pool.process_url(url).await;
                            let _ = expanded_tx.send(admitted);
                        }
                    })
                    .await;
            })
        };
        drop(expanded_tx);

        // The queue sender lives here: dropping it once outstanding work
        // hits zero closes the stream and lets the workers wind down.
        let mut work_tx = Some(work_tx);
        while let Some(admitted) = expanded_rx.recv().await {
            for url in admitted {
                if let Some(tx) = &work_tx {
                    outstanding += 1;
                    let _ = tx.send(url);
                }
            }

            outstanding -= 1;
            if outstanding == 0 {
                work_tx = None;
            }
        }

        let _ = workers.await;
    }

    /// Fetches one admitted URL and returns the newly admitted discoveries.
    ///
    /// Every failure here is contained: a fetch or persistence error
    /// consumes the URL's budget slot, yields no page and no links, and
    /// never ends the crawl.
    async fn process_url(&self, url: String) -> Vec<String> {
        if self.cancel.is_cancelled() {
            return Vec::new();
        }

        self.emit_progress(format!("Crawling: {}", url));

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", url, e);
                return Vec::new();
            }
        };

        // Persist before the page counts as processed, so a caller polling
        // status never sees a count the store has not recorded.
        {
            let mut store = self.store.lock().unwrap();
            if let Err(e) = store.create_page(self.job_id, &page) {
                tracing::error!("Failed to persist page {}: {}", page.url, e);
            }
        }
        self.frontier.mark_processed();

        let base = match Url::parse(&page.url) {
            Ok(base) => base,
            Err(e) => {
                tracing::warn!("Unparseable page URL {}: {}", page.url, e);
                return Vec::new();
            }
        };

        let mut admitted = Vec::new();
        for href in &page.hrefs {
            if self.cancel.is_cancelled() {
                break;
            }
            if let Some(resolved) = resolve(&base, &self.host, href) {
                let resolved = resolved.to_string();
                if self.frontier.try_admit(&resolved) {
                    admitted.push(resolved);
                }
            }
        }

        admitted
    }

    /// Emits one progress event with a fresh counter snapshot.
    ///
    /// The gate keeps concurrent workers from publishing snapshots out of
    /// order: the processed count never decreases across the event stream.
    fn emit_progress(&self, message: String) {
        let _guard = self.emit_gate.lock().unwrap();
        let (processed, total) = self.frontier.snapshot();
        self.sink.emit(ProgressEvent {
            job_id: self.job_id,
            message,
            processed,
            total,
        });
    }
}
