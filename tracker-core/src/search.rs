//! Search-as-you-type over [`WeatherProvider::search_cities`].
//!
//! Each input restarts a quiescence timer; only input that survives the
//! whole window reaches the provider. Short input never does.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::{oneshot, watch};
use tracing::debug;

use crate::{model::CitySearchMatch, provider::WeatherProvider};

/// Quiescence period after the last input before a search is issued.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Shortest trimmed query (in characters) that is sent to the provider.
pub const MIN_QUERY_CHARS: usize = 3;

/// Debounced city search for a single input field.
///
/// Results are published on a [`watch`] channel. A failed search publishes
/// an empty list, the same as a search with no matches.
#[derive(Debug)]
pub struct SearchDebouncer {
    provider: Arc<dyn WeatherProvider>,
    window: Duration,
    /// Bumped on every input; a fired search only publishes if it is current.
    latest: Arc<AtomicU64>,
    /// Dropping the sender cancels the scheduled task if it has not fired.
    pending: Option<oneshot::Sender<()>>,
    results: Arc<watch::Sender<Vec<CitySearchMatch>>>,
}

impl SearchDebouncer {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self::with_window(provider, DEBOUNCE_WINDOW)
    }

    pub fn with_window(provider: Arc<dyn WeatherProvider>, window: Duration) -> Self {
        let (results, _) = watch::channel(Vec::new());
        Self {
            provider,
            window,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
            results: Arc::new(results),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<CitySearchMatch>> {
        self.results.subscribe()
    }

    /// Whether a search is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Feed the current contents of the search field.
    ///
    /// Must be called from within a tokio runtime.
    pub fn input(&mut self, text: &str) {
        self.pending = None;

        let query = text.trim().to_string();
        let too_short = query.chars().count() < MIN_QUERY_CHARS;

        // the ticket is taken under the channel lock so a fired search can
        // never publish after a newer input
        let latest = &self.latest;
        let mut ticket = 0;
        self.results.send_if_modified(|current| {
            ticket = latest.fetch_add(1, Ordering::SeqCst) + 1;
            if too_short {
                current.clear();
            }
            too_short
        });

        if too_short {
            return;
        }

        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.pending = Some(cancel_tx);

        let provider = Arc::clone(&self.provider);
        let latest = Arc::clone(&self.latest);
        let results = Arc::clone(&self.results);
        let window = self.window;

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(window) => {}
                _ = cancel_rx => {
                    debug!(query = %query, "search superseded before firing");
                    return;
                }
            }

            let matches = match provider.search_cities(&query).await {
                Ok(matches) => matches,
                Err(e) => {
                    debug!(query = %query, error = %e, "city search failed");
                    Vec::new()
                }
            };

            let published = results.send_if_modified(|current| {
                if latest.load(Ordering::SeqCst) != ticket {
                    return false;
                }
                *current = matches;
                true
            });

            if !published {
                debug!(query = %query, "dropping stale search results");
            }
        });
    }
}
