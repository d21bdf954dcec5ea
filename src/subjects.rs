#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use futures::future::{AbortHandle, abortable};
use tokio::sync::mpsc;

use crate::{
    api::{ApiError, MarksBackend},
    state::{self, AppState},
    types::{Subject, Year},
};

/// Outcome of one background subject fetch.
#[derive(Debug)]
pub struct SubjectLoad {
    /// Sequence number of the year change that started the fetch.
    pub generation: u64,
    /// Year the subjects were requested for.
    pub year:       Year,
    /// What the backend returned.
    pub result:     Result<Vec<Subject>, ApiError>,
}

/// What a year change asks of the subject options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum YearChange {
    /// The year was cleared; options should be emptied right away.
    Cleared,
    /// A fetch was started with this generation number.
    Loading(u64),
}

/// Reloads subject options whenever the selected year changes.
///
/// Only the newest fetch matters: starting one aborts whichever is still
/// running, and results carrying an older generation are dropped on receipt.
pub struct SubjectLoader<B: MarksBackend> {
    /// Backend the fetches go to.
    backend:    B,
    /// Generation of the most recent year change.
    generation: u64,
    /// Abort handle of the fetch still expected to report, if any.
    in_flight:  Option<AbortHandle>,
    /// Handed to each spawned fetch.
    tx:         mpsc::UnboundedSender<SubjectLoad>,
    /// Where finished fetches report.
    rx:         mpsc::UnboundedReceiver<SubjectLoad>,
}

impl<B: MarksBackend> SubjectLoader<B> {
    /// Creates an idle loader.
    pub fn new(backend: B) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            generation: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    /// Reacts to a new year selection.
    ///
    /// Must be called from within a tokio runtime when `year` is `Some`.
    pub fn year_changed(&mut self, year: Option<Year>) -> YearChange {
        self.generation += 1;
        if let Some(handle) = self.in_flight.take() {
            tracing::debug!("Superseding in-flight subject fetch");
            handle.abort();
        }

        let Some(year) = year else {
            return YearChange::Cleared;
        };

        let generation = self.generation;
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let (fetch, handle) = abortable(async move {
            let result = backend.fetch_subjects(year).await;
            let _ = tx.send(SubjectLoad {
                generation,
                year,
                result,
            });
        });
        tokio::spawn(fetch);
        self.in_flight = Some(handle);

        YearChange::Loading(generation)
    }

    /// True if `load` answers the most recent year change.
    pub fn is_current(&self, load: &SubjectLoad) -> bool {
        load.generation == self.generation
    }

    /// Waits for the fetch of the current year to finish.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn next(&mut self) -> Option<SubjectLoad> {
        while self.in_flight.is_some() {
            let load = self.rx.recv().await?;
            if self.is_current(&load) {
                self.in_flight = None;
                return Some(load);
            }
            tracing::debug!("Dropping stale subjects for year {}", load.year);
        }
        None
    }

    /// Returns the current fetch's result if it has already arrived.
    pub fn try_next(&mut self) -> Option<SubjectLoad> {
        while self.in_flight.is_some() {
            let load = self.rx.try_recv().ok()?;
            if self.is_current(&load) {
                self.in_flight = None;
                return Some(load);
            }
            tracing::debug!("Dropping stale subjects for year {}", load.year);
        }
        None
    }
}

impl<B: MarksBackend> Drop for SubjectLoader<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

/// Applies a finished fetch to the subject options.
///
/// A failed fetch empties the options.
pub fn apply_load(state: &AppState, load: SubjectLoad) -> AppState {
    match load.result {
        Ok(subjects) => {
            tracing::debug!("Loaded {} subjects for year {}", subjects.len(), load.year);
            state::replace_subjects(state, subjects)
        }
        Err(err) => {
            tracing::error!("Could not load subjects for year {}: {err}", load.year);
            state::replace_subjects(state, Vec::new())
        }
    }
}
