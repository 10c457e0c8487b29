//! Explicit execution context handed to every pipeline stage.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Error;

/// Owns the worker pool used for per-gene work and the counters of
/// recoverable problems met along the way.
pub struct ExecutionContext {
    pool: ThreadPool,
    diagnostics: Diagnostics,
}

impl ExecutionContext {
    /// Create a context with `threads` workers (0 lets rayon decide).
    pub fn new(threads: usize) -> Result<Self, Error> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("genemodels-{i}"))
            .build()
            .map_err(|e| Error::Validation(format!("failed to build thread pool: {e}")))?;
        Ok(Self {
            pool,
            diagnostics: Diagnostics::default(),
        })
    }

    /// Single-worker context, mostly for tests.
    pub fn sequential() -> Result<Self, Error> {
        Self::new(1)
    }

    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `op` inside the context's pool so rayon iterators use its workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

/// Thread-safe counters of dropped rows.
#[derive(Debug, Default)]
pub struct Diagnostics {
    missing_gene_references: AtomicUsize,
    malformed_registry_rows: AtomicUsize,
    duplicate_records: AtomicUsize,
}

/// Point-in-time copy of [`Diagnostics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticCounts {
    pub missing_gene_references: usize,
    pub malformed_registry_rows: usize,
    pub duplicate_records: usize,
}

impl DiagnosticCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.missing_gene_references + self.malformed_registry_rows + self.duplicate_records
    }
}

impl Diagnostics {
    /// Count a recoverable error. Errors without a counter are only logged.
    pub fn record(&self, err: &Error) {
        log::debug!("dropped: {err}");
        let counter = match err {
            Error::MissingGeneReference { .. } => &self.missing_gene_references,
            Error::MalformedRegistryRow { .. } => &self.malformed_registry_rows,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a record discarded because another with the same accession was kept.
    pub fn record_duplicate(&self, what: &str, id: &str) {
        log::debug!("duplicate {what} '{id}' discarded");
        self.duplicate_records.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> DiagnosticCounts {
        DiagnosticCounts {
            missing_gene_references: self.missing_gene_references.load(Ordering::Relaxed),
            malformed_registry_rows: self.malformed_registry_rows.load(Ordering::Relaxed),
            duplicate_records: self.duplicate_records.load(Ordering::Relaxed),
        }
    }
}
