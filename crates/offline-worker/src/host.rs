//! Page controller provided by the host.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

/// Control over the pages a worker serves.
#[async_trait]
pub trait Clients: Send + Sync {
    /// Ask the host to activate this worker without waiting for old pages.
    async fn skip_waiting(&self);

    /// Take control of every open page without a reload.
    async fn claim(&self) -> anyhow::Result<()>;
}

/// Clients implementation that only counts calls.
#[derive(Debug, Default)]
pub struct RecordingClients {
    skip_waiting: AtomicUsize,
    claims: AtomicUsize,
}

impl RecordingClients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_waiting_calls(&self) -> usize {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    pub fn claim_calls(&self) -> usize {
        self.claims.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Clients for RecordingClients {
    async fn skip_waiting(&self) {
        self.skip_waiting.fetch_add(1, Ordering::SeqCst);
    }

    async fn claim(&self) -> anyhow::Result<()> {
        self.claims.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
