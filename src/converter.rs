//! Conversion cache.
//!
//! Serves conversion requests while avoiding redundant network fetches:
//! the most recently fetched [`RateRecord`] is reused as long as the
//! requested `(from, to, provider)` triple is unchanged and the record
//! is good. Listeners registered with [`Converter::subscribe`] are
//! notified once per completed request, success or failure.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::codes;
use crate::core::rate::{Conversion, RateRecord};
use crate::providers::ProviderFactory;

type Listener = Box<dyn Fn(&Conversion) + Send + Sync>;

struct CacheState {
    record: RateRecord,
    /// Sequence number of the newest request applied to the cache.
    /// Completions older than this are discarded, so two overlapping
    /// background fetches cannot replace the cache out of order.
    applied_seq: u64,
}

pub struct Converter {
    factory: Arc<dyn ProviderFactory>,
    state: Mutex<CacheState>,
    listeners: StdMutex<Vec<Listener>>,
    sequence: AtomicU64,
}

impl Converter {
    pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
        Converter {
            factory,
            state: Mutex::new(CacheState {
                record: RateRecord::placeholder(),
                applied_seq: 0,
            }),
            listeners: StdMutex::new(Vec::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Registers a listener invoked once per completed conversion.
    pub fn subscribe(&self, listener: impl Fn(&Conversion) + Send + Sync + 'static) {
        self.listeners
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(Box::new(listener));
    }

    /// Converts `amount` from one currency to another, fetching a rate
    /// only when the cached one cannot serve the request.
    pub async fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
        provider_id: u8,
    ) -> Conversion {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.convert_with_seq(seq, amount, from, to, provider_id)
            .await
            .conversion
    }

    /// Runs a conversion on a worker task. A completion superseded by a
    /// newer request leaves the cache untouched, skips notification,
    /// and resolves to `None`.
    pub fn spawn_convert(
        self: &Arc<Self>,
        amount: f64,
        from: &str,
        to: &str,
        provider_id: u8,
    ) -> JoinHandle<Option<Conversion>> {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let this = Arc::clone(self);
        let from = from.to_string();
        let to = to.to_string();
        tokio::spawn(async move {
            let completed = this
                .convert_with_seq(seq, amount, &from, &to, provider_id)
                .await;
            completed.applied.then_some(completed.conversion)
        })
    }

    async fn convert_with_seq(
        &self,
        seq: u64,
        amount: f64,
        from: &str,
        to: &str,
        provider_id: u8,
    ) -> Completed {
        let conversion = self.resolve(amount, from, to, provider_id).await;

        {
            let mut state = self.state.lock().await;
            if seq < state.applied_seq {
                warn!(
                    "Discarding stale completion {} (newest applied: {})",
                    seq, state.applied_seq
                );
                return Completed {
                    conversion,
                    applied: false,
                };
            }
            state.record = conversion.record.clone();
            state.applied_seq = seq;
        }

        self.notify(&conversion);
        Completed {
            conversion,
            applied: true,
        }
    }

    /// Produces the conversion result without touching the cache.
    async fn resolve(&self, amount: f64, from: &str, to: &str, provider_id: u8) -> Conversion {
        // Converting a currency to itself has no meaningful rate.
        if from == to {
            debug!("Same-currency request {}->{}, no fetch", from, to);
            return Conversion::failure(amount, RateRecord::failure(from, to, provider_id));
        }

        if !codes::is_known(from) || !codes::is_known(to) {
            warn!("Unknown currency code in request {}->{}", from, to);
            return Conversion::failure(amount, RateRecord::failure(from, to, provider_id));
        }

        {
            let state = self.state.lock().await;
            if state.record.matches(from, to, provider_id) {
                debug!(
                    "Cache hit for {}->{} via provider {}",
                    from, to, provider_id
                );
                return Conversion::success(amount, state.record.clone());
            }
        }
        debug!(
            "Cache miss for {}->{} via provider {}",
            from, to, provider_id
        );

        let fetched = match self.factory.create(provider_id) {
            Ok(provider) => provider.fetch_rate(from, to, amount).await,
            Err(err) => Err(err),
        };

        match fetched {
            Ok(record) => Conversion::success(amount, record),
            Err(err) => {
                warn!("Rate fetch failed for {}->{}: {}", from, to, err);
                Conversion::failure(amount, RateRecord::failure(from, to, provider_id))
            }
        }
    }

    // A panicking listener poisons the guard; recover it so later
    // conversions keep notifying instead of panicking themselves.
    fn notify(&self, conversion: &Conversion) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(conversion);
        }
    }
}

struct Completed {
    conversion: Conversion,
    applied: bool,
}
