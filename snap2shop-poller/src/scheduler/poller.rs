//! Job status poller
//!
//! Keeps a local view of a shop's indexing job by re-fetching its status on
//! a fixed interval until the job reaches a terminal state. Each poller runs
//! at most one session, as a single tokio task, and stops it when dropped.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use snap2shop_core::domain::index::{IndexStatus, JobId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::PollError;
use crate::repository::IndexRepository;
use crate::scheduler::decision::{Step, next_step};

type Observer = Arc<dyn Fn(&IndexStatus) + Send + Sync>;

/// Polls a shop's indexing status until the job finishes
///
/// Sessions are started with [`start`](Self::start) or
/// [`trigger_job`](Self::trigger_job) and must be started from within a
/// Tokio runtime.
pub struct JobStatusPoller {
    shared: Arc<Shared>,
    interval: Duration,
    session: Mutex<Option<Session>>,
    next_session_id: AtomicU64,
}

struct Session {
    id: u64,
    shop: String,
    handle: JoinHandle<()>,
}

/// State reachable from both the poller handle and its session task
struct Shared {
    repository: Arc<dyn IndexRepository>,
    observers: RwLock<Vec<Observer>>,
    last_known: Mutex<Option<IndexStatus>>,
    in_flight: Mutex<HashSet<String>>,
    /// Id of the running session, `None` when idle
    active: watch::Sender<Option<u64>>,
}

impl JobStatusPoller {
    /// Creates a poller fetching from `repository` every `interval`
    pub fn new(repository: Arc<dyn IndexRepository>, interval: Duration) -> Self {
        let (active, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                repository,
                observers: RwLock::new(Vec::new()),
                last_known: Mutex::new(None),
                in_flight: Mutex::new(HashSet::new()),
                active,
            }),
            interval,
            session: Mutex::new(None),
            next_session_id: AtomicU64::new(1),
        }
    }

    /// Creates a poller talking HTTP to the configured backend
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;
        let client = config.build_client()?;
        Ok(Self::new(Arc::new(client), config.poll_interval))
    }

    /// Registers an observer called with every successfully fetched snapshot
    ///
    /// Observers are not called when a fetch fails.
    pub fn on_update<F>(&self, callback: F)
    where
        F: Fn(&IndexStatus) + Send + Sync + 'static,
    {
        write(&self.shared.observers).push(Arc::new(callback));
    }

    /// The most recent successfully fetched snapshot
    pub fn last_known(&self) -> Option<IndexStatus> {
        lock(&self.shared.last_known).clone()
    }

    /// Whether a polling session is running
    pub fn is_polling(&self) -> bool {
        self.shared.active.borrow().is_some()
    }

    /// Performs exactly one status query
    ///
    /// On success the snapshot replaces the last-known one and observers are
    /// notified. On failure the last-known snapshot is left untouched. Fails
    /// with [`PollError::InFlight`] without querying when a request for the
    /// same shop is already outstanding.
    pub async fn fetch_once(&self, shop_domain: &str) -> Result<IndexStatus, PollError> {
        self.shared.fetch_once(shop_domain, None).await
    }

    /// Starts polling `shop_domain`
    ///
    /// The first fetch happens immediately. Without `force` the session ends
    /// right away unless that fetch shows a pending job; with `force` it
    /// keeps going until a terminal status is seen. An unforced start does
    /// nothing when this shop is already being polled. A forced start
    /// replaces the running session, as does a start for another shop.
    pub fn start(&self, shop_domain: &str, force: bool) {
        let mut session = lock(&self.session);

        if let Some(current) = session.as_ref() {
            if !force && current.shop == shop_domain && self.shared.is_active(current.id) {
                debug!("Already polling {}", shop_domain);
                return;
            }
        }

        if let Some(previous) = session.take() {
            previous.handle.abort();
            if self.shared.finish(previous.id) {
                info!("Stopped polling {}", previous.shop);
            }
        }

        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        self.shared.active.send_replace(Some(id));

        info!(
            "Polling index status for {} (interval: {:?}, force: {})",
            shop_domain, self.interval, force
        );
        let handle = tokio::spawn(run_session(
            Arc::clone(&self.shared),
            id,
            shop_domain.to_string(),
            force,
            self.interval,
        ));

        *session = Some(Session {
            id,
            shop: shop_domain.to_string(),
            handle,
        });
    }

    /// Cancels the running session, if any
    pub fn stop(&self) {
        let Some(session) = lock(&self.session).take() else {
            return;
        };

        session.handle.abort();
        if self.shared.finish(session.id) {
            info!("Stopped polling {}", session.shop);
        }
    }

    /// Asks the backend to index `shop_domain` and polls the new job
    ///
    /// Polling is forced past the first fetch, which may still report the
    /// previous run's terminal status.
    pub async fn trigger_job(&self, shop_domain: &str) -> Result<JobId, PollError> {
        let triggered = self.shared.repository.trigger_indexing(shop_domain).await?;
        info!(
            "Triggered indexing job {} for {}",
            triggered.job_id, shop_domain
        );

        self.start(shop_domain, true);
        Ok(triggered.job_id)
    }

    /// Resolves once no session is running
    pub async fn wait_idle(&self) {
        let mut active = self.shared.active.subscribe();
        let _ = active.wait_for(|id| id.is_none()).await;
    }
}

impl Drop for JobStatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    /// Fetches once; a snapshot fetched for a session that has since been
    /// stopped or replaced is returned but not recorded or published
    async fn fetch_once(
        &self,
        shop_domain: &str,
        session: Option<u64>,
    ) -> Result<IndexStatus, PollError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, shop_domain)?;

        let status = self.repository.fetch_status(shop_domain).await?;
        debug!("Fetched status {} for {}", status.status, shop_domain);

        if session.is_some_and(|id| !self.is_active(id)) {
            debug!("Discarding status for {} from a stopped session", shop_domain);
            return Ok(status);
        }

        *lock(&self.last_known) = Some(status.clone());
        self.publish(&status);
        Ok(status)
    }

    fn publish(&self, status: &IndexStatus) {
        let observers = read(&self.observers).clone();
        for observer in observers {
            observer(status);
        }
    }

    fn is_active(&self, id: u64) -> bool {
        *self.active.borrow() == Some(id)
    }

    /// Marks session `id` as ended; false if another session took over
    fn finish(&self, id: u64) -> bool {
        self.active.send_if_modified(|active| {
            if *active == Some(id) {
                *active = None;
                true
            } else {
                false
            }
        })
    }
}

async fn run_session(
    shared: Arc<Shared>,
    id: u64,
    shop_domain: String,
    force: bool,
    interval: Duration,
) {
    let mut initial = true;

    loop {
        let fetched = match shared.fetch_once(&shop_domain, Some(id)).await {
            Ok(status) => Some(status.status),
            Err(PollError::InFlight { .. }) => {
                debug!("Status request for {} already in flight", shop_domain);
                None
            }
            Err(e) => {
                warn!("Failed to fetch index status for {}: {}", shop_domain, e);
                None
            }
        };

        if !shared.is_active(id) {
            return;
        }

        let step = next_step(fetched.as_ref(), initial, force);
        if fetched.is_some() {
            initial = false;
        }

        if step == Step::Stop {
            if let Some(status) = fetched {
                info!("Done polling {} (status: {})", shop_domain, status);
            }
            break;
        }

        time::sleep(interval).await;
    }

    shared.finish(id);
}

/// Holds a shop's single-flight slot for the duration of a request
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    shop: String,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(set: &'a Mutex<HashSet<String>>, shop: &str) -> Result<Self, PollError> {
        if !lock(set).insert(shop.to_string()) {
            return Err(PollError::InFlight {
                shop: shop.to_string(),
            });
        }

        Ok(Self {
            set,
            shop: shop.to_string(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.shop);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
