/// Environmental data aggregation.
///
/// Fans collaborator calls out on a shared thread pool and collects the
/// results over a channel:
///
///   t0  geocode(query) ─┐
///   t0  knowledge × 6 signals, × 3 local services
///   t1  weather(coords) ← starts when geocoding reports coordinates
///
/// Collection stops when every job has reported or the deadline passes.
/// A failed or late signal stays `None`; only a failed geocode ends the
/// request.
///
/// The pool outlives requests. Jobs a finished request left in the queue
/// are skipped, and the geocode runs on its own thread so it never waits
/// behind another request's knowledge queries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use threadpool::ThreadPool;
use tracing::{debug, info, warn};

use crate::ingest::knowledge::{LocalService, Signal, extract_quantity};
use crate::ingest::{Geocoder, KnowledgeSource, SourceError, WeatherSource};
use crate::model::{EmergencyContact, EnvironmentalSignals, LocationProfile, PlanError, WeatherConditions};

/// The collaborators one aggregation talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn WeatherSource>,
    pub knowledge: Arc<dyn KnowledgeSource>,
}

/// Everything gathered about a location before risk is assessed.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentalReport {
    pub location: LocationProfile,
    pub signals: EnvironmentalSignals,
    pub weather: Option<WeatherConditions>,
    /// Local services in `LocalService::ALL` order.
    pub local_contacts: Vec<EmergencyContact>,
}

enum JobResult {
    Location(Result<Option<LocationProfile>, SourceError>),
    Weather(Result<WeatherConditions, SourceError>),
    Signal(Signal, Result<String, SourceError>),
    Contact(LocalService, Result<String, SourceError>),
}

/// Per-request job bookkeeping. Dropping it marks the request finished.
struct RequestScope {
    tx: Sender<JobResult>,
    finished: Arc<AtomicBool>,
    pending: usize,
}

impl RequestScope {
    fn new(tx: Sender<JobResult>) -> Self {
        RequestScope {
            tx,
            finished: Arc::new(AtomicBool::new(false)),
            pending: 0,
        }
    }

    /// Queues a job on the shared pool. It is skipped if the request has
    /// finished by the time a worker picks it up.
    fn spawn<F>(&mut self, pool: &ThreadPool, job: F)
    where
        F: FnOnce() -> JobResult + Send + 'static,
    {
        let tx = self.tx.clone();
        let finished = Arc::clone(&self.finished);
        pool.execute(move || {
            if finished.load(Ordering::Acquire) {
                return;
            }
            // The receiver may be gone if the request already ended.
            let _ = tx.send(job());
        });
        self.pending += 1;
    }

    /// Runs a job on a thread of its own.
    fn spawn_dedicated<F>(&mut self, name: &str, job: F)
    where
        F: FnOnce() -> JobResult + Send + 'static,
    {
        let tx = self.tx.clone();
        match thread::Builder::new().name(name.to_string()).spawn(move || {
            let _ = tx.send(job());
        }) {
            Ok(_) => self.pending += 1,
            Err(e) => warn!(error = %e, job = name, "Failed to start job thread"),
        }
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.finished.store(true, Ordering::Release);
    }
}

pub struct Aggregator {
    pool: ThreadPool,
    sources: Collaborators,
    deadline: Duration,
}

impl Aggregator {
    pub fn new(sources: Collaborators, pool_size: usize, deadline: Duration) -> Self {
        Aggregator {
            pool: ThreadPool::with_name("collaborator".to_string(), pool_size.max(1)),
            sources,
            deadline,
        }
    }

    /// Gathers signals for one request.
    ///
    /// `query` goes to the geocoder; `place` is the human-readable place
    /// name used in knowledge-engine questions.
    ///
    /// # Errors
    /// `PlanError::LocationNotFound` when the geocoder has no match, fails,
    /// or does not answer before the deadline.
    pub fn gather(&self, query: &str, place: &str) -> Result<EnvironmentalReport, PlanError> {
        let started = Instant::now();
        let deadline = started + self.deadline;
        let (tx, rx) = mpsc::channel();
        let mut scope = RequestScope::new(tx);

        let geocoder = Arc::clone(&self.sources.geocoder);
        let geocode_query = query.to_string();
        scope.spawn_dedicated("geocode", move || JobResult::Location(geocoder.resolve(&geocode_query)));

        for signal in Signal::ALL {
            let knowledge = Arc::clone(&self.sources.knowledge);
            let question = signal.question(place);
            scope.spawn(&self.pool, move || JobResult::Signal(signal, knowledge.query(&question)));
        }

        for service in LocalService::ALL {
            let knowledge = Arc::clone(&self.sources.knowledge);
            let question = service.question(place);
            scope.spawn(&self.pool, move || JobResult::Contact(service, knowledge.query(&question)));
        }

        let mut location = None;
        let mut weather = None;
        let mut signals = EnvironmentalSignals::default();
        let mut contacts: [Option<EmergencyContact>; 3] = Default::default();

        while scope.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let result = match rx.recv_timeout(remaining) {
                Ok(result) => result,
                Err(RecvTimeoutError::Timeout) => {
                    warn!(pending = scope.pending, "Collection deadline passed; outstanding signals left empty");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            };
            scope.pending -= 1;

            match result {
                JobResult::Location(Ok(Some(profile))) => {
                    let source = Arc::clone(&self.sources.weather);
                    let coordinates = profile.coordinates;
                    scope.spawn(&self.pool, move || JobResult::Weather(source.current(coordinates)));
                    location = Some(profile);
                }
                JobResult::Location(Ok(None)) => {
                    info!(query, "Geocoder found no match");
                    return Err(PlanError::LocationNotFound(query.to_string()));
                }
                JobResult::Location(Err(e)) => {
                    warn!(query, error = %e, "Geocoding failed");
                    return Err(PlanError::LocationNotFound(query.to_string()));
                }
                JobResult::Weather(Ok(conditions)) => weather = Some(conditions),
                JobResult::Weather(Err(e)) => warn!(error = %e, "Weather unavailable"),
                JobResult::Signal(signal, Ok(answer)) => match extract_quantity(&answer, signal.unit()) {
                    Some(value) => signal.apply(&mut signals, value),
                    None => debug!(?signal, answer = %answer, "No usable quantity in answer"),
                },
                JobResult::Signal(signal, Err(e)) => warn!(?signal, error = %e, "Signal unavailable"),
                JobResult::Contact(service, Ok(answer)) => {
                    if let Some(slot) = LocalService::ALL.iter().position(|s| *s == service) {
                        contacts[slot] = service.to_contact(&answer, place);
                    }
                }
                JobResult::Contact(service, Err(e)) => debug!(?service, error = %e, "Local contact unavailable"),
            }
        }

        let Some(location) = location else {
            warn!(query, "Geocoder did not answer before the deadline");
            return Err(PlanError::LocationNotFound(query.to_string()));
        };

        if let Some(conditions) = &weather {
            signals.temperature = Some(conditions.temperature);
            signals.humidity = Some(conditions.humidity);
        }

        info!(
            place = %location.place_name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            has_weather = weather.is_some(),
            "Environmental signals gathered"
        );

        Ok(EnvironmentalReport {
            location,
            signals,
            weather,
            local_contacts: contacts.into_iter().flatten().collect(),
        })
    }
}
