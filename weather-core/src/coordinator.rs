//! Orchestrates weather lookups for a single screen.
//!
//! The coordinator owns all application state: the unit preference, the
//! current reading, and the one request that may be in flight. Each lookup
//! runs as its own task and hands its result back over a oneshot channel;
//! only the coordinator applies results. Submitting while a lookup is in
//! flight aborts the older one, so the latest request always wins.

use std::{fmt, sync::Arc};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::{ErrorKind, FetchError, SearchError, ValidationError},
    location::LocationError,
    model::{Coordinates, LocationQuery, WeatherReading},
    provider::WeatherFetcher,
    request::{DEFAULT_COUNTRY_CODE, RequestBuilder, default_endpoint, redact},
    units::{DisplayTemperature, TemperatureUnit},
};

/// Everything the coordinator needs to know at construction.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    /// Appended to city searches as `q=<city>,<country>`. `None` omits it.
    pub country_code: Option<String>,
    pub endpoint: Url,
    pub unit: TemperatureUnit,
}

impl SearchConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            country_code: Some(DEFAULT_COUNTRY_CODE.to_string()),
            endpoint: default_endpoint(),
            unit: TemperatureUnit::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notifications for the display layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    LoadingChanged(bool),
    Result { temperature: DisplayTemperature, city_label: String },
    Error { kind: ErrorKind, message: String },
}

/// How a completed lookup was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Updated { temperature: DisplayTemperature, city_label: String },
    Failed(SearchError),
}

#[derive(Debug, Default)]
struct AppState {
    phase: Phase,
    unit: TemperatureUnit,
    current: Option<Current>,
}

/// Reading and its rendered value, replaced together.
#[derive(Debug, Clone)]
struct Current {
    reading: WeatherReading,
    display: DisplayTemperature,
}

struct InFlight {
    id: RequestId,
    query: LocationQuery,
    task: JoinHandle<()>,
    result: oneshot::Receiver<Result<WeatherReading, FetchError>>,
}

pub struct SearchCoordinator {
    requests: RequestBuilder,
    fetcher: Arc<dyn WeatherFetcher>,
    state: AppState,
    last_id: u64,
    in_flight: Option<InFlight>,
    events: mpsc::UnboundedSender<SearchEvent>,
}

impl SearchCoordinator {
    pub fn new(
        config: SearchConfig,
        fetcher: Arc<dyn WeatherFetcher>,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let requests = RequestBuilder::new(config.endpoint, config.api_key, config.country_code);

        let coordinator = Self {
            requests,
            fetcher,
            state: AppState { unit: config.unit, ..AppState::default() },
            last_id: 0,
            in_flight: None,
            events,
        };

        (coordinator, rx)
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.state.unit
    }

    pub fn current_reading(&self) -> Option<&WeatherReading> {
        self.state.current.as_ref().map(|c| &c.reading)
    }

    pub fn display(&self) -> Option<DisplayTemperature> {
        self.state.current.as_ref().map(|c| c.display)
    }

    pub fn submit_city_name(&mut self, text: &str) -> Result<RequestId, SearchError> {
        if text.trim().is_empty() {
            return Err(self.reject(ValidationError::EmptyCity));
        }

        self.submit(LocationQuery::city(text))
    }

    /// Starts a lookup for the position the platform reported, or rejects
    /// it when no position could be resolved.
    pub fn submit_geolocation(
        &mut self,
        location: Result<Coordinates, LocationError>,
    ) -> Result<RequestId, SearchError> {
        match location {
            Ok(coordinates) => self.submit(LocationQuery::Coordinates(coordinates)),
            Err(e) => {
                warn!(error = %e, "no location available for weather lookup");
                Err(self.reject(ValidationError::NoLocation))
            }
        }
    }

    pub fn submit(&mut self, query: LocationQuery) -> Result<RequestId, SearchError> {
        if matches!(&query, LocationQuery::CityName(name) if name.trim().is_empty()) {
            return Err(self.reject(ValidationError::EmptyCity));
        }

        let url = self.requests.url_for(&query);

        if let Some(previous) = self.in_flight.take() {
            debug!(superseded = %previous.id, "aborting superseded weather lookup");
            previous.task.abort();
        }

        self.last_id += 1;
        let id = RequestId(self.last_id);
        debug!(request = %id, url = %redact(&url), "starting weather lookup");

        let (tx, rx) = oneshot::channel();
        let fetcher = Arc::clone(&self.fetcher);
        let task = tokio::spawn(async move {
            let result = fetcher.fetch_weather(&url).await;
            // Receiver is gone if this lookup was superseded.
            let _ = tx.send(result);
        });

        self.in_flight = Some(InFlight { id, query, task, result: rx });

        if self.state.phase == Phase::Idle {
            self.state.phase = Phase::Loading;
            self.emit(SearchEvent::LoadingChanged(true));
        }

        Ok(id)
    }

    /// Waits for the in-flight lookup and applies it. Returns `None` when
    /// nothing is in flight.
    ///
    /// Cancel safe: dropping the future leaves the lookup in flight.
    pub async fn next_outcome(&mut self) -> Option<SearchOutcome> {
        let received = match self.in_flight.as_mut() {
            Some(in_flight) => (&mut in_flight.result).await,
            None => return None,
        };
        let in_flight = self.in_flight.take()?;

        let result = received.unwrap_or_else(|_| {
            Err(FetchError::Internal(format!(
                "weather lookup {} ended without a result",
                in_flight.id
            )))
        });

        Some(self.complete(in_flight, result))
    }

    /// Switches the display unit, re-rendering the current reading without
    /// a new request.
    pub fn toggle_unit(&mut self, unit: TemperatureUnit) -> Option<DisplayTemperature> {
        self.state.unit = unit;

        let current = self.state.current.as_mut()?;
        current.display = DisplayTemperature::from_kelvin(current.reading.temperature_kelvin, unit);

        let event = SearchEvent::Result {
            temperature: current.display,
            city_label: current.reading.city_label.clone(),
        };
        let display = current.display;
        self.emit(event);

        Some(display)
    }

    fn complete(
        &mut self,
        in_flight: InFlight,
        result: Result<WeatherReading, FetchError>,
    ) -> SearchOutcome {
        self.state.phase = Phase::Idle;
        self.emit(SearchEvent::LoadingChanged(false));

        match result {
            Ok(mut reading) => {
                reading.city_label = in_flight.query.label(&reading.city_label);
                let temperature =
                    DisplayTemperature::from_kelvin(reading.temperature_kelvin, self.state.unit);
                info!(
                    request = %in_flight.id,
                    city = %reading.city_label,
                    temperature = %temperature,
                    "weather updated"
                );

                let city_label = reading.city_label.clone();
                self.state.current = Some(Current { reading, display: temperature });
                self.emit(SearchEvent::Result { temperature, city_label: city_label.clone() });

                SearchOutcome::Updated { temperature, city_label }
            }
            Err(e) => {
                warn!(request = %in_flight.id, error = %e, "weather lookup failed");
                let err = SearchError::from(e);
                self.emit_error(&err);

                SearchOutcome::Failed(err)
            }
        }
    }

    fn reject(&self, e: ValidationError) -> SearchError {
        debug!(error = %e, "rejected weather lookup");
        let err = SearchError::from(e);
        self.emit_error(&err);
        err
    }

    fn emit_error(&self, err: &SearchError) {
        self.emit(SearchEvent::Error { kind: err.kind(), message: err.user_message().to_string() });
    }

    fn emit(&self, event: SearchEvent) {
        // Nobody listening is fine; state is still queryable.
        let _ = self.events.send(event);
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.task.abort();
        }
    }
}

impl fmt::Debug for SearchCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("state", &self.state)
            .field("in_flight", &self.in_flight.as_ref().map(|i| i.id))
            .finish_non_exhaustive()
    }
}
