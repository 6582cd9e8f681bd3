//! Shared world for the isochrone and overlap behaviour suites.
//!
//! Each request spins up a fresh Actix test service on its own system so the
//! synchronous step functions can drive async handlers. Domain state (cache,
//! clock, synthesiser) lives in the world and survives across requests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{App, test, web};
use serde_json::Value;

use isochrone_backend::Trace;
use isochrone_backend::domain::{IsochroneService, PolygonSynthesizer};
use isochrone_backend::inbound::http::configure_api;
use isochrone_backend::inbound::http::state::HttpState;
use isochrone_backend::outbound::cache::{CachePolicy, InMemoryIsochroneCache};
use isochrone_backend::test_support::MutableClock;

/// Cache lifetime used by every scenario.
pub const TTL: Duration = Duration::from_secs(3600);

/// Captured HTTP exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: u16,
    pub body: Value,
}

pub struct IsochroneWorld {
    pub clock: Arc<MutableClock>,
    pub cache: Arc<InMemoryIsochroneCache>,
    state: web::Data<HttpState>,
    pub responses: Vec<Exchange>,
}

impl IsochroneWorld {
    pub fn new<S>(synthesizer: S) -> Self
    where
        S: PolygonSynthesizer + 'static,
    {
        let clock = Arc::new(MutableClock::fixed());
        let cache = Arc::new(InMemoryIsochroneCache::new(
            CachePolicy::new(TTL, 64),
            clock.clone(),
        ));
        let service = IsochroneService::new(cache.clone(), Arc::new(synthesizer), clock.clone());
        Self {
            clock,
            cache,
            state: web::Data::new(HttpState::new(Arc::new(service))),
            responses: Vec::new(),
        }
    }

    /// POST `payload` to `path` and record the exchange.
    pub fn post(&mut self, path: &str, payload: Value) {
        let state = self.state.clone();
        let path = path.to_owned();
        let exchange = actix_rt::System::new().block_on(async move {
            let app = test::init_service(
                App::new()
                    .app_data(state)
                    .wrap(Trace)
                    .configure(configure_api),
            )
            .await;
            let request = test::TestRequest::post()
                .uri(&path)
                .set_json(payload)
                .to_request();
            let response = test::call_service(&app, request).await;
            let status = response.status().as_u16();
            let bytes = test::read_body(response).await;
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            Exchange { status, body }
        });
        self.responses.push(exchange);
    }

    pub fn last(&self) -> &Exchange {
        self.responses.last().expect("a request was made")
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len().expect("cache length")
    }
}

/// Convenience alias for the rstest fixture type.
pub type WorldFixture = Mutex<Option<IsochroneWorld>>;

/// Lock the world and run `f` against it.
pub fn with_world<T>(world: &WorldFixture, f: impl FnOnce(&mut IsochroneWorld) -> T) -> T {
    let mut guard = world.lock().expect("world lock");
    let world = guard.as_mut().expect("world initialised by a given step");
    f(world)
}
