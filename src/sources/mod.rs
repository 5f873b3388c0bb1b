//! Data source adapters
//!
//! Every domain (weather, flights, hotels, places) has one adapter type with a
//! strategy picked once at construction:
//! - `Mock`: deterministic synthetic data seeded by the query
//! - `Live`: an external provider, failing over to the mock on any error
//!
//! Provider errors never leave an adapter.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sha2::{Digest, Sha256};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::PlanningError;
use crate::error::ProviderError;
use crate::models::Provenance;

pub mod flights;
pub mod google_places;
pub mod hotels;
pub mod places;
pub mod weather;

pub use flights::{FlightAdapter, FlightQuery};
pub use hotels::{HotelAdapter, HotelQuery};
pub use places::{PlacesAdapter, PlacesQuery};
pub use weather::{WeatherAdapter, WeatherQuery};

/// Deterministic data keyed only by the query
pub trait MockSource<Q, O>: Send + Sync {
    fn generate(&self, query: &Q) -> O;
}

/// An external provider
#[async_trait]
pub trait LiveSource<Q, O>: Send + Sync {
    /// Provider label used in logs
    fn name(&self) -> &str;

    async fn fetch(&self, query: &Q) -> Result<O, ProviderError>;
}

/// Which variant answers an adapter's calls
pub enum SourceStrategy<Q, O> {
    Mock(Arc<dyn MockSource<Q, O>>),
    Live {
        live: Arc<dyn LiveSource<Q, O>>,
        fallback: Arc<dyn MockSource<Q, O>>,
        timeout: Duration,
    },
}

/// A value plus where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<O> {
    pub value: O,
    pub provenance: Provenance,
}

/// One domain's data source with its fallback policy and normalization
pub struct DataSourceAdapter<Q, O> {
    domain: &'static str,
    strategy: SourceStrategy<Q, O>,
    normalize: fn(O) -> O,
}

impl<Q, O> DataSourceAdapter<Q, O>
where
    Q: Debug + Send + Sync + 'static,
    O: Send + 'static,
{
    pub fn new(domain: &'static str, strategy: SourceStrategy<Q, O>) -> Self {
        Self {
            domain,
            strategy,
            normalize: |value| value,
        }
    }

    /// Post-process every answer, whichever variant produced it
    #[must_use]
    pub fn with_normalizer(mut self, normalize: fn(O) -> O) -> Self {
        self.normalize = normalize;
        self
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self.strategy, SourceStrategy::Live { .. })
    }

    /// Fetch data for `query`; never fails
    #[instrument(name = "adapter_fetch", skip(self), fields(domain = self.domain))]
    pub async fn fetch(&self, query: &Q) -> Sourced<O> {
        let (value, provenance) = match &self.strategy {
            SourceStrategy::Mock(mock) => {
                debug!("Serving mock data");
                (mock.generate(query), Provenance::Mock)
            }
            SourceStrategy::Live {
                live,
                fallback,
                timeout: limit,
            } => {
                let outcome = match timeout(*limit, live.fetch(query)).await {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout(*limit)),
                };
                match outcome {
                    Ok(value) => {
                        debug!(provider = live.name(), "Live provider answered");
                        (value, Provenance::Live)
                    }
                    Err(e) => {
                        warn!(
                            provider = live.name(),
                            error = %e,
                            "Live provider failed, falling back to mock data"
                        );
                        (fallback.generate(query), Provenance::Fallback)
                    }
                }
            }
        };

        Sourced {
            value: (self.normalize)(value),
            provenance,
        }
    }
}

/// Pick the strategy for one domain from the provider settings
///
/// Mock mode always wins. In live mode a live source that could not be built
/// (typically a missing credential) degrades to mock data, unless
/// `strict_credentials` is set, in which case the planner refuses to start.
pub fn select_strategy<Q, O>(
    domain: &str,
    use_mock_data: bool,
    strict_credentials: bool,
    live: Result<Arc<dyn LiveSource<Q, O>>, ProviderError>,
    mock: Arc<dyn MockSource<Q, O>>,
    timeout: Duration,
) -> crate::Result<SourceStrategy<Q, O>>
where
    Q: Send + Sync + 'static,
    O: Send + 'static,
{
    if use_mock_data {
        debug!(domain, "Mock data enabled");
        return Ok(SourceStrategy::Mock(mock));
    }

    match live {
        Ok(live) => Ok(SourceStrategy::Live {
            live,
            fallback: mock,
            timeout,
        }),
        Err(e) if strict_credentials => Err(PlanningError::configuration(format!(
            "{domain} provider unavailable: {e}"
        ))),
        Err(e) => {
            warn!(domain, error = %e, "Live provider not configured, using mock data");
            Ok(SourceStrategy::Mock(mock))
        }
    }
}

/// Random generator seeded from the given key parts, case-insensitively
pub(crate) fn seeded_rng(parts: &[&str]) -> StdRng {
    StdRng::from_seed(seed_bytes(parts))
}

/// SHA-256 over the normalized parts, each terminated by 0xff
fn seed_bytes(parts: &[&str]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.trim().to_lowercase().as_bytes());
        hasher.update([0xff]);
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Query(u32);

    struct Doubling;

    impl MockSource<Query, Vec<u32>> for Doubling {
        fn generate(&self, query: &Query) -> Vec<u32> {
            vec![query.0 * 2, query.0]
        }
    }

    enum LiveBehaviour {
        Answer,
        Fail,
        Hang,
    }

    struct FakeLive {
        behaviour: LiveBehaviour,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LiveSource<Query, Vec<u32>> for FakeLive {
        fn name(&self) -> &str {
            "fake"
        }

        async fn fetch(&self, query: &Query) -> Result<Vec<u32>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                LiveBehaviour::Answer => Ok(vec![query.0 + 100]),
                LiveBehaviour::Fail => Err(ProviderError::Status {
                    status: 503,
                    message: "unavailable".to_string(),
                }),
                LiveBehaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(vec![])
                }
            }
        }
    }

    fn live_adapter(behaviour: LiveBehaviour) -> DataSourceAdapter<Query, Vec<u32>> {
        DataSourceAdapter::new(
            "test",
            SourceStrategy::Live {
                live: Arc::new(FakeLive {
                    behaviour,
                    calls: AtomicUsize::new(0),
                }),
                fallback: Arc::new(Doubling),
                timeout: Duration::from_millis(50),
            },
        )
    }

    #[tokio::test]
    async fn test_mock_strategy() {
        let adapter = DataSourceAdapter::new("test", SourceStrategy::Mock(Arc::new(Doubling)));
        let result = adapter.fetch(&Query(4)).await;
        assert_eq!(result.value, vec![8, 4]);
        assert_eq!(result.provenance, Provenance::Mock);
        assert!(!adapter.is_live());
    }

    #[tokio::test]
    async fn test_live_answer_is_used() {
        let result = live_adapter(LiveBehaviour::Answer).fetch(&Query(1)).await;
        assert_eq!(result.value, vec![101]);
        assert_eq!(result.provenance, Provenance::Live);
    }

    #[tokio::test]
    async fn test_live_failure_falls_back_to_mock() {
        let result = live_adapter(LiveBehaviour::Fail).fetch(&Query(3)).await;
        assert_eq!(result.value, vec![6, 3]);
        assert_eq!(result.provenance, Provenance::Fallback);
    }

    #[tokio::test]
    async fn test_live_timeout_falls_back_to_mock() {
        let result = live_adapter(LiveBehaviour::Hang).fetch(&Query(5)).await;
        assert_eq!(result.value, vec![10, 5]);
        assert_eq!(result.provenance, Provenance::Fallback);
    }

    #[tokio::test]
    async fn test_normalizer_applies_to_every_variant() {
        fn sort(mut v: Vec<u32>) -> Vec<u32> {
            v.sort_unstable();
            v
        }
        let adapter = live_adapter(LiveBehaviour::Fail).with_normalizer(sort);
        assert_eq!(adapter.fetch(&Query(3)).await.value, vec![3, 6]);
    }

    fn missing() -> Result<Arc<dyn LiveSource<Query, Vec<u32>>>, ProviderError> {
        Err(ProviderError::MissingCredential("test.api_key".to_string()))
    }

    #[test]
    fn test_select_strategy() {
        let mock: Arc<dyn MockSource<Query, Vec<u32>>> = Arc::new(Doubling);
        let timeout = Duration::from_secs(1);

        let strategy = select_strategy("test", false, false, missing(), mock.clone(), timeout);
        assert!(matches!(strategy, Ok(SourceStrategy::Mock(_))));

        let strategy = select_strategy("test", false, true, missing(), mock.clone(), timeout);
        assert!(matches!(strategy, Err(PlanningError::Configuration { .. })));

        let strategy = select_strategy("test", true, true, missing(), mock.clone(), timeout);
        assert!(matches!(strategy, Ok(SourceStrategy::Mock(_))));

        let live: Arc<dyn LiveSource<Query, Vec<u32>>> = Arc::new(FakeLive {
            behaviour: LiveBehaviour::Answer,
            calls: AtomicUsize::new(0),
        });
        let strategy = select_strategy("test", false, true, Ok(live), mock, timeout);
        assert!(matches!(strategy, Ok(SourceStrategy::Live { .. })));
    }

    #[test]
    fn test_seeded_rng_is_deterministic_and_case_insensitive() {
        let a: u64 = seeded_rng(&["Paris", "june"]).random_range(0..u64::MAX);
        let b: u64 = seeded_rng(&[" paris", "JUNE"]).random_range(0..u64::MAX);
        let c: u64 = seeded_rng(&["Rome", "june"]).random_range(0..u64::MAX);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_seed_is_stable_across_builds() {
        assert_eq!(
            seed_bytes(&["Weather", " Paris "]),
            [
                0xcb, 0x84, 0xaf, 0x65, 0xdc, 0x1f, 0x9b, 0xbf, 0xb4, 0x10, 0xef, 0xf3, 0xa5, 0x97,
                0x3f, 0x31, 0x6e, 0xca, 0x85, 0x03, 0x86, 0xd0, 0x52, 0x38, 0xd9, 0x5f, 0xc6, 0x4f,
                0x40, 0x32, 0x83, 0x94,
            ]
        );
        assert_ne!(seed_bytes(&["ab", "c"]), seed_bytes(&["a", "bc"]));
    }
}
