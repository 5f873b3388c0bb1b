//! Attraction source: Google Places (live) and a seeded mock

use async_trait::async_trait;
use rand::RngExt;
use rand::rngs::StdRng;
use tracing::instrument;

use super::google_places::{GooglePlacesClient, PlaceResult};
use super::{DataSourceAdapter, LiveSource, MockSource, SourceStrategy, seeded_rng};
use crate::error::ProviderError;
use crate::models::{Attraction, AttractionCategory};

pub type PlacesAdapter = DataSourceAdapter<PlacesQuery, Vec<Attraction>>;

/// Most attractions requested for any trip
pub const MAX_ATTRACTIONS: usize = 20;
const ATTRACTIONS_PER_DAY: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacesQuery {
    pub destination: String,
    pub days: u32,
}

impl PlacesQuery {
    /// Size of the attraction pool asked for
    #[must_use]
    pub fn limit(&self) -> usize {
        (self.days as usize * ATTRACTIONS_PER_DAY).min(MAX_ATTRACTIONS)
    }
}

pub fn places_adapter(strategy: SourceStrategy<PlacesQuery, Vec<Attraction>>) -> PlacesAdapter {
    DataSourceAdapter::new("places", strategy)
}

fn subtypes(category: AttractionCategory) -> &'static [&'static str] {
    match category {
        AttractionCategory::Historical => {
            &["Monument", "Palace", "Fort", "Archaeological Site", "Heritage Site"]
        }
        AttractionCategory::Cultural => &["Museum", "Art Gallery", "Theater", "Cultural Center"],
        AttractionCategory::Natural => &["Park", "Garden", "Lake", "Beach", "Viewpoint"],
        AttractionCategory::Entertainment => &["Amusement Park", "Zoo", "Aquarium", "Market"],
        AttractionCategory::Religious => &["Temple", "Church", "Mosque", "Monastery", "Shrine"],
    }
}

struct Landmark {
    city: &'static str,
    category: AttractionCategory,
    name: &'static str,
    description: &'static str,
}

const fn landmark(
    city: &'static str,
    category: AttractionCategory,
    name: &'static str,
    description: &'static str,
) -> Landmark {
    Landmark {
        city,
        category,
        name,
        description,
    }
}

/// Landmarks of a few well-known cities
const FAMOUS_PLACES: &[Landmark] = &[
    landmark(
        "paris",
        AttractionCategory::Historical,
        "Eiffel Tower",
        "Iconic iron lattice tower and symbol of Paris",
    ),
    landmark(
        "paris",
        AttractionCategory::Historical,
        "Arc de Triomphe",
        "Monumental arch honoring French military victories",
    ),
    landmark(
        "paris",
        AttractionCategory::Cultural,
        "Louvre Museum",
        "World's largest art museum and historic monument",
    ),
    landmark(
        "paris",
        AttractionCategory::Cultural,
        "Musée d'Orsay",
        "Museum featuring Impressionist and Post-Impressionist masterpieces",
    ),
    landmark(
        "london",
        AttractionCategory::Historical,
        "Tower of London",
        "Historic castle and UNESCO World Heritage Site",
    ),
    landmark(
        "london",
        AttractionCategory::Historical,
        "Buckingham Palace",
        "Official residence of the British monarch",
    ),
    landmark(
        "london",
        AttractionCategory::Cultural,
        "British Museum",
        "World-famous museum of human history and culture",
    ),
    landmark(
        "tokyo",
        AttractionCategory::Historical,
        "Senso-ji Temple",
        "Ancient Buddhist temple in Asakusa",
    ),
    landmark(
        "tokyo",
        AttractionCategory::Historical,
        "Imperial Palace",
        "Primary residence of the Emperor of Japan",
    ),
    landmark(
        "tokyo",
        AttractionCategory::Cultural,
        "Tokyo National Museum",
        "Japan's oldest and largest museum",
    ),
    landmark(
        "new york",
        AttractionCategory::Historical,
        "Statue of Liberty",
        "Iconic symbol of freedom and democracy",
    ),
    landmark(
        "new york",
        AttractionCategory::Historical,
        "Empire State Building",
        "Art Deco skyscraper and American cultural icon",
    ),
];

fn famous_places(
    destination: &str,
    category: AttractionCategory,
) -> impl Iterator<Item = &'static Landmark> {
    let city = destination.trim().to_lowercase();
    FAMOUS_PLACES
        .iter()
        .filter(move |place| place.city == city && place.category == category)
}

const VISIT_DURATIONS: [&str; 5] = ["1-2 hours", "2-3 hours", "3-4 hours", "Half day", "Full day"];

/// Seeded synthetic attractions with real landmarks for well-known cities
#[derive(Debug, Clone, Copy, Default)]
pub struct MockPlaces;

impl MockSource<PlacesQuery, Vec<Attraction>> for MockPlaces {
    fn generate(&self, query: &PlacesQuery) -> Vec<Attraction> {
        let mut rng = seeded_rng(&["places", &query.destination]);
        let limit = query.limit();
        let per_category = limit.div_ceil(AttractionCategory::ALL.len()).max(2);
        let destination = query.destination.as_str();

        let by_category: Vec<Vec<Attraction>> = AttractionCategory::ALL
            .iter()
            .map(|&category| {
                let mut famous = famous_places(destination, category);
                (0..per_category)
                    .map(|i| mock_attraction(&mut rng, destination, category, i, famous.next()))
                    .collect()
            })
            .collect();

        // Interleave categories so truncation keeps variety
        let mut buckets: Vec<_> = by_category.into_iter().map(Vec::into_iter).collect();
        let mut pool = Vec::with_capacity(limit);
        for _ in 0..per_category {
            pool.extend(buckets.iter_mut().filter_map(Iterator::next));
        }
        pool.truncate(limit);
        pool
    }
}

fn mock_attraction(
    rng: &mut StdRng,
    destination: &str,
    category: AttractionCategory,
    index: usize,
    famous: Option<&Landmark>,
) -> Attraction {
    let (name, description) = match famous {
        Some(place) => (place.name.to_string(), place.description.to_string()),
        None => {
            let kinds = subtypes(category);
            let kind = kinds[rng.random_range(0..kinds.len())];
            let label = category.to_string().to_lowercase();
            (
                format!("{destination} {kind} {}", index + 1),
                format!("A beautiful {label} {} in {destination}.", kind.to_lowercase()),
            )
        }
    };
    let rating: f32 = rng.random_range(3.8..=4.9);
    // 30% of attractions are free
    let entry_fee = if rng.random_range(0..10) < 3 {
        None
    } else {
        Some(rng.random_range(5..=50))
    };
    let duration = VISIT_DURATIONS[rng.random_range(0..VISIT_DURATIONS.len())];

    Attraction {
        name,
        rating: (rating * 10.0).round() / 10.0,
        category,
        description,
        suggested_visit_duration: duration.to_string(),
        entry_fee,
    }
}

/// Tourist attractions from Google Places
pub struct GooglePlaces {
    client: GooglePlacesClient,
}

impl GooglePlaces {
    pub fn new(client: GooglePlacesClient) -> Self {
        Self { client }
    }
}

fn has_any(types: &[String], wanted: &[&str]) -> bool {
    types.iter().any(|t| wanted.contains(&t.as_str()))
}

fn category_from_types(types: &[String]) -> AttractionCategory {
    if has_any(types, &["museum", "art_gallery"]) {
        AttractionCategory::Cultural
    } else if has_any(types, &["park", "natural_feature", "campground"]) {
        AttractionCategory::Natural
    } else if has_any(
        types,
        &["place_of_worship", "church", "mosque", "hindu_temple", "synagogue"],
    ) {
        AttractionCategory::Religious
    } else if has_any(
        types,
        &["amusement_park", "aquarium", "zoo", "shopping_mall", "stadium", "night_club"],
    ) {
        AttractionCategory::Entertainment
    } else {
        AttractionCategory::Historical
    }
}

fn to_attraction(place: PlaceResult, destination: &str) -> Attraction {
    let category = category_from_types(&place.types);
    let description = place.formatted_address.map_or_else(
        || format!("A popular {} attraction in {destination}.", category.to_string().to_lowercase()),
        |address| format!("Located at {address}."),
    );
    Attraction {
        name: place.name,
        rating: place.rating.unwrap_or(0.0).clamp(0.0, 5.0),
        category,
        description,
        suggested_visit_duration: "2-3 hours".to_string(),
        // Price level is the only cost signal Google gives
        entry_fee: place.price_level.filter(|level| *level > 0).map(|level| u32::from(level) * 10),
    }
}

#[async_trait]
impl LiveSource<PlacesQuery, Vec<Attraction>> for GooglePlaces {
    fn name(&self) -> &str {
        "Google Places (attractions)"
    }

    #[instrument(name = "google_places_fetch", skip(self))]
    async fn fetch(&self, query: &PlacesQuery) -> Result<Vec<Attraction>, ProviderError> {
        let results = self
            .client
            .text_search(
                &format!("top attractions in {}", query.destination),
                Some("tourist_attraction"),
            )
            .await?;

        let attractions: Vec<Attraction> = results
            .into_iter()
            .take(query.limit())
            .map(|place| to_attraction(place, &query.destination))
            .collect();
        if attractions.is_empty() {
            return Err(ProviderError::Empty(format!("No attractions found in {}", query.destination)));
        }
        Ok(attractions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn query(destination: &str, days: u32) -> PlacesQuery {
        PlacesQuery {
            destination: destination.to_string(),
            days,
        }
    }

    #[rstest]
    #[case(1, 4)]
    #[case(3, 12)]
    #[case(5, 20)]
    #[case(30, 20)]
    fn test_limit(#[case] days: u32, #[case] expected: usize) {
        assert_eq!(query("Paris", days).limit(), expected);
        assert_eq!(MockPlaces.generate(&query("Paris", days)).len(), expected);
    }

    #[test]
    fn test_paris_includes_landmarks() {
        let pool = MockPlaces.generate(&query("paris", 7));
        let names: Vec<&str> = pool.iter().map(|a| a.name.as_str()).collect();
        assert!(names.contains(&"Eiffel Tower"));
        assert!(names.contains(&"Louvre Museum"));
    }

    #[test]
    fn test_mock_pool_covers_every_category() {
        let pool = MockPlaces.generate(&query("Lisbon", 7));
        for category in AttractionCategory::ALL {
            assert!(pool.iter().any(|a| a.category == category), "missing {category}");
        }
        assert!(pool.iter().all(|a| (3.8..=4.9).contains(&a.rating)));
    }

    #[test]
    fn test_mock_is_deterministic() {
        assert_eq!(
            MockPlaces.generate(&query("Kyoto", 4)),
            MockPlaces.generate(&query("Kyoto", 4))
        );
    }

    #[rstest]
    #[case(&["museum", "point_of_interest"], AttractionCategory::Cultural)]
    #[case(&["park"], AttractionCategory::Natural)]
    #[case(&["church", "tourist_attraction"], AttractionCategory::Religious)]
    #[case(&["zoo"], AttractionCategory::Entertainment)]
    #[case(&["tourist_attraction"], AttractionCategory::Historical)]
    fn test_category_from_types(#[case] types: &[&str], #[case] expected: AttractionCategory) {
        let types: Vec<String> = types.iter().map(|t| (*t).to_string()).collect();
        assert_eq!(category_from_types(&types), expected);
    }

    #[test]
    fn test_google_place_to_attraction() {
        let place: PlaceResult = serde_json::from_str(
            r#"{"name":"Sagrada Familia","rating":4.8,"types":["church","tourist_attraction"],"formatted_address":"C/ de Mallorca, 401, Barcelona"}"#,
        )
        .unwrap();
        let attraction = to_attraction(place, "Barcelona");
        assert_eq!(attraction.category, AttractionCategory::Religious);
        assert_eq!(attraction.entry_fee, None);
        assert!(attraction.description.contains("Mallorca"));
    }
}
