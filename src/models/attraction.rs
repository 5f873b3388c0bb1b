//! Attractions and the day plans built from them

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Kind of point of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttractionCategory {
    Historical,
    Cultural,
    Natural,
    Entertainment,
    Religious,
}

impl AttractionCategory {
    pub const ALL: [AttractionCategory; 5] = [
        AttractionCategory::Historical,
        AttractionCategory::Cultural,
        AttractionCategory::Natural,
        AttractionCategory::Entertainment,
        AttractionCategory::Religious,
    ];

    /// The broad day theme this category belongs to
    #[must_use]
    pub fn theme(self) -> DayTheme {
        match self {
            AttractionCategory::Historical | AttractionCategory::Religious => {
                DayTheme::HistoryAndHeritage
            }
            AttractionCategory::Cultural => DayTheme::ArtsAndCulture,
            AttractionCategory::Natural => DayTheme::NatureAndOutdoors,
            AttractionCategory::Entertainment => DayTheme::EntertainmentAndLeisure,
        }
    }
}

impl Display for AttractionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttractionCategory::Historical => write!(f, "Historical"),
            AttractionCategory::Cultural => write!(f, "Cultural"),
            AttractionCategory::Natural => write!(f, "Natural"),
            AttractionCategory::Entertainment => write!(f, "Entertainment"),
            AttractionCategory::Religious => write!(f, "Religious"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Attraction {
    pub name: String,
    /// Rating from 0.0 to 5.0
    pub rating: f32,
    pub category: AttractionCategory,
    pub description: String,
    /// e.g. "2-3 hours", "Half day"
    pub suggested_visit_duration: String,
    /// Entry fee in USD; `None` means free entry
    pub entry_fee: Option<u32>,
}

impl Attraction {
    #[must_use]
    pub fn format_entry_fee(&self) -> String {
        match self.entry_fee {
            Some(fee) => format!("${fee}"),
            None => "Free".to_string(),
        }
    }
}

/// Primary theme of a day in the itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayTheme {
    HistoryAndHeritage,
    ArtsAndCulture,
    NatureAndOutdoors,
    EntertainmentAndLeisure,
    /// Placeholder for days the attraction pool could not fill
    FreeExploration,
}

impl Display for DayTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayTheme::HistoryAndHeritage => write!(f, "Historical Exploration"),
            DayTheme::ArtsAndCulture => write!(f, "Cultural Immersion"),
            DayTheme::NatureAndOutdoors => write!(f, "Natural Beauty"),
            DayTheme::EntertainmentAndLeisure => write!(f, "Adventure & Entertainment"),
            DayTheme::FreeExploration => write!(f, "Free Exploration"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayPlan {
    /// 1-based index of the day within the trip
    pub day_index: u32,
    pub theme: DayTheme,
    pub attractions: Vec<Attraction>,
    pub notes: Option<String>,
}

impl DayPlan {
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.theme == DayTheme::FreeExploration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_maps_to_a_real_theme() {
        for category in AttractionCategory::ALL {
            assert_ne!(category.theme(), DayTheme::FreeExploration);
        }
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&AttractionCategory::Natural).unwrap();
        assert_eq!(json, "\"natural\"");
    }
}
