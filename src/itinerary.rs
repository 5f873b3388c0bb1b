//! Day-by-day distribution of attractions
//!
//! Attractions are bucketed by theme. Each day takes the theme with the most
//! attractions left, so two consecutive days share a theme only when nothing
//! else is left. Days the pool cannot fill become free exploration days.

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use crate::PlanningError;
use crate::models::{Attraction, DayPlan, DayTheme};

/// Most attractions scheduled on a single day
pub const MAX_ATTRACTIONS_PER_DAY: usize = 4;

const THEME_ROTATION: [DayTheme; 4] = [
    DayTheme::HistoryAndHeritage,
    DayTheme::ArtsAndCulture,
    DayTheme::NatureAndOutdoors,
    DayTheme::EntertainmentAndLeisure,
];

/// Build exactly `days` day plans from the attraction pool
pub fn distribute(destination: &str, pool: Vec<Attraction>, days: u32) -> crate::Result<Vec<DayPlan>> {
    if days == 0 {
        return Err(PlanningError::validation("An itinerary needs at least one day"));
    }

    let pool_size = pool.len();
    let quota = pool_size
        .div_ceil(days as usize)
        .clamp(1, MAX_ATTRACTIONS_PER_DAY);

    let mut buckets: BTreeMap<DayTheme, Vec<Attraction>> = BTreeMap::new();
    for attraction in pool {
        buckets.entry(attraction.category.theme()).or_default().push(attraction);
    }
    let mut buckets: BTreeMap<DayTheme, VecDeque<Attraction>> = buckets
        .into_iter()
        .map(|(theme, mut attractions)| {
            attractions.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.name.cmp(&b.name)));
            (theme, attractions.into())
        })
        .collect();

    let mut itinerary = Vec::with_capacity(days as usize);
    let mut cursor = 0;
    let mut previous: Option<DayTheme> = None;
    let mut placed = 0;

    for day_index in 1..=days {
        let Some((slot, theme)) = next_theme(&buckets, cursor, previous) else {
            itinerary.push(free_exploration(destination, day_index));
            previous = Some(DayTheme::FreeExploration);
            continue;
        };

        let attractions: Vec<Attraction> = buckets
            .get_mut(&theme)
            .map(|bucket| {
                let take = quota.min(bucket.len());
                bucket.drain(..take).collect()
            })
            .unwrap_or_default();
        placed += attractions.len();

        itinerary.push(DayPlan {
            day_index,
            theme,
            attractions,
            notes: None,
        });
        cursor = slot + 1;
        previous = Some(theme);
    }

    if pool_size > 0 && placed == 0 {
        return Err(PlanningError::assembly(format!(
            "None of the {pool_size} attractions could be placed"
        )));
    }
    if itinerary.len() != days as usize {
        return Err(PlanningError::assembly(format!(
            "Built {} day plans for a {days}-day trip",
            itinerary.len()
        )));
    }

    debug!(days, pool_size, placed, quota, "Distributed attractions");
    Ok(itinerary)
}

/// Theme with the most attractions left, other than `previous`
///
/// Ties go to the first theme in rotation order from `cursor`. `previous` is
/// only repeated when it is the only theme left.
fn next_theme(
    buckets: &BTreeMap<DayTheme, VecDeque<Attraction>>,
    cursor: usize,
    previous: Option<DayTheme>,
) -> Option<(usize, DayTheme)> {
    let rotation = (0..THEME_ROTATION.len())
        .map(|offset| (cursor + offset) % THEME_ROTATION.len())
        .map(|slot| (slot, THEME_ROTATION[slot]));

    let mut best: Option<(usize, DayTheme, usize)> = None;
    let mut fallback = None;
    for (slot, theme) in rotation {
        let remaining = buckets.get(&theme).map_or(0, VecDeque::len);
        if remaining == 0 {
            continue;
        }
        if Some(theme) == previous {
            fallback = Some((slot, theme));
            continue;
        }
        if best.is_none_or(|(_, _, most)| remaining > most) {
            best = Some((slot, theme, remaining));
        }
    }
    best.map(|(slot, theme, _)| (slot, theme)).or(fallback)
}

fn free_exploration(destination: &str, day_index: u32) -> DayPlan {
    DayPlan {
        day_index,
        theme: DayTheme::FreeExploration,
        attractions: Vec::new(),
        notes: Some(format!(
            "Wander {destination} at your own pace and revisit the places you enjoyed most."
        )),
    }
}
