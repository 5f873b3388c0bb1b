//! Human-readable rendering of a travel plan

use std::fmt::{self, Display};

use crate::models::{DayPlan, FlightOption, HotelOption, TravelPlan};

/// Renders plans as Markdown or JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanFormatter;

impl PlanFormatter {
    /// Markdown document with a fixed section order
    #[must_use]
    pub fn render(&self, plan: &TravelPlan) -> String {
        MarkdownPlan(plan).to_string()
    }

    /// Pretty-printed JSON export
    pub fn render_json(&self, plan: &TravelPlan) -> serde_json::Result<String> {
        serde_json::to_string_pretty(plan)
    }
}

struct MarkdownPlan<'a>(&'a TravelPlan);

impl Display for MarkdownPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;
        let request = plan.request();

        writeln!(f, "# Travel Plan: {}", request.destination())?;
        writeln!(f)?;
        writeln!(f, "- **From:** {}", request.origin())?;
        writeln!(f, "- **Duration:** {} days", request.days())?;
        writeln!(f, "- **Travel month:** {}", request.month().name())?;
        writeln!(f, "- **Generated:** {}", plan.generated_at().format("%Y-%m-%d %H:%M UTC"))?;
        writeln!(f)?;

        writeln!(f, "## Cultural & Historical Context")?;
        writeln!(f)?;
        writeln!(f, "{}", plan.cultural_context())?;
        writeln!(f)?;

        let weather = plan.weather();
        writeln!(f, "## Weather")?;
        writeln!(f)?;
        writeln!(
            f,
            "Currently {} at {}, humidity {}%",
            weather.current.condition,
            weather.current.format_temperature(),
            weather.current.humidity
        )?;
        if !weather.forecast.is_empty() {
            writeln!(f)?;
            writeln!(f, "| Date | High | Low | Conditions |")?;
            writeln!(f, "|------|------|-----|------------|")?;
            for day in &weather.forecast {
                writeln!(
                    f,
                    "| {} | {:.1}°C | {:.1}°C | {} |",
                    day.date.format("%a %b %d"),
                    day.high,
                    day.low,
                    day.condition
                )?;
            }
        }
        writeln!(f)?;

        writeln!(f, "## Suggested Travel Dates")?;
        writeln!(f)?;
        for window in plan.date_windows() {
            writeln!(
                f,
                "- **{}:** {} to {}",
                window.label,
                window.start_date.format("%B %d, %Y"),
                window.end_date.format("%B %d, %Y")
            )?;
        }
        writeln!(f)?;

        writeln!(f, "## Flight Options")?;
        writeln!(f)?;
        if plan.flights().is_empty() {
            writeln!(f, "No flights found.")?;
        }
        for (i, flight) in plan.flights().iter().enumerate() {
            write_flight(f, i + 1, flight)?;
        }
        writeln!(f)?;

        writeln!(f, "## Hotel Options")?;
        writeln!(f)?;
        if plan.hotels().is_empty() {
            writeln!(f, "No hotels found.")?;
        }
        for (i, hotel) in plan.hotels().iter().enumerate() {
            write_hotel(f, i + 1, hotel)?;
        }
        writeln!(f)?;

        writeln!(f, "## Day-by-Day Itinerary")?;
        for day in plan.itinerary() {
            writeln!(f)?;
            write_day(f, day)?;
        }
        writeln!(f)?;

        let sources = plan.provenance();
        writeln!(f, "## Data Sources")?;
        writeln!(f)?;
        writeln!(f, "- Cultural context: {}", sources.narrative)?;
        writeln!(f, "- Weather: {}", sources.weather)?;
        writeln!(f, "- Flights: {}", sources.flights)?;
        writeln!(f, "- Hotels: {}", sources.hotels)?;
        writeln!(f, "- Attractions: {}", sources.places)?;
        Ok(())
    }
}

fn write_flight(f: &mut fmt::Formatter<'_>, n: usize, flight: &FlightOption) -> fmt::Result {
    let stops = match flight.stops {
        0 => "Non-stop".to_string(),
        1 => "1 stop".to_string(),
        count => format!("{count} stops"),
    };
    writeln!(f, "{n}. **{}** {}", flight.carrier, flight.flight_number)?;
    writeln!(
        f,
        "   - {} → {} ({}, {stops})",
        flight.departure_time.format("%b %d %H:%M"),
        flight.arrival_time.format("%b %d %H:%M"),
        flight.format_travel_time()
    )?;
    writeln!(f, "   - Price: {}", format_price(flight.price, &flight.currency))?;
    if let Some(link) = &flight.booking_link {
        writeln!(f, "   - Book: {link}")?;
    }
    Ok(())
}

fn write_hotel(f: &mut fmt::Formatter<'_>, n: usize, hotel: &HotelOption) -> fmt::Result {
    writeln!(f, "{n}. **{}** ({:.1}/5.0)", hotel.name, hotel.rating)?;
    writeln!(f, "   - {}/night", format_price(hotel.price_per_night, "USD"))?;
    if !hotel.amenities.is_empty() {
        let amenities: Vec<&str> = hotel.amenities.iter().map(String::as_str).collect();
        writeln!(f, "   - Amenities: {}", amenities.join(", "))?;
    }
    Ok(())
}

fn write_day(f: &mut fmt::Formatter<'_>, day: &DayPlan) -> fmt::Result {
    writeln!(f, "### Day {}: {}", day.day_index, day.theme)?;
    writeln!(f)?;
    for attraction in &day.attractions {
        writeln!(
            f,
            "- **{}** ({}, {:.1}/5.0): {}",
            attraction.name, attraction.category, attraction.rating, attraction.description
        )?;
        writeln!(
            f,
            "  - Visit: {}, entry: {}",
            attraction.suggested_visit_duration,
            attraction.format_entry_fee()
        )?;
    }
    if let Some(notes) = &day.notes {
        writeln!(f, "{notes}")?;
    }
    Ok(())
}

fn format_price(amount: f64, currency: &str) -> String {
    match currency {
        "USD" => format!("${amount:.2}"),
        "EUR" => format!("€{amount:.2}"),
        "GBP" => format!("£{amount:.2}"),
        "INR" => format!("₹{amount:.2}"),
        other => format!("{other} {amount:.2}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TravelPlannerConfig;
    use crate::models::TripRequest;
    use crate::planner::TripPlanner;
    use chrono::{Month, NaiveDate};

    async fn sample_plan(days: u32) -> TravelPlan {
        let mut config = TravelPlannerConfig::default();
        config.providers.use_mock_data = true;
        TripPlanner::from_config(&config)
            .unwrap()
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
            .run(TripRequest::new("Paris", "New York", days, Month::June).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sections_in_fixed_order() {
        let text = PlanFormatter.render(&sample_plan(3).await);
        let headings = [
            "# Travel Plan: Paris",
            "## Cultural & Historical Context",
            "## Weather",
            "## Suggested Travel Dates",
            "## Flight Options",
            "## Hotel Options",
            "## Day-by-Day Itinerary",
            "## Data Sources",
        ];
        let positions: Vec<usize> = headings
            .iter()
            .map(|h| text.find(h).unwrap_or_else(|| panic!("missing {h}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("### Day 3:"));
        assert!(text.contains("**Early Month:** June 01, 2025 to June 03, 2025"));
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let plan = sample_plan(5).await;
        assert_eq!(PlanFormatter.render(&plan), PlanFormatter.render(&plan));
    }

    #[tokio::test]
    async fn test_json_export_round_trips() {
        let plan = sample_plan(2).await;
        let json = PlanFormatter.render_json(&plan).unwrap();
        let parsed: TravelPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(412.5, "USD"), "$412.50");
        assert_eq!(format_price(99.0, "EUR"), "€99.00");
        assert_eq!(format_price(10.0, "CHF"), "CHF 10.00");
    }
}
