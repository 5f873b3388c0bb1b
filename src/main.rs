//! travel-planner - multi-day trip planning from the command line

use std::fs;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;

use travel_planner::cli::{Cli, Command, OutputFormat};
use travel_planner::{PlanFormatter, TravelPlannerConfig, TripPlanner, TripQuery, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = TravelPlannerConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose).context("Failed to setup logging")?;

    match cli.command {
        Command::Plan {
            destination,
            origin,
            days,
            month,
            mock,
            format,
            output,
        } => {
            if mock {
                config.providers.use_mock_data = true;
            }

            let planner = TripPlanner::from_config(&config).map_err(|e| anyhow!(e.user_message()))?;
            let plan = planner
                .plan(TripQuery {
                    destination,
                    origin,
                    days,
                    month,
                })
                .await
                .map_err(|e| anyhow!(e.user_message()))?;

            let formatter = PlanFormatter;
            let rendered = match format {
                OutputFormat::Markdown => formatter.render(&plan),
                OutputFormat::Json => formatter
                    .render_json(&plan)
                    .context("Failed to serialize plan")?,
            };

            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write plan to {}", path.display()))?;
                    info!(path = %path.display(), "Plan written");
                    eprintln!("Plan written to {}", path.display());
                }
                None => println!("{rendered}"),
            }
        }
    }

    Ok(())
}
