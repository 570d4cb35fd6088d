use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use match_scheduler::config::{self, DEFAULT_CONFIG_PATH};
use match_scheduler::display::{print_capacity, print_schedule, write_schedule_to_file};
use match_scheduler::form::{export_matches_to_csv, validate_request, ScheduleRequest};
use match_scheduler::parser::load_teams;
use match_scheduler::schedule::{
    generate_schedule_seeded, generate_schedule_with_entropy, CapacityReport,
};
use match_scheduler::store::InMemoryStore;
use match_scheduler::web;

#[derive(Parser)]
#[command(name = "match-scheduler")]
#[command(about = "Generate conflict-free football match schedules", long_about = None)]
struct Cli {
    /// Path to scheduler.toml
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a schedule from a teams CSV
    Generate {
        /// Teams CSV (id,name,logo_url)
        #[arg(long)]
        teams: PathBuf,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Time slots (HH:MM), comma separated; defaults from config
        #[arg(long, value_delimiter = ',')]
        times: Vec<String>,

        /// Number of fields; default from config
        #[arg(long)]
        fields: Option<u32>,

        /// Use the circle method instead of a single round
        #[arg(long)]
        round_robin: bool,

        /// Seed for the capacity shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Write the schedule as text to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the schedule as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Run the web server
    Web {
        /// Port; default from config
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "match_scheduler=info,actix_web=info".into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = config::load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::Generate {
            teams,
            start,
            end,
            times,
            fields,
            round_robin,
            seed,
            output,
            csv,
        } => {
            let team_list = load_teams(&teams)
                .with_context(|| format!("failed to load teams from {}", teams.display()))?;
            info!(count = team_list.len(), "teams loaded");

            let request = ScheduleRequest {
                start_date: start.to_string(),
                end_date: end.to_string(),
                field_count: fields,
                team_ids: team_list.iter().map(|t| t.id.clone()).collect(),
                time_slots: times,
                match_duration: None,
                round_robin: round_robin.then_some(true),
            }
            .with_defaults(&config.schedule);
            let validated = validate_request(&request).context("invalid schedule request")?;
            if end < start {
                warn!(%start, %end, "end date is before start date, nothing will be scheduled");
            }

            let schedule_config =
                validated.into_config(team_list, Vec::new(), &config.schedule.location_prefix);
            let capacity = CapacityReport::compute(&schedule_config);
            print_capacity(&capacity);

            let matches = match seed.or(config.schedule.seed) {
                Some(seed) => generate_schedule_seeded(&schedule_config, seed),
                None => generate_schedule_with_entropy(&schedule_config),
            };
            print_schedule("Generated schedule", &matches);

            if let Some(path) = output {
                write_schedule_to_file("Generated schedule", &matches, &path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Schedule saved to {}", path.display());
            }
            if let Some(path) = csv {
                export_matches_to_csv(&matches, &path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("CSV saved to {}", path.display());
            }
        }
        Commands::Web { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }

            let store = match &config.server.teams_csv {
                Some(path) => InMemoryStore::with_teams(
                    load_teams(path)
                        .with_context(|| format!("failed to load teams from {}", path.display()))?,
                ),
                None => InMemoryStore::new(),
            };

            if config.server.admin_password == "admin123" {
                warn!("using the default admin password; set ADMIN_PASSWORD");
            }
            println!("Access the site at http://localhost:{}", config.server.port);

            web::start_server(config, store).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_arguments() {
        let cli = Cli::try_parse_from([
            "match-scheduler",
            "generate",
            "--teams",
            "teams.csv",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-07",
            "--times",
            "14:00,16:00",
            "--seed",
            "9",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { times, seed, fields, .. } => {
                assert_eq!(times, vec!["14:00", "16:00"]);
                assert_eq!(seed, Some(9));
                assert_eq!(fields, None);
            }
            Commands::Web { .. } => panic!("expected generate"),
        }
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(Cli::try_parse_from([
            "match-scheduler", "generate", "--teams", "t.csv", "--start", "01/01/2024", "--end", "2024-01-07",
        ])
        .is_err());
    }
}
