use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use growth_tracker::charts::write_growth_chart_svg;
use growth_tracker::config::Config;
use growth_tracker::store::{FileMeasurementRepository, FileProfileRepository, JsonFileStore};
use growth_tracker::units::{LengthUnit, WeightUnit};
use growth_tracker::{Gender, GrowthTracker, Readings, ReferenceTable};
use std::error::Error;
use std::path::PathBuf;

type Tracker = GrowthTracker<FileProfileRepository, FileMeasurementRepository>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track infant growth against WHO percentiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show, create/edit or delete the child's profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Record a measurement (replaces any entry on the same date)
    Add(ReadingArgs),
    /// Edit a measurement by id
    Edit {
        id: String,
        #[command(flatten)]
        reading: ReadingArgs,
    },
    /// Delete a measurement by id
    Remove { id: String },
    /// List all measurements by date
    List,
    /// Print the monthly weight trend with percentiles
    Trend,
    /// Generate random demo measurements
    Demo {
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Render the growth chart to SVG
    Chart {
        #[arg(short, long, default_value = "growth-chart.svg")]
        output: PathBuf,
        /// Chart horizon in months (config default when omitted)
        #[arg(long)]
        months: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    Set {
        #[arg(long)]
        name: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: NaiveDate,
        /// male or female
        #[arg(long)]
        gender: Gender,
    },
    /// Delete the profile and all measurements
    Delete,
}

#[derive(Args, Debug)]
struct ReadingArgs {
    /// YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    weight: f64,
    #[arg(long)]
    height: f64,
    /// Head circumference
    #[arg(long)]
    head: f64,
    /// Overrides the configured weight unit
    #[arg(long, value_enum)]
    weight_unit: Option<WeightUnit>,
    /// Overrides the configured length unit
    #[arg(long, value_enum)]
    length_unit: Option<LengthUnit>,
}

impl ReadingArgs {
    fn readings(&self, config: &Config) -> Readings {
        let weight_unit = self.weight_unit.unwrap_or(config.weight_unit);
        let length_unit = self.length_unit.unwrap_or(config.length_unit);
        Readings {
            weight_kg: weight_unit.to_kg(self.weight),
            height_cm: length_unit.to_cm(self.height),
            head_cm: length_unit.to_cm(self.head),
        }
    }
}

fn format_percentile(percentile: Option<f64>) -> String {
    percentile.map_or_else(|| "n/a".to_string(), |p| format!("{:.1}%", p))
}

async fn run(cli: Cli, config: Config, tracker: Tracker) -> Result<(), Box<dyn Error>> {
    let today = Local::now().date_naive();
    let weight_unit = config.weight_unit;
    let length_unit = config.length_unit;

    match cli.command {
        Command::Profile(ProfileCommand::Show) => match tracker.profile().await? {
            Some(p) => println!("{} ({}), born {}", p.name, p.gender, p.birth_date),
            None => println!("No profile yet"),
        },
        Command::Profile(ProfileCommand::Set {
            name,
            birth_date,
            gender,
        }) => {
            let profile = tracker.save_profile(&name, birth_date, gender, today).await?;
            println!("Saved profile for {}", profile.name);
        }
        Command::Profile(ProfileCommand::Delete) => {
            tracker.delete_profile().await?;
            println!("Profile deleted");
        }
        Command::Add(args) => {
            let m = tracker
                .record_measurement(args.date, args.readings(&config), today)
                .await?;
            println!(
                "Saved {}: {:.2} {} ({})",
                m.date,
                weight_unit.from_kg(m.weight_kg),
                weight_unit,
                format_percentile(m.weight_percentile)
            );
        }
        Command::Edit { id, reading } => {
            let m = tracker
                .update_measurement(&id, reading.date, reading.readings(&config), today)
                .await?;
            println!("Updated {} on {}", m.id, m.date);
        }
        Command::Remove { id } => {
            tracker.delete_measurement(&id).await?;
            println!("Deleted {}", id);
        }
        Command::List => {
            let all = tracker.measurements().await?;
            if all.is_empty() {
                println!("No measurements yet");
            }
            for m in all {
                println!(
                    "{}  {}  day {:>3}  {:>6.2} {}  {:>5.1} {}  {:>5.1} {}  {}",
                    m.id,
                    m.date,
                    m.age_in_days,
                    weight_unit.from_kg(m.weight_kg),
                    weight_unit,
                    length_unit.from_cm(m.height_cm),
                    length_unit,
                    length_unit.from_cm(m.head_cm),
                    length_unit,
                    format_percentile(m.weight_percentile)
                );
            }
        }
        Command::Trend => {
            let chart = tracker
                .chart_data(config.max_chart_months, &config.plotted_percentiles)
                .await?;
            if chart.is_empty() {
                println!("No weight measurements to show yet");
            }
            for a in chart.annotations {
                println!(
                    "{:>2}m  {}  {:.2} {}  {}",
                    a.month,
                    a.date.format("%b %e, %Y"),
                    weight_unit.from_kg(a.weight_kg),
                    weight_unit,
                    format_percentile(a.percentile)
                );
            }
        }
        Command::Demo { count } => {
            let count = count.unwrap_or(config.demo_batch_size);
            let merged = tracker.generate_demo_batch(count, today).await?;
            println!("Generated {} measurements, {} stored", count, merged.len());
        }
        Command::Chart { output, months } => {
            let months = months.unwrap_or(config.max_chart_months);
            let chart = tracker.chart_data(months, &config.plotted_percentiles).await?;
            write_growth_chart_svg(&output, &chart)?;
            println!("Chart written to {}", output.display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Using default config: {}", e);
        Config::default()
    });

    let reference = match ReferenceTable::who_weight_for_age() {
        Ok(table) => table,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let store = JsonFileStore::new(config.data_dir());
    log::debug!("Using data directory {}", store.dir().display());
    let tracker = GrowthTracker::new(
        FileProfileRepository::new(store.clone()),
        FileMeasurementRepository::new(store),
        reference,
    );

    if let Err(e) = run(cli, config, tracker).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
