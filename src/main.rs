use clap::{Parser, Subcommand};
use series_scout::{
    MetadataQuery, MetadataResolver, MetadataRetrievalError, Registration, SonarrConfig,
    Unregistration,
};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Look up, register and remove TV series in Sonarr
#[derive(Parser, Debug)]
#[command(name = "series-scout", version, about, long_about = None)]
struct Cli {
    /// Base URL of the Sonarr instance
    #[arg(long, env = "SONARR_URL")]
    url: String,

    /// Sonarr API key
    #[arg(long, env = "SONARR_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Root folder for newly registered series
    #[arg(long, env = "SONARR_ROOT_FOLDER", default_value = "/tv")]
    root_folder: String,

    /// Quality profile id for newly registered series
    #[arg(long, env = "SONARR_QUALITY_PROFILE_ID", default_value_t = series_scout::DEFAULT_QUALITY_PROFILE_ID)]
    quality_profile_id: u32,

    /// Minimum match score (0-100) for tracked series
    #[arg(long, default_value_t = series_scout::DEFAULT_RESOLVE_THRESHOLD, value_parser = clap::value_parser!(u8).range(0..=100))]
    resolve_threshold: u8,

    /// Minimum match score (0-100) for registering catalog results
    #[arg(long, default_value_t = series_scout::DEFAULT_REGISTER_THRESHOLD, value_parser = clap::value_parser!(u8).range(0..=100))]
    register_threshold: u8,

    /// Request timeout in seconds (HTTP client default if omitted)
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print show, season or episode metadata as JSON
    Metadata {
        /// Series title
        title: String,

        /// Season number
        #[arg(short, long)]
        season: Option<u32>,

        /// Episode number (requires --season)
        #[arg(short, long, requires = "season")]
        episode: Option<u32>,
    },
    /// Print the id of the tracked series matching a title
    Resolve {
        /// Series title
        title: String,
    },
    /// Register a series without monitoring or searching it
    Add {
        /// Series title
        title: String,
    },
    /// Stop tracking a series (media files are kept)
    Remove {
        /// Series title
        title: String,
    },
}

impl Cli {
    fn config(&self) -> SonarrConfig {
        let config = SonarrConfig::new(&self.url, &self.api_key, &self.root_folder)
            .with_quality_profile_id(self.quality_profile_id)
            .with_resolve_threshold(self.resolve_threshold)
            .with_register_threshold(self.register_threshold);

        match self.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

fn run(cli: Cli) -> Result<(), MetadataRetrievalError> {
    let resolver = MetadataResolver::from_config(&cli.config())?;

    match cli.command {
        Command::Metadata {
            title,
            season,
            episode,
        } => {
            let metadata = resolver.get_metadata(&title, MetadataQuery::from_parts(season, episode))?;
            let json = serde_json::to_string_pretty(&metadata)
                .map_err(|e| MetadataRetrievalError::ParseError(e.to_string()))?;
            println!("{}", json);
        }
        Command::Resolve { title } => match resolver.resolve_series_id(&title)? {
            Some(id) => println!("{}", id),
            None => println!("No tracked series matches '{}'.", title),
        },
        Command::Add { title } => match resolver.register_series(&title)? {
            Registration::Added(series) => {
                println!("Added '{}' (unmonitored).", series.title);
            }
            Registration::NoCandidates => println!("Series '{}' not found.", title),
            Registration::LowConfidence { title: best, score } => {
                println!(
                    "No good match found for '{}'. Best: '{}' ({}).",
                    title, best, score
                );
            }
        },
        Command::Remove { title } => match resolver.unregister_series(&title)? {
            Unregistration::Removed(id) => println!("Removed series {} (files kept).", id),
            Unregistration::NotTracked => println!("Series '{}' not found in Sonarr.", title),
        },
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "series_scout=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
