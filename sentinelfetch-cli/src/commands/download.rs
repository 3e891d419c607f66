//! Download command - search the HUB and archive every matching product.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use sentinelfetch::archive::ArchiveResolver;
use sentinelfetch::config::ConfigFile;
use sentinelfetch::hub::{Credentials, HubSettings, ReqwestTransport};
use sentinelfetch::logging::init_file_logging;
use sentinelfetch::query::{QueryParameters, SearchFilters, SearchRequest, SystemClock};
use sentinelfetch::run::{ArchiveRun, RunSummary};
use tracing::{error, info};

use super::common::{load_config, resolve_optional};
use crate::error::CliError;
use crate::progress::ConsoleReporter;

/// Arguments of `sentinelfetch download`.
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Start of the acquisition window: NOW-<days>, YYYYMMDD or YYYYMMDDTHHMMSS
    #[arg(short = 'f', long = "date-from", default_value = "NOW-1")]
    pub date_from: String,

    /// End of the acquisition window: NOW-<days>, YYYYMMDD or YYYYMMDDTHHMMSS
    #[arg(short = 't', long = "date-to", default_value = "NOW")]
    pub date_to: String,

    /// Archive root directory [config: archive.root_dir]
    #[arg(short = 'd', long = "dir")]
    pub dir: Option<PathBuf>,

    /// File products under YYYY/MM/DD by acquisition date [config: archive.make_subdir]
    #[arg(short = 's', long = "make-subdir", overrides_with = "no_make_subdir")]
    pub make_subdir: bool,

    /// File products directly under the archive root, even if the config enables subdirectories
    #[arg(long = "no-make-subdir", overrides_with = "make_subdir")]
    pub no_make_subdir: bool,

    /// Platform name
    #[arg(short = 'l', long = "plat", default_value = "Sentinel-3")]
    pub platform: String,

    /// Product type
    #[arg(short = 'x', long = "prod", default_value = "OL_2_WFR*")]
    pub product: String,

    /// Sensor operational mode
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<String>,

    /// Polarisation mode
    #[arg(short = 'o', long = "pol")]
    pub polarisation: Option<String>,

    /// Relative orbit number
    #[arg(short = 'r', long = "relorb")]
    pub relative_orbit: Option<String>,

    /// Absolute orbit number
    #[arg(short = 'b', long = "absorb")]
    pub absolute_orbit: Option<String>,

    /// Footprint rectangle as lat1,lon1:lat2,lon2
    #[arg(short = 'i', long = "fprint", allow_hyphen_values = true)]
    pub footprint: Option<String>,

    /// Log file prefix [config: logging.file_prefix]
    #[arg(short = 'z', long = "logfile")]
    pub log_prefix: Option<String>,

    /// HUB username [config: hub.username]
    #[arg(short = 'n', long = "user")]
    pub username: Option<String>,

    /// HUB password [config: hub.password]
    #[arg(short = 'p', long = "pass")]
    pub password: Option<String>,

    /// HUB base URL [config: hub.url]
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,

    /// Row limit of the search; reaching it aborts the run [config: hub.max_rows]
    #[arg(long)]
    pub max_rows: Option<usize>,

    /// Retries of the search on connection failure [config: hub.retries]
    #[arg(long)]
    pub retries: Option<u32>,

    /// Search timeout in seconds [config: hub.timeout_secs]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Configuration file to use instead of the default
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Everything a run needs, after merging CLI and config file.
#[derive(Debug)]
struct RunPlan {
    request: SearchRequest,
    hub: HubSettings,
    max_rows: usize,
    root_dir: PathBuf,
    make_subdir: bool,
    log_prefix: String,
}

impl RunPlan {
    fn resolve(args: DownloadArgs, config: ConfigFile) -> Self {
        // CLI takes precedence, then config
        let username = resolve_optional(args.username, &config.hub.username).unwrap_or_default();
        let password = resolve_optional(args.password, &config.hub.password).unwrap_or_default();
        let timeout_secs = args.timeout.or(config.hub.timeout_secs);
        let make_subdir = if args.no_make_subdir {
            false
        } else {
            args.make_subdir || config.archive.make_subdir
        };

        let hub = HubSettings::new(
            args.url.unwrap_or(config.hub.url),
            Credentials::new(username, password),
        )
        .with_retries(args.retries.unwrap_or(config.hub.retries))
        .with_timeout(timeout_secs.map(Duration::from_secs));

        let request = SearchRequest {
            footprint: args.footprint,
            date_from: Some(args.date_from),
            date_to: Some(args.date_to),
            filters: SearchFilters {
                sensor_operational_mode: args.mode,
                product_type: Some(args.product),
                platform_name: Some(args.platform),
                polarisation_mode: args.polarisation,
                relative_orbit: args.relative_orbit,
                absolute_orbit: args.absolute_orbit,
            },
        };

        Self {
            request,
            hub,
            max_rows: args.max_rows.unwrap_or(config.hub.max_rows),
            root_dir: args.dir.unwrap_or(config.archive.root_dir),
            make_subdir,
            log_prefix: args.log_prefix.unwrap_or(config.logging.file_prefix),
        }
    }
}

/// Run the download command.
pub fn run(args: DownloadArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let plan = RunPlan::resolve(args, config);

    let guard = init_file_logging(&plan.log_prefix)?;
    println!("Logging to: {}", guard.path().display());

    let params = QueryParameters::build(&plan.request, plan.hub, plan.max_rows, &SystemClock)
        .map_err(|e| {
            error!(error = %e, "Invalid search parameters");
            CliError::from(e)
        })?;

    info!(
        root = %plan.root_dir.display(),
        partitioned = plan.make_subdir,
        "Archive configured"
    );

    let transport = ReqwestTransport::new()?;
    let resolver = ArchiveResolver::new(plan.root_dir, plan.make_subdir);
    let reporter = ConsoleReporter::new();

    let summary = ArchiveRun::new(Box::new(transport), params, resolver)
        .execute(&reporter)
        .map_err(|e| {
            error!(error = %e, "Run aborted");
            CliError::from(e)
        })?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} {} archived, {} skipped, {} failed",
        style("Finished downloading!").green().bold(),
        summary.archived(),
        summary.skipped(),
        summary.failed()
    );
    for path in summary.archived_paths() {
        println!("  {}", path.display());
    }
}
