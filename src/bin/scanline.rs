//! scanline CLI: operator interface to the station tracker.

use chrono::Utc;
use clap::{Parser, Subcommand};
use scanline::Tracker;
use scanline::config::Config;
use scanline::config::secrets::ExposeSecret;
use scanline::dashboard::{AssetFilter, ListQuery, SortDirection, SortField};
use scanline::db::Db;
use scanline::gantt::{GanttConfig, svg};
use scanline::ingest::ScanPayload;
use scanline::model::ScanOutcome;
use scanline::telemetry::{TelemetryConfig, init_telemetry};
use scanline::timestamp::parse_timestamp;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "scanline", about = "Track engines through their station route")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run pending database migrations
    Migrate,
    /// Register a tag, or rename the engine holding it
    Register {
        /// Tag identifier (EPC)
        tag: String,
        /// Engine name
        name: String,
    },
    /// Record one scan
    Scan {
        tag: String,
        station: String,
        /// Scan time (ISO 8601 or "YYYY-MM-DD HH:MM:SS"); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Replay a JSON-lines file of reader payloads
    Replay {
        /// One {"epc", "station", "timestamp"?} object per line
        file: PathBuf,
    },
    /// List engines
    List {
        /// active | completed | all | <station>
        #[arg(long, default_value = "active")]
        filter: String,
        /// Case-insensitive search on name or tag
        #[arg(long, short, default_value = "")]
        query: String,
        /// engine | epc | station | last
        #[arg(long, default_value = "last")]
        sort: String,
        /// asc | desc
        #[arg(long, default_value = "desc")]
        dir: String,
    },
    /// Show the station timeline of one engine
    Timeline {
        tag: String,
    },
    /// Lay out the rolling Gantt chart
    Gantt {
        /// active | completed | all | <station>
        #[arg(long, default_value = "active")]
        filter: String,
        /// Write SVG here instead of printing JSON
        #[arg(long)]
        svg: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let guard = init_telemetry(TelemetryConfig::from_config(&config))?;
    tracing::debug!(exporting = guard.is_exporting(), "telemetry initialized");

    let db = Db::connect(config.database_url.expose_secret()).await?;
    db.migrate().await?;

    let gantt = GanttConfig::default().with_window_minutes(config.gantt_window_minutes);
    let tracker = Tracker::new(Arc::new(db), config.station_config()?, gantt);

    match cli.command {
        Command::Migrate => {
            tracker.store().health_check().await?;
            println!("Database is up to date.");
            Ok(())
        }
        Command::Register { tag, name } => {
            let record = tracker.register_asset(&tag, &name).await?;
            println!("Registered: {} → {} ({})", record.tag, record.name, record.id);
            Ok(())
        }
        Command::Scan { tag, station, at } => cmd_scan(&tracker, tag, station, at).await,
        Command::Replay { file } => cmd_replay(&tracker, file).await,
        Command::List {
            filter,
            query,
            sort,
            dir,
        } => cmd_list(&tracker, filter, query, sort, dir).await,
        Command::Timeline { tag } => cmd_timeline(&tracker, tag).await,
        Command::Gantt { filter, svg } => cmd_gantt(&tracker, filter, svg).await,
    }
}

async fn cmd_scan(
    tracker: &Tracker<Db>,
    tag: String,
    station: String,
    at: Option<String>,
) -> anyhow::Result<()> {
    let now = match at {
        Some(text) => parse_timestamp(&text)?,
        None => Utc::now(),
    };
    match tracker.record_scan(&tag, &station, now).await? {
        ScanOutcome::Accepted => println!("OK"),
        ScanOutcome::IgnoredUnknownTag => println!("IGNORED_UNKNOWN_EPC"),
    }
    Ok(())
}

async fn cmd_replay(tracker: &Tracker<Db>, file: PathBuf) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&file).await?;

    let (mut accepted, mut ignored, mut rejected) = (0usize, 0usize, 0usize);
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let request = match ScanPayload::parse(line) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("line {}: {e}", lineno + 1);
                rejected += 1;
                continue;
            }
        };
        match tracker.ingest(&request, Utc::now()).await? {
            ScanOutcome::Accepted => accepted += 1,
            ScanOutcome::IgnoredUnknownTag => ignored += 1,
        }
    }

    println!("{accepted} accepted, {ignored} ignored (unknown tag), {rejected} rejected");
    Ok(())
}

async fn cmd_list(
    tracker: &Tracker<Db>,
    filter: String,
    query: String,
    sort: String,
    dir: String,
) -> anyhow::Result<()> {
    let query = ListQuery {
        filter: AssetFilter::from_param(&filter, tracker.stations()),
        query,
        sort: SortField::from_param(&sort),
        direction: SortDirection::from_param(&dir),
    };
    let rows = tracker.list_rows(&query).await?;

    if rows.is_empty() {
        println!("No engines found.");
        return Ok(());
    }

    // Header
    println!(
        "{:<20}  {:<24}  {:<12}  {:<19}  {:>6}  ID",
        "ENGINE", "EPC", "STATION", "LAST SCAN", "TIME"
    );
    println!("{}", "-".repeat(100));

    for row in &rows {
        println!(
            "{:<20}  {:<24}  {:<12}  {:<19}  {:>6}  {}",
            row.name,
            row.tag,
            row.station.as_deref().unwrap_or("-"),
            row.last_seen
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            row.active_time,
            row.id
        );
    }

    println!("\n{} engine(s)", rows.len());
    Ok(())
}

async fn cmd_timeline(tracker: &Tracker<Db>, tag: String) -> anyhow::Result<()> {
    let timeline = tracker.timeline(&tag).await?;

    println!("Engine:     {}", timeline.asset.name);
    println!("EPC:        {}", timeline.asset.tag);
    println!(
        "Complete:   {}",
        if timeline.complete { "yes" } else { "no" }
    );
    println!("---");
    for seg in &timeline.segments {
        let end = seg
            .end
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "(now)".to_string());
        println!(
            "{:<12}  {}  →  {}",
            seg.station,
            seg.start.format("%Y-%m-%d %H:%M:%S"),
            end
        );
    }
    Ok(())
}

async fn cmd_gantt(
    tracker: &Tracker<Db>,
    filter: String,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let filter = AssetFilter::from_param(&filter, tracker.stations());
    let chart = tracker.render_gantt(&filter, Utc::now()).await?;

    match out {
        Some(path) => {
            tokio::fs::write(&path, svg::render(&chart, tracker.gantt_config())).await?;
            println!("Wrote {} row(s) to {}", chart.rows.len(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&chart)?),
    }
    Ok(())
}
