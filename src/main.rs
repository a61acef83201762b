use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dialectic::{
    parse_transcription_file, run_analysis, store_analysis, Category, CategoryOutcome, Database,
    MetricsFilter, OpenRouterConfig, PipelineConfig,
};

#[derive(Parser)]
#[command(name = "dialectic")]
#[command(author, version, about = "Conversation skill-evaluation pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a transcript across the three rubrics and store the results
    Analyze {
        /// Input transcription file (canonical list, diarized, or plain text JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Name for the meeting transcript (defaults to the input file name)
        #[arg(long)]
        name: Option<String>,

        /// Date for the meeting in ISO format (defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// SQLite database path
        #[arg(long, default_value = "transcripts.db")]
        db: PathBuf,

        /// OpenRouter model to use
        #[arg(long)]
        model: Option<String>,

        /// Directory for the per-run analysis artifact
        #[arg(long, default_value = "analysis")]
        artifact_dir: PathBuf,

        /// Skip writing the analysis artifact
        #[arg(long)]
        no_artifact: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print aggregated metrics for a category
    Report {
        /// Category to report on
        #[arg(short, long, default_value = "dear_man")]
        category: Category,

        /// Restrict pie-chart data to one sub-category
        #[arg(long)]
        sub_category: Option<String>,

        /// Filter by speaker ID
        #[arg(long)]
        speaker_id: Option<i64>,

        /// Filter by meeting transcript ID
        #[arg(long)]
        transcript_id: Option<i64>,

        /// SQLite database path
        #[arg(long, default_value = "transcripts.db")]
        db: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List stored speakers, transcripts, and the fixed categories
    List {
        /// SQLite database path
        #[arg(long, default_value = "transcripts.db")]
        db: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            name,
            date,
            db,
            model,
            artifact_dir,
            no_artifact,
            verbose,
        } => {
            setup_logging(verbose);
            analyze(input, name, date, db, model, artifact_dir, no_artifact).await
        }
        Commands::Report {
            category,
            sub_category,
            speaker_id,
            transcript_id,
            db,
            verbose,
        } => {
            setup_logging(verbose);
            report(category, sub_category, speaker_id, transcript_id, db)
        }
        Commands::List { db, verbose } => {
            setup_logging(verbose);
            list(db)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn analyze(
    input: PathBuf,
    name: Option<String>,
    date: Option<String>,
    db: PathBuf,
    model: Option<String>,
    artifact_dir: PathBuf,
    no_artifact: bool,
) -> Result<()> {
    info!("Loading transcription from {:?}", input);
    let source = parse_transcription_file(&input).context("Failed to parse input transcription")?;

    let mut api = OpenRouterConfig::from_env()?;
    if let Some(model) = model {
        api.model = model;
    }

    let run_name = name.unwrap_or_else(|| {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "transcript".to_string())
    });

    let config = PipelineConfig {
        api,
        artifact_dir: (!no_artifact).then_some(artifact_dir),
    };

    let run = run_analysis(&config, source, &run_name).await?;

    let mut evaluated = [0usize; 3];
    let mut failed = [0usize; 3];
    for message in &run.messages {
        for (i, outcome_kind) in [
            kind(&message.sentiment),
            kind(&message.dear_man),
            kind(&message.fast),
        ]
        .into_iter()
        .enumerate()
        {
            match outcome_kind {
                OutcomeKind::Present => evaluated[i] += 1,
                OutcomeKind::Failed => failed[i] += 1,
                OutcomeKind::Absent => {}
            }
        }
    }
    for (i, category) in Category::ALL.into_iter().enumerate() {
        info!(
            "Category {}: {} evaluated, {} failed, {} absent",
            category,
            evaluated[i],
            failed[i],
            run.messages.len() - evaluated[i] - failed[i]
        );
    }

    let database = Database::open(&db)?;
    let summary = store_analysis(&database, &run_name, date.as_deref(), &run.messages)?;

    info!(
        "Stored transcript {:?} (id {}): {} messages, {} tags",
        run_name, summary.transcript_id, summary.messages_stored, summary.tags_written
    );
    if let Some(path) = run.artifact_path {
        info!("Analysis artifact written to {:?}", path);
    }

    Ok(())
}

enum OutcomeKind {
    Present,
    Failed,
    Absent,
}

fn kind<T>(outcome: &CategoryOutcome<T>) -> OutcomeKind {
    match outcome {
        CategoryOutcome::Present(_) => OutcomeKind::Present,
        CategoryOutcome::Failed(_) => OutcomeKind::Failed,
        CategoryOutcome::Absent => OutcomeKind::Absent,
    }
}

fn report(
    category: Category,
    sub_category: Option<String>,
    speaker_id: Option<i64>,
    transcript_id: Option<i64>,
    db: PathBuf,
) -> Result<()> {
    let database = Database::open(&db)?;
    let filter = MetricsFilter::new(speaker_id, transcript_id);

    println!("Metrics: {}", category);
    println!("=================");

    let averages = database.average_scores(category, &filter)?;
    if averages.is_empty() {
        println!("No scores recorded");
    } else {
        println!("Average scores");
        println!("--------------");
        for (sub_category, average) in &averages {
            println!("{}: {:.2}", sub_category, average);
        }
    }
    println!();

    if category.skills().is_empty() {
        println!("Label distribution");
        println!("------------------");
        for slice in database.pie_chart_data(category, None, &filter)? {
            println!(
                "{}: {} ({:.1}%)",
                slice.label, slice.count, slice.percentage
            );
        }
    } else {
        println!("Skill adherence");
        println!("---------------");
        for skill in category.skills() {
            let counts = database.subcategory_adherence_counts(category, skill, &filter)?;
            let adhered = counts.get("adhered").copied().unwrap_or(0);
            let did_not = counts.get("did_not_adhere").copied().unwrap_or(0);
            println!("{}: {} adhered, {} did not", skill, adhered, did_not);
        }
    }

    if let Some(sub_category) = sub_category {
        println!();
        println!("Pie chart: {}/{}", category, sub_category);
        println!("---------");
        for slice in database.pie_chart_data(category, Some(&sub_category), &filter)? {
            println!(
                "{}: {} ({:.1}%)",
                slice.label, slice.count, slice.percentage
            );
        }
    }

    Ok(())
}

fn list(db: PathBuf) -> Result<()> {
    let database = Database::open(&db)?;

    println!("Speakers");
    println!("--------");
    for speaker in database.all_speakers()? {
        println!("{}: {}", speaker.id, speaker.name);
    }
    println!();

    println!("Transcripts");
    println!("-----------");
    for transcript in database.all_transcripts()? {
        println!("{}: {} ({})", transcript.id, transcript.name, transcript.date);
    }
    println!();

    println!("Categories");
    println!("----------");
    for category in Category::ALL {
        println!("{}", category);
    }

    Ok(())
}
