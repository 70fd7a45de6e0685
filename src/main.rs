mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use account_pulse::analysis::{self, top_viral, AnalysisReport};
use account_pulse::config::AnalyzerConfig;
use account_pulse::normalize::ProviderCapture;
use account_pulse::openai::OpenAiClassifier;
use account_pulse::{format_float, format_number, Post, Profile};

#[derive(Parser)]
#[command(name = "account-pulse", about = "X account analytics engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Analyze(AnalyzeArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    /// Provider capture JSON (profile + posts); stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_key: Option<String>,
    /// Pins the simulated-series random walk for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Emit the full report as JSON instead of the text summary.
    #[arg(long)]
    json: bool,
    /// How many top viral posts to show in the text summary.
    #[arg(long, default_value_t = 5)]
    top: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long, default_value = "dashboard/dist")]
    web_root: String,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args) => run_analyze(args).await,
        Command::Serve(args) => server::serve(args).await,
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let (mut config, _) = AnalyzerConfig::load(args.config.clone())?;
    if let Some(seed) = args.seed {
        config.growth.seed = Some(seed);
    }

    let capture: ProviderCapture =
        serde_json::from_str(&read_capture(args.input.as_deref())?)
            .map_err(|err| format!("failed to parse capture: {}", err))?;
    let (posts, profile) = capture.into_batch().map_err(|err| err.to_string())?;

    let classifier = OpenAiClassifier::from_env(&config.classifier, args.api_key.clone())
        .ok_or_else(|| "OPENAI_API_KEY is not set".to_string())?
        .map_err(|err| err.to_string())?;

    let report = analysis::run(&posts, &profile, &classifier, &config)
        .await
        .map_err(|err| err.to_string())?;

    if args.json {
        let payload = serde_json::to_string_pretty(&report)
            .map_err(|err| format!("failed to serialize report: {}", err))?;
        println!("{}", payload);
        return Ok(());
    }

    print_report(&profile, &posts, &report, args.top);
    Ok(())
}

fn print_report(profile: &Profile, posts: &[Post], report: &AnalysisReport, top: usize) {
    let total_engagement: u64 = posts.iter().map(Post::total_engagement).sum();

    println!(
        "@{} ({}) | {} followers, {} posts analyzed",
        profile.handle,
        profile.display_name,
        format_number(profile.follower_count as f64),
        posts.len()
    );
    println!(
        "Total engagement across batch: {}",
        format_number(total_engagement as f64)
    );

    if let Some(best_day) = report
        .posting_frequency
        .iter()
        .max_by_key(|bucket| bucket.avg_engagement)
    {
        println!(
            "Best weekday: {} ({} avg engagement over {} posts)",
            best_day.day,
            format_number(best_day.avg_engagement as f64),
            best_day.posts
        );
    }
    if let Some(best_hour) = report
        .optimal_posting_time
        .iter()
        .max_by_key(|bucket| bucket.avg_engagement)
    {
        println!(
            "Best hour: {:02}:00 ({} avg engagement over {} posts)",
            best_hour.hour,
            format_number(best_hour.avg_engagement as f64),
            best_hour.posts
        );
    }

    println!("\nInflection points:");
    for point in &report.inflection_points {
        println!(
            "- {} {} (likes {} | retweets {} | est. follower gain {})",
            point.date,
            point.description,
            format_number(point.metrics.likes as f64),
            format_number(point.metrics.retweets as f64),
            format_number(point.metrics.follower_gain as f64)
        );
    }

    println!("\nTop viral posts:");
    for record in top_viral(&report.virality_ranking, top) {
        println!(
            "- {} [{}] {}",
            record.date,
            format_float(record.virality, 2),
            record.text
        );
    }

    println!("\nTopics:");
    for topic in &report.topic_analysis {
        println!(
            "- {}: {} posts, {} avg engagement",
            topic.label,
            topic.count,
            format_number(topic.avg_engagement)
        );
    }

    println!("\nEmotions:");
    for emotion in &report.emotion_analysis {
        println!(
            "- {}: {} posts, {} avg engagement",
            emotion.label,
            emotion.count,
            format_number(emotion.avg_engagement)
        );
    }

    println!("\nPsychological hooks:");
    for hook in &report.psychological_hooks {
        println!(
            "- {}: {} posts, {} avg engagement",
            hook.label,
            hook.count,
            format_number(hook.avg_engagement)
        );
    }

    if let (Some(first), Some(last)) = (report.follower_growth.first(), report.follower_growth.last())
    {
        println!(
            "\nSimulated follower growth ({} → {}): {} → {} (estimate, not measured)",
            first.day,
            last.day,
            format_number(first.followers as f64),
            format_number(last.followers as f64)
        );
    }
}

fn read_capture(path: Option<&Path>) -> Result<String, String> {
    if let Some(path) = path {
        return std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read {}: {}", path.display(), err));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    if buffer.trim().is_empty() {
        return Err("missing capture: pass --input or pipe stdin".to_string());
    }
    Ok(buffer)
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
