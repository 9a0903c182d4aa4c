use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use texsearch::io::{load_gray_image, ImageDecoder};
use texsearch::{
    glcm_signature, CancelToken, DescriptorKind, DistanceResult, GlcmConfig, Metric, QueryConfig,
    QueryMode, RetrievalEngine, SignatureStore, StoreConfig, TextureSignature,
};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Texture-signature image retrieval")]
struct Cli {
    /// Optional JSON configuration file; command line flags override it.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable info-level tracing output.
    #[arg(long, global = true)]
    trace: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the signature of a single image.
    Describe {
        image: PathBuf,
        /// Descriptor to apply (glcm or lbp).
        #[arg(long)]
        descriptor: Option<DescriptorKind>,
        /// Print JSON instead of labelled rows.
        #[arg(long)]
        json: bool,
    },
    /// Build a signature store from a directory tree and save it.
    Build {
        root: PathBuf,
        /// Output store file.
        #[arg(short, long, value_name = "FILE", default_value = "store.json")]
        output: PathBuf,
        #[arg(long)]
        descriptor: Option<DescriptorKind>,
        /// Describe files on the worker pool.
        #[arg(long)]
        parallel: bool,
    },
    /// Rank the images of a store against a query image.
    Query {
        image: PathBuf,
        /// Store file written by `build`.
        #[arg(short, long, value_name = "FILE", default_value = "store.json")]
        store: PathBuf,
        /// Matches per metric.
        #[arg(short)]
        k: Option<usize>,
        /// Metric to rank with; repeat for several. Defaults to all.
        #[arg(short, long = "metric")]
        metrics: Vec<Metric>,
        /// Use the single-pass running minimum (k = 1).
        #[arg(long)]
        running_min: bool,
        /// Evaluate metrics concurrently.
        #[arg(long)]
        parallel: bool,
        /// Print JSON instead of rows.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    TopK,
    RunningMinimum,
}

impl From<ModeConfig> for QueryMode {
    fn from(value: ModeConfig) -> Self {
        match value {
            ModeConfig::TopK => QueryMode::TopK,
            ModeConfig::RunningMinimum => QueryMode::RunningMinimum,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    descriptor: DescriptorKind,
    extensions: Vec<String>,
    parallel: bool,
    follow_links: bool,
    metrics: Vec<Metric>,
    topk: usize,
    mode: ModeConfig,
}

impl Default for Config {
    fn default() -> Self {
        let store = StoreConfig::default();
        let query = QueryConfig::default();
        Self {
            descriptor: store.descriptor,
            extensions: store.extensions,
            parallel: store.parallel,
            follow_links: store.follow_links,
            metrics: query.metrics,
            topk: query.k,
            mode: ModeConfig::TopK,
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    metric: Metric,
    path: String,
    distance: f64,
}

impl From<&DistanceResult> for MatchRecord {
    fn from(value: &DistanceResult) -> Self {
        Self {
            metric: value.metric,
            path: value.path.display().to_string(),
            distance: value.distance,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let directive = if cli.trace {
        "texsearch=info"
    } else {
        "texsearch=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => {
            let config = serde_json::from_str::<Config>(&fs::read_to_string(path)?)?;
            tracing::info!(path = %path.display(), "loaded config");
            config
        }
        None => Config::default(),
    };

    match cli.command {
        Some(Command::Describe {
            image,
            descriptor,
            json,
        }) => describe(&image, descriptor.unwrap_or(config.descriptor), json),
        Some(Command::Build {
            root,
            output,
            descriptor,
            parallel,
        }) => {
            let cfg = StoreConfig {
                descriptor: descriptor.unwrap_or(config.descriptor),
                extensions: config.extensions,
                parallel: parallel || config.parallel,
                follow_links: config.follow_links,
            };
            build(&root, &output, &cfg)
        }
        Some(Command::Query {
            image,
            store,
            k,
            metrics,
            running_min,
            parallel,
            json,
        }) => {
            let mode = if running_min {
                QueryMode::RunningMinimum
            } else {
                config.mode.into()
            };
            let cfg = QueryConfig {
                metrics: if metrics.is_empty() {
                    config.metrics
                } else {
                    metrics
                },
                k: if running_min { 1 } else { k.unwrap_or(config.topk) },
                mode,
                parallel: parallel || config.parallel,
            };
            run_query(&image, &store, &cfg, json)
        }
        None => Err("no command given; see --help".into()),
    }
}

fn describe(
    path: &Path,
    descriptor: DescriptorKind,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = load_gray_image(path)?;
    match descriptor {
        DescriptorKind::Glcm => {
            let stats = glcm_signature(&image, GlcmConfig::default())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                for (label, value) in TextureSignature::LABELS.iter().zip(stats.to_array()) {
                    println!("{label}: {value}");
                }
            }
        }
        DescriptorKind::Lbp => {
            let signature = descriptor.extract(&image)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&signature)?);
            } else {
                for (bin, value) in signature.as_slice().iter().enumerate() {
                    println!("bin {bin}: {value}");
                }
            }
        }
    }
    Ok(())
}

fn build(root: &Path, output: &Path, cfg: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let report = SignatureStore::build_report(root, &ImageDecoder, cfg, &CancelToken::new())?;
    report.store.save(output)?;
    eprintln!(
        "stored {} signatures ({} skipped) in {}",
        report.store.len(),
        report.skipped.len(),
        output.display()
    );
    Ok(())
}

fn run_query(
    image_path: &Path,
    store_path: &Path,
    cfg: &QueryConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = SignatureStore::load(store_path)?;
    let image = load_gray_image(image_path)?;
    let signature = store.descriptor().extract(&image)?;
    let results = RetrievalEngine::new(&store).query(&signature, cfg)?;

    let records: Vec<MatchRecord> = results.values().flatten().map(MatchRecord::from).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}, {}, {}", record.metric, record.path, record.distance);
        }
    }
    Ok(())
}
