//! fgsm: sweep FGSM attacks over a frozen network and a labeled sample set
//!
//! Example:
//!   fgsm --model lenet.json --dataset mnist_test.json \
//!       --epsilon 0 --epsilon 0.1 --output report.json
use clap::Parser;
use fgsm_rs::config::AttackConfig;
use fgsm_rs::dataset::Dataset;
use fgsm_rs::dnn::DNN;
use fgsm_rs::evaluate::sweep;
use fgsm_rs::Classifier;
use log::{info, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fgsm")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Network description (JSON)
    #[arg(short, long, value_name = "FILE")]
    model: PathBuf,

    /// Labeled samples (JSON)
    #[arg(short, long, value_name = "FILE")]
    dataset: PathBuf,

    /// Attack configuration (JSON); defaults are used for missing fields
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Epsilon to evaluate; repeat to sweep. Overrides the configured list
    #[arg(short, long = "epsilon", value_name = "EPS")]
    epsilons: Vec<f64>,

    /// Only evaluate the first N samples
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Where to write the JSON report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn init_logging(level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    // Reports may go to stdout, so logs go to stderr
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    let config = match &cli.config {
        Some(path) => AttackConfig::load(path)?,
        None => AttackConfig::default(),
    }
    .with_epsilons(cli.epsilons);
    config.validate()?;

    let model = DNN::load(&cli.model)?;
    info!("model: {}", model);
    let dataset = Dataset::load(&cli.dataset)?.prepare(
        cli.limit,
        model.input_dims(),
        model.num_classes(),
    )?;
    info!(
        "attacking {} samples at {} epsilons",
        dataset.len(),
        config.epsilons.len()
    );

    let reports = sweep(&model, dataset.samples(), &config)?;

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    serde_json::to_writer_pretty(&mut writer, &reports)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
