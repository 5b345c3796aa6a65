mod display;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glossa_core::{CorpusColumns, DEFAULT_CORPUS_URL};
use glossa_model::evaluation::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use glossa_model::{DEFAULT_SMOOTHING, evaluate, train, train_test_split};
use glossa_service::http::{AppState, ServerConfig};
use glossa_service::{BootstrapConfig, CorpusSource, Detector, source_for, train_from};
use glossa_store::ArtifactStore;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glossa", version, about = "Statistical language identification")]
struct Cli {
    /// Directory holding vectorizer.json and model.json.
    #[arg(long, global = true, env = "GLOSSA_MODEL_DIR", default_value = "model")]
    model_dir: PathBuf,

    /// Training corpus: a CSV path or an http(s) URL.
    #[arg(long, global = true, env = "GLOSSA_CORPUS", default_value = DEFAULT_CORPUS_URL)]
    corpus: String,

    /// Laplace smoothing used when training.
    #[arg(long, global = true, env = "GLOSSA_SMOOTHING", default_value_t = DEFAULT_SMOOTHING)]
    smoothing: f64,

    /// Name of the text column in the corpus.
    #[arg(long, global = true, default_value = glossa_core::corpus::TEXT_COLUMN)]
    text_column: String,

    /// Name of the label column in the corpus.
    #[arg(long, global = true, default_value = glossa_core::corpus::LABEL_COLUMN)]
    label_column: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train on the full corpus and write the artifacts
    Train,
    /// Train on a seeded split and report hold-out metrics
    Evaluate {
        /// Fraction of rows held out for testing
        #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
        test_fraction: f64,
        /// Shuffle seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        /// Also write the model trained on the training split
        #[arg(long)]
        save: bool,
    },
    /// Detect the language of each TEXT
    Detect {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Read lines from stdin and detect each; `quit` exits
    Repl,
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "GLOSSA_ADDR", default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
        /// Answer empty text with 422 instead of a flagged prediction
        #[arg(long)]
        reject_empty: bool,
    },
}

impl Cli {
    fn columns(&self) -> CorpusColumns {
        CorpusColumns {
            text: self.text_column.clone(),
            label: self.label_column.clone(),
        }
    }

    fn source(&self) -> anyhow::Result<Arc<dyn CorpusSource>> {
        source_for(&self.corpus, self.columns()).context("selecting corpus source")
    }

    fn detector(&self) -> anyhow::Result<Detector> {
        let config = BootstrapConfig {
            model_dir: self.model_dir.clone(),
            smoothing: self.smoothing,
        };
        Ok(Detector::new(config, self.source()?))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("glossa v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Train => cmd_train(&cli).await,
        Command::Evaluate {
            test_fraction,
            seed,
            save,
        } => cmd_evaluate(&cli, *test_fraction, *seed, *save).await,
        Command::Detect { text } => cmd_detect(&cli, text).await,
        Command::Repl => cmd_repl(&cli).await,
        Command::Serve { addr, reject_empty } => cmd_serve(&cli, *addr, *reject_empty).await,
    }
}

async fn cmd_train(cli: &Cli) -> anyhow::Result<()> {
    let source = cli.source()?;
    let model = train_from(source.as_ref(), cli.smoothing)
        .await
        .context("training model")?;

    let store = ArtifactStore::new(&cli.model_dir);
    store.save(&model).context("writing model artifacts")?;

    eprintln!(
        "Trained {} classes over {} tokens -> {}",
        model.classes().len(),
        model.vocabulary().len(),
        store.dir().display()
    );
    Ok(())
}

async fn cmd_evaluate(cli: &Cli, test_fraction: f64, seed: u64, save: bool) -> anyhow::Result<()> {
    let source = cli.source()?;
    let corpus = source.load().await.context("loading corpus")?;
    let (train_rows, test_rows) =
        train_test_split(&corpus, test_fraction, seed).context("splitting corpus")?;
    eprintln!(
        "Split {} rows: {} train / {} test",
        corpus.len(),
        train_rows.len(),
        test_rows.len()
    );

    let smoothing = cli.smoothing;
    let (model, report) = tokio::task::spawn_blocking(move || {
        let model = train(&train_rows, smoothing)?;
        let report = evaluate(&model, &test_rows)?;
        Ok::<_, glossa_model::ModelError>((model, report))
    })
    .await
    .context("evaluation task panicked")?
    .context("training on split")?;

    display::print_report(&report);

    if save {
        let store = ArtifactStore::new(&cli.model_dir);
        store.save(&model).context("writing model artifacts")?;
        eprintln!("Saved model to {}", store.dir().display());
    }
    Ok(())
}

async fn cmd_detect(cli: &Cli, texts: &[String]) -> anyhow::Result<()> {
    let detector = cli.detector()?;
    for text in texts {
        let prediction = detector.detect(text).await.context("detecting language")?;
        display::print_prediction(text, &prediction);
    }
    Ok(())
}

async fn cmd_repl(cli: &Cli) -> anyhow::Result<()> {
    let detector = cli.detector()?;
    detector.model().await.context("loading model")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let prediction = detector.detect(line).await?;
        display::print_prediction(line, &prediction);
    }
    Ok(())
}

async fn cmd_serve(cli: &Cli, addr: SocketAddr, reject_empty: bool) -> anyhow::Result<()> {
    let detector = Arc::new(cli.detector()?);
    // Bootstrap before binding so the first request does not pay for training.
    detector.model().await.context("loading model")?;

    let state = Arc::new(AppState::new(detector, ServerConfig { reject_empty }));
    glossa_service::http::serve(addr, state)
        .await
        .with_context(|| format!("serving on {addr}"))
}
