//! Command line: run the HTTP service or the pipeline on a local file.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use svrlab_io::read_path;
use svrlab_pipeline::{describe, GammaSetting, TrainingPipeline, TrainingRequest};

use crate::config::ServerConfig;
use crate::run_server;

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "svrlab")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train RBF support vector regressors on tabular data")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Server host, overrides HOST
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides PORT
        #[arg(short, long)]
        port: Option<u16>,

        /// Upload limit in bytes, overrides MAX_FILE_SIZE
        #[arg(long)]
        max_file_size: Option<usize>,
    },

    /// Describe a CSV or Excel file
    Info {
        /// Input data file
        file: PathBuf,
    },

    /// Train an SVR on a local file and print the result as JSON
    Train {
        /// Input data file
        file: PathBuf,

        /// Column to predict
        #[arg(short, long)]
        target: String,

        /// Feature columns, comma separated (default: every other numeric column)
        #[arg(short, long, value_delimiter = ',')]
        features: Option<Vec<String>>,

        #[arg(short = 'c', long = "c", default_value_t = 1.0)]
        c: f64,

        #[arg(long, default_value_t = 0.1)]
        epsilon: f64,

        /// "scale", "auto" or a positive number
        #[arg(long, default_value = "scale")]
        gamma: String,

        #[arg(long, default_value = "rbf")]
        kernel: String,

        #[arg(long, default_value_t = 3)]
        degree: u32,

        #[arg(long, default_value_t = 0.0)]
        coef0: f64,

        #[arg(long, default_value_t = 0.2)]
        test_size: f64,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Skip rendering the diagnostic plots
        #[arg(long)]
        no_plots: bool,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    max_file_size: Option<usize>,
) -> anyhow::Result<()> {
    let mut config = ServerConfig::default();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(limit) = max_file_size {
        config.max_file_size = limit;
    }
    run_server(config).await
}

pub fn cmd_info(file: &Path) -> anyhow::Result<()> {
    let dataset = read_path(file)?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let info = describe(&filename, &dataset);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

/// Parse `--gamma`: numbers become explicit values, anything else is a policy name.
pub fn parse_gamma(raw: &str) -> GammaSetting {
    match raw.trim().parse::<f64>() {
        Ok(v) => GammaSetting::Value(v),
        Err(_) => GammaSetting::Policy(raw.trim().to_string()),
    }
}

pub fn cmd_train(file: &Path, request: &TrainingRequest, plots: bool) -> anyhow::Result<()> {
    let dataset = read_path(file)?;
    let pipeline = if plots {
        TrainingPipeline::new()
    } else {
        TrainingPipeline::without_plots()
    };
    let result = pipeline.run(&dataset, request)?;
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Dispatch a parsed command line. No subcommand starts the server.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        None => cmd_serve(None, None, None).await,
        Some(Commands::Serve {
            host,
            port,
            max_file_size,
        }) => cmd_serve(host, port, max_file_size).await,
        Some(Commands::Info { file }) => cmd_info(&file),
        Some(Commands::Train {
            file,
            target,
            features,
            c,
            epsilon,
            gamma,
            kernel,
            degree,
            coef0,
            test_size,
            seed,
            no_plots,
        }) => {
            let request = TrainingRequest {
                c,
                epsilon,
                gamma: parse_gamma(&gamma),
                kernel,
                degree,
                coef0,
                target_column: target,
                feature_columns: features,
                test_size,
                random_state: seed,
            };
            tokio::task::spawn_blocking(move || cmd_train(&file, &request, !no_plots)).await?
        }
    }
}
