use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::app_state::AppState;
use crate::artifacts::ArtifactSet;
use crate::config_loader::{load_config, ArancelConfig};
use crate::encoder::PredictionInput;
use crate::errors::{ArancelError, ArancelResult};
use crate::form_controller::parse_terreno;
use crate::predictor::predict_arancel;

/// Top-level CLI interface
#[derive(Parser)]
#[command(name = "arancel", version, about = "Land-value (arancel) prediction form and API")]
pub struct Cli {
    /// Configuration file (defaults to ./arancel.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the model artifacts
    #[arg(long, global = true)]
    pub model_dir: Option<PathBuf>,

    /// Verbose (debug level) logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the prediction form and JSON API
    Serve {
        /// Host/IP to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
    },

    /// Predict a single arancel and print it
    Predict {
        #[arg(long, default_value = "PU")]
        tipo_pu_pr: String,
        #[arg(long)]
        estado: String,
        #[arg(long)]
        tipo_predio: String,
        #[arg(long)]
        sector: String,
        #[arg(long)]
        terreno: String,
    },

    /// Print the dropdown options derived from the feature names as JSON
    Options,

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Load layered configuration and apply the global CLI overrides.
    pub fn resolve_config(&self) -> ArancelResult<ArancelConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(dir) = &self.model_dir {
            config.model_dir = dir.clone();
        }
        if let Commands::Serve { host, port } = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }
        Ok(config)
    }
}

pub fn dispatch(cli: Cli) -> ArancelResult<()> {
    let config = cli.resolve_config()?;

    match cli.command {
        Commands::Config => {
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| ArancelError::internal(format!("TOML serialization failed: {e}")))?;
            println!("{rendered}");
            Ok(())
        }
        Commands::Options => {
            let artifacts = ArtifactSet::load(&config.artifact_paths())?;
            println!("{}", serde_json::to_string_pretty(&artifacts.options)?);
            Ok(())
        }
        Commands::Predict {
            tipo_pu_pr,
            estado,
            tipo_predio,
            sector,
            terreno,
        } => {
            let terreno = parse_terreno(&terreno)?;
            let artifacts = ArtifactSet::load(&config.artifact_paths())?;
            let input = PredictionInput {
                tipo_pu_pr,
                estado,
                tipo_predio,
                sector,
                terreno,
            };
            let arancel = predict_arancel(&artifacts, &input)?;
            println!("{arancel:.2}");
            Ok(())
        }
        Commands::Serve { .. } => serve(config),
    }
}

fn serve(config: ArancelConfig) -> ArancelResult<()> {
    let artifacts = Arc::new(ArtifactSet::load(&config.artifact_paths())?);
    let addr = config.bind_address();
    let state = Arc::new(AppState::new(artifacts, config.form.clone()));
    let app = crate::web::build_router(state);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| ArancelError::io("building tokio runtime", e))?;

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ArancelError::io(format!("binding {addr}"), e))?;
        info!("HTTP server listening on http://{addr}");
        axum::serve(listener, app).await.map_err(|e| {
            error!("Server error: {e}");
            ArancelError::io("serving HTTP", e)
        })
    })
}
