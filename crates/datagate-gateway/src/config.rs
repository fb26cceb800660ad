//! Gateway configuration.

use std::path::PathBuf;

use clap::Parser;
use datagate_core::StoreConfig;

/// DataGate gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "datagate-gateway")]
#[command(about = "Generic data-access HTTP gateway")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Path to the data directory.
    #[arg(short, long, default_value = "./datagate_data")]
    pub data: PathBuf,

    /// Keep data in a temporary store that is discarded on exit.
    #[arg(long, default_value_t = false)]
    pub ephemeral: bool,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Path to the data directory.
    pub data_path: PathBuf,
    /// Keep data in a temporary store that is discarded on exit.
    pub ephemeral: bool,
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            data_path: args.data.clone(),
            ephemeral: args.ephemeral,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            data_path: PathBuf::from("./datagate_data"),
            ephemeral: false,
        }
    }
}

impl GatewayConfig {
    /// Store configuration matching this gateway configuration.
    pub fn store_config(&self) -> StoreConfig {
        if self.ephemeral {
            StoreConfig::temporary()
        } else {
            StoreConfig::new(&self.data_path)
        }
    }
}
