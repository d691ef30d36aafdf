//! Runtime configuration, read from command-line flags with environment fallbacks.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Arithmetic HTTP API server
#[derive(Parser, Debug, Clone)]
#[command(name = "calc-api")]
#[command(version)]
#[command(about = "Serves integer add/subtract/multiply over HTTP", long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "CALC_API_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to bind (0 picks a free port)
    #[arg(short, long, env = "CALC_API_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "CALC_API_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "CALC_API_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
