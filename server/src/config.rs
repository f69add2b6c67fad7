use std::net::{IpAddr, SocketAddr};

use clap::{Parser, ValueEnum};

/// Runtime configuration, read from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "Todo list HTTP API")]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Single-line human-readable output.
    Compact,
    /// One JSON object per event.
    Json,
}
