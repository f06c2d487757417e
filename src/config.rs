use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::Level;

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// SQLite database file
    #[arg(long, env = "TODO_DATABASE", default_value = "TodoLists.db")]
    pub database: PathBuf,

    /// Address to listen on
    #[arg(long, env = "TODO_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    #[arg(long, env = "TODO_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Origin allowed to call the API from a browser
    #[arg(long, env = "TODO_CORS_ORIGIN", default_value = "http://localhost:5173")]
    pub cors_origin: String,

    /// Insert sample todos when the database is empty
    #[arg(long, env = "TODO_SEED")]
    pub seed: bool,

    /// Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)
    #[arg(short, long = "verbose", action = ArgAction::Count)]
    pub verbosity: u8,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn log_level(&self) -> Level {
        match self.verbosity {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
