use crate::share::config::DEFAULT_PACE;
use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Share files over HTTP: upload, list and remove them from a small web page
#[derive(Args, Debug)]
#[group(id = "share")]
pub struct Options {
    /// Socket address to listen on
    #[arg(default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// Directory with the read-only UI shell (index page, icon, script)
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Directory that uploads are written to, listed from and removed from (created if missing)
    #[arg(long, default_value = "pub")]
    pub pub_dir: PathBuf,

    /// Delay between listing events in milliseconds, 0 to send them back to back
    #[arg(long, default_value_t = DEFAULT_PACE.as_millis() as u64)]
    pub pace_ms: u64,
}
