use crate::err::Error;
use crate::http::run_simple_server;
use crate::share::routes::{respond_to_request, State};
use hyper::body::Incoming;
use std::time::Duration;
use tokio::net::TcpListener;

mod config;
mod events;
mod mime;
pub mod opt;
mod path;
mod routes;

pub async fn main(options: opt::Options) -> Result<(), Error> {
    let opt::Options {
        listen,
        static_dir,
        pub_dir,
        pace_ms,
    } = options;

    let state = State::open(&static_dir, &pub_dir, Duration::from_millis(pace_ms)).await?;
    log::info!("Serving UI from: {}", state.static_root.display());
    log::info!("Sharing files in: {}", state.pub_root.display());

    log::info!("Binding to: {}", listen);
    let listener = TcpListener::bind(listen).await?;
    log::info!("Open http://{}/index.html", listener.local_addr()?);

    run_simple_server(listener, state, respond_to_request::<Incoming>).await?;

    Ok(())
}
