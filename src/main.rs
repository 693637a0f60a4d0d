mod share;

mod body;
mod config;
mod err;
mod http;
mod opt;
mod tcp;

#[tokio::main]
async fn main() -> Result<(), err::DisplayError> {
    let opt::Options { verbose, share } = clap::Parser::parse();

    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    share::main(share).await?;

    Ok(())
}
