use crate::err::{AppliesTo, IoErrorExt};
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};

/// Accepts the next connection, skipping connections that failed before they
/// could be handed over. Any other error is a problem with the listener itself.
pub async fn accept(listener: &TcpListener) -> Result<(TcpStream, SocketAddr), io::Error> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                stream.set_nodelay(true)?;
                return Ok((stream, addr));
            }
            Err(e) => match e.applies_to() {
                AppliesTo::Connection => log::debug!("Aborted connection dropped: {}", e),
                AppliesTo::Listener => return Err(e),
            },
        }
    }
}
