use std::net::ToSocketAddrs;
use std::{fmt, net::TcpListener};

#[derive(Debug)]
pub enum Error {
    AddressResolution {
        context: String,
    },
    AddressDefinition {
        context: String,
        source: std::io::Error,
    },
    TcpListener {
        context: String,
        source: std::io::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AddressResolution { context } => {
                write!(fmt, "Could not resolve server address: {context}")
            }
            Error::AddressDefinition { context, source } => {
                write!(fmt, "Invalid server address: {context} | {source}")
            }
            Error::TcpListener { context, source } => {
                write!(fmt, "Could not build TCP listener: {context} | {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::AddressResolution { .. } => None,
            Error::AddressDefinition { source, .. } | Error::TcpListener { source, .. } => {
                Some(source)
            }
        }
    }
}

/// Binds a listener on the first address `host` resolves to.
///
/// Port 0 lets the OS pick a free port, use `local_addr()` to find out which.
pub fn listen_with_host_port(host: &str, port: u16) -> Result<TcpListener, Error> {
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|err| Error::AddressDefinition {
            context: format!("Could not resolve address {host}:{port}"),
            source: err,
        })?
        .next()
        .ok_or_else(|| Error::AddressResolution {
            context: format!("No address found for {host}:{port}"),
        })?;

    let listener = TcpListener::bind(addr).map_err(|err| Error::TcpListener {
        context: format!("Could not listen on address {host}:{port}"),
        source: err,
    })?;

    // Required by tokio / hyper when handing over a std listener.
    listener
        .set_nonblocking(true)
        .map_err(|err| Error::TcpListener {
            context: format!("Could not set {host}:{port} listener as non blocking"),
            source: err,
        })?;

    Ok(listener)
}
