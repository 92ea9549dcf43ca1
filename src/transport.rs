//! Statsd transport setup.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use cadence::{MetricError, UdpMetricSink};

use crate::Error;

/// Host of the statsd collector.
pub const STATSD_HOST: &str = "localhost";

/// Port of the statsd collector.
pub const STATSD_PORT: u16 = 8125;

/// Connects to the statsd collector at `localhost:8125` over UDP.
pub fn connect_udp() -> Result<UdpMetricSink, Error> {
    connect_udp_to((STATSD_HOST, STATSD_PORT))
}

/// Connects to a statsd collector at `addr` over UDP.
///
/// The address is resolved once. The local socket is bound to the address
/// family of the first resolved address and never blocks on send.
pub fn connect_udp_to<A: ToSocketAddrs>(addr: A) -> Result<UdpMetricSink, Error> {
    let target = addr
        .to_socket_addrs()
        .map_err(|err| Error::Connect(err.into()))?
        .next()
        .ok_or_else(|| {
            Error::Connect(MetricError::from((
                cadence::ErrorKind::InvalidInput,
                "statsd address did not resolve",
            )))
        })?;

    let bind_addr = match target {
        SocketAddr::V4(_) => "0.0.0.0:0",
        SocketAddr::V6(_) => "[::]:0",
    };
    let socket = UdpSocket::bind(bind_addr).map_err(|err| Error::Connect(err.into()))?;
    socket
        .set_nonblocking(true)
        .map_err(|err| Error::Connect(err.into()))?;

    log::debug!("sending runtime stats to statsd at {}", target);
    UdpMetricSink::from(target, socket).map_err(Error::Connect)
}
