use log::debug;
use std::time::Duration;
use tokio::net::TcpStream;

// @module: Connectivity probe, run once before any translation starts

/// Check whether the network is reachable by opening one TCP connection
///
/// Any connect error or timeout counts as offline.
pub async fn is_online(probe_address: &str, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect(probe_address)).await {
        Ok(Ok(_stream)) => {
            debug!("Connectivity probe to {} succeeded", probe_address);
            true
        }
        Ok(Err(e)) => {
            debug!("Connectivity probe to {} failed: {}", probe_address, e);
            false
        }
        Err(_) => {
            debug!("Connectivity probe to {} timed out after {:?}", probe_address, timeout);
            false
        }
    }
}
