//! Networking constants shared by server and client.

/// TCP port the quotation server listens on.
pub const DEFAULT_PORT: u16 = 8080;
/// Route serving the latest bid.
pub const QUOTATION_PATH: &str = "/cotacao";
/// Route serving process health.
pub const HEALTH_PATH: &str = "/health";

/// Helper to format a host with a port like "host:port".
pub fn addr(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_joins_host_and_port() {
        assert_eq!(addr("localhost", DEFAULT_PORT), "localhost:8080");
    }
}
