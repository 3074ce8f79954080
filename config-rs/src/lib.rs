//! config-rs/lib.rs
//! Shared configuration utilities for the query advisor workspace
//! Provides env-driven lookups for ports, bind addresses and typed settings

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Load variables from a `.env` file in the working directory, if present.
///
/// Returns true when a file was found and applied. Variables already set in
/// the process environment take precedence.
pub fn load_dotenv() -> bool {
    dotenv::dotenv().is_ok()
}

/// Read an environment variable, treating empty or whitespace-only values as unset
pub fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Return the first of `names` that is set to a non-empty value
pub fn env_string_any(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env_string(name))
}

/// Read and parse an environment variable, falling back to `default`
///
/// An unparsable value is logged and replaced by the default rather than
/// failing startup.
pub fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env_string(name) {
        Some(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("Invalid value {:?} in {}, using default {:?}", raw, name, default);
            default
        }),
        None => default,
    }
}

/// Read a duration expressed in milliseconds
pub fn env_duration_ms(name: &str, default: Duration) -> Duration {
    Duration::from_millis(env_or(name, default.as_millis() as u64))
}

/// Read a duration expressed in whole seconds
pub fn env_duration_secs(name: &str, default: Duration) -> Duration {
    Duration::from_secs(env_or(name, default.as_secs()))
}

/// Get service port from environment variables with proper fallback
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "QUERY_ADVISOR")
/// * `default_port` - The default port to use if not specified in environment
pub fn get_service_port(service_name: &str, default_port: u16) -> u16 {
    let var_name = format!("{}_SERVICE_PORT", service_name.to_uppercase());
    env_or(&var_name, default_port)
}

/// Create a SocketAddr for binding a service
///
/// `<NAME>_SERVICE_ADDR` may hold a full `host:port` or `http://host:port`
/// override; otherwise the service binds all interfaces on the configured port.
pub fn get_bind_address(service_name: &str, default_port: u16) -> SocketAddr {
    let var_name = format!("{}_SERVICE_ADDR", service_name.to_uppercase());

    if let Some(addr_str) = env_string(&var_name) {
        let stripped = addr_str
            .strip_prefix("http://")
            .or_else(|| addr_str.strip_prefix("https://"))
            .unwrap_or(&addr_str);
        match stripped.parse::<SocketAddr>() {
            Ok(addr) => return addr,
            Err(_) => tracing::warn!("Invalid address format in {}, using default", var_name),
        }
    }

    let port = get_service_port(service_name, default_port);
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)
}

/// Service name for logging and health reporting
pub fn get_formatted_service_name(service_name: &str) -> String {
    format!("{}-service", service_name.to_lowercase().replace('_', "-"))
}
