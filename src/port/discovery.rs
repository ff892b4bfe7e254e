//! Serial device discovery.
//!
//! Lists every serial device identifier on the host, sorted, with no
//! content-based filtering. A vendor-ID filter (keep only Arduino-style
//! ACM devices) was considered and deliberately left out: the modem can sit
//! behind any USB-serial bridge, so the user picks from the full list.

use tracing::debug;

use super::error::LinkError;

/// Enumerate available serial device identifiers on this host.
pub fn list_ports() -> Result<Vec<String>, LinkError> {
    let mut names: Vec<String> = serialport::available_ports()
        .map_err(LinkError::Serial)?
        .into_iter()
        .map(|info| info.port_name)
        .collect();
    names.sort();
    debug!(count = names.len(), "enumerated serial ports");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_ports_is_sorted() {
        // The host may expose zero ports; the call itself must not fail and
        // the result must be sorted either way.
        let names = list_ports().expect("enumeration should not fail");
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
