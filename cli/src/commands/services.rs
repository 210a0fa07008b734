use colored::*;

use netpro_common::network::service::WELL_KNOWN;

use crate::terminal::{colors, print};

/// Prints the quick-scan preset table: one line per well-known service
/// with the ports it conventionally listens on.
pub fn services() -> anyhow::Result<()> {
    let key_width: usize = WELL_KNOWN
        .iter()
        .map(|service| service.name.len())
        .max()
        .unwrap_or(0);
    print::set_key_width(key_width);

    for service in WELL_KNOWN {
        let ports: String = service
            .ports
            .iter()
            .map(u16::to_string)
            .collect::<Vec<String>>()
            .join(", ");

        print::aligned_line(service.name, ports.color(colors::ACCENT));
    }

    Ok(())
}
