//! Well-known service ports.
//!
//! The quick-scan presets: each entry maps a service name to the ports
//! it conventionally listens on. Used both to resolve a service name
//! given on the command line and to label open ports in scan output.

pub struct Service {
    pub name: &'static str,
    pub ports: &'static [u16],
}

pub const WELL_KNOWN: &[Service] = &[
    Service { name: "FTP", ports: &[21] },
    Service { name: "SSH", ports: &[22] },
    Service { name: "Telnet", ports: &[23] },
    Service { name: "SMTP", ports: &[25] },
    Service { name: "DNS", ports: &[53] },
    Service { name: "DHCP", ports: &[67, 68] },
    Service { name: "HTTP", ports: &[80] },
    Service { name: "POP3", ports: &[110] },
    Service { name: "IMAP", ports: &[143] },
    Service { name: "LDAP", ports: &[389] },
    Service { name: "HTTPS", ports: &[443] },
    Service { name: "MSSQL", ports: &[1433] },
    Service { name: "MySQL", ports: &[3306] },
    Service { name: "RDP", ports: &[3389] },
    Service { name: "PostgreSQL", ports: &[5432] },
    Service { name: "HTTPS Alt", ports: &[8443] },
];

/// Case-insensitive name lookup; spaces and dashes are interchangeable
/// so `https-alt` on the command line matches "HTTPS Alt".
pub fn ports_for(name: &str) -> Option<&'static [u16]> {
    let wanted = normalize(name);
    WELL_KNOWN
        .iter()
        .find(|service| normalize(service.name) == wanted)
        .map(|service| service.ports)
}

/// The service conventionally bound to `port`, if any.
pub fn name_for(port: u16) -> Option<&'static str> {
    WELL_KNOWN
        .iter()
        .find(|service| service.ports.contains(&port))
        .map(|service| service.name)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
