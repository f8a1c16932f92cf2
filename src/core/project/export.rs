use crate::core::connections::ConnectionLedger;
use std::io::{self, Write};

/// Output format of the connection list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Numbered human readable lines
    #[default]
    Text,
    /// Comma separated values with a header row
    Csv,
}

pub const CSV_HEADER: &str = "index,device_a,port_a,device_b,port_b,link_class";

/// Write every connection of the ledger in the requested format
pub fn write_connections<W: Write>(ledger: &ConnectionLedger, format: ExportFormat, out: &mut W) -> io::Result<()> {
    if format == ExportFormat::Csv {
        writeln!(out, "{}", CSV_HEADER)?;
    }

    for (index, conn) in ledger.connections().iter().enumerate() {
        let number = index + 1;
        match format {
            ExportFormat::Text => writeln!(out, "{}. {}", number, ledger.describe(conn))?,
            ExportFormat::Csv => writeln!(
                out,
                "{},{},{},{},{},{}",
                number,
                csv_field(&ledger.device_name(conn.device_a)),
                conn.port_a,
                csv_field(&ledger.device_name(conn.device_b)),
                conn.port_b,
                csv_field(conn.class.label())
            )?,
        }
    }
    Ok(())
}

/// Connection list rendered into a string
pub fn render_connections(ledger: &ConnectionLedger, format: ExportFormat) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_connections(ledger, format, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::devices::PortCounts;
    use crate::core::types::DeviceKind;

    fn linked_ledger() -> ConnectionLedger {
        let mut ledger = ConnectionLedger::new();
        let a = ledger.add_device("A", DeviceKind::MicronUhd, PortCounts::new(0, 1, 0)).unwrap().id();
        let b = ledger.add_device("Rack, 2", DeviceKind::Horizon, PortCounts::new(0, 1, 0)).unwrap().id();
        ledger.add_connection(a, "LC1", b, "LC1").unwrap();
        ledger
    }

    #[test]
    fn test_text_export() {
        let text = render_connections(&linked_ledger(), ExportFormat::Text);
        assert_eq!(text, "1. A [LC1] <-> Rack, 2 [LC1] (LC-LC (100G))\n");
    }

    #[test]
    fn test_csv_export_quotes_fields() {
        let csv = render_connections(&linked_ledger(), ExportFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1,A,LC1,\"Rack, 2\",LC1,LC-LC (100G)");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_empty_ledger_exports_header_only() {
        assert_eq!(render_connections(&ConnectionLedger::new(), ExportFormat::Csv), format!("{}\n", CSV_HEADER));
        assert!(render_connections(&ConnectionLedger::new(), ExportFormat::Text).is_empty());
    }
}
