use anyhow::Result;

use super::search::ConnectionArgs;

/// List store indexes, optionally filtered by a substring
pub fn execute_list_indexes(connection: &ConnectionArgs, filter: Option<&str>) -> Result<()> {
    let client = connection.connect()?;

    let indexes = client.list_indexes(filter)?;
    if indexes.is_empty() {
        eprintln!("No indexes found");
        return Ok(());
    }

    eprintln!("Available indexes:");
    for index in indexes {
        println!("  - {}", index);
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("logscan v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Log search, parsing and transaction grouping for Splunk-compatible log stores.");
}
