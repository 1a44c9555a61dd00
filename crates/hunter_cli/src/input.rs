use std::path::Path;

use anyhow::Context;
use hunter_core::{expand, AddressSet};

/// Reads and expands the address list file.
///
/// Bytes that are not UTF-8 are replaced; they can only ever produce a
/// malformed-address error for their line.
pub async fn load_addresses(path: &Path) -> anyhow::Result<AddressSet> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read address list {}", path.display()))?;
    let text = String::from_utf8_lossy(&raw);
    let addresses = expand(text.lines())
        .with_context(|| format!("invalid address list {}", path.display()))?;
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::IpAddr;

    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn loads_ranges_and_literals() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# edge nodes").unwrap();
        writeln!(file, "198.51.100.7").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "10.0.0.1-10.0.0.3\r").unwrap();

        let set = load_addresses(file.path()).await.unwrap();
        let addrs: Vec<IpAddr> = set.iter().collect();
        assert_eq!(
            addrs,
            ["198.51.100.7", "10.0.0.1", "10.0.0.2", "10.0.0.3"]
                .iter()
                .map(|a| a.parse::<IpAddr>().unwrap())
                .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn reports_the_bad_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "10.0.0.1").unwrap();
        writeln!(file, "10.0.0.9-10.0.0.2").unwrap();

        let err = load_addresses(file.path()).await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("invalid address list"), "{message}");
        assert!(message.contains("line 2"), "{message}");
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        let err = load_addresses(&path).await.unwrap_err();
        assert!(err.to_string().contains("absent.txt"));
    }
}
