//! Version string for `gestor --version`.

/// The current version of Gestor, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `gestor <version>`, as printed by `--version`.
pub fn version_line() -> String {
    format!("gestor {}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_line() {
        assert!(version_line().starts_with("gestor "));
        assert!(version_line().ends_with(VERSION));
    }

    #[test]
    fn test_version_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }
}
