mod cli;

use anyhow::Result;
use std::path::PathBuf;

pub(crate) use cli::as_cli;

/// Flags accepted anywhere on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GlobalOptions {
    pub(crate) config: Option<PathBuf>,
    pub(crate) verbose: bool,
}

impl GlobalOptions {
    /// Split global flags from the rest of the arguments. The returned
    /// arguments keep the program name at index 0.
    pub(crate) fn extract(args: &[String]) -> Result<(Self, Vec<String>)> {
        let mut options = Self::default();
        let mut rest = Vec::with_capacity(args.len());
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--verbose" => options.verbose = true,
                "--config" => {
                    let Some(path) = iter.next() else {
                        anyhow::bail!("--config needs a path");
                    };
                    options.config = Some(PathBuf::from(shellexpand(path)));
                }
                _ => rest.push(arg.clone()),
            }
        }
        Ok((options, rest))
    }
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
