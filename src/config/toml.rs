//! TOML configuration file parsing
//!
//! ```toml
//! [duration]
//! minimum = 30.0
//! maximum = 70.0
//! unit = "milliseconds"
//!
//! [duration.distribution]
//! kind = "normal"
//! mean = 50.0
//! std_dev = 6.5
//!
//! [wait]
//! spin_threshold_us = 15000
//! ```

use super::cli::DistributionArgs;
use super::validator::validate_file_config;
use super::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse and validate a TOML configuration file
pub fn load_config(path: &Path) -> Result<Config> {
    let config = parse_toml_file(path)?;
    validate_file_config(&config)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Resolve the configuration for a CLI invocation
///
/// A `--config` file wins over `--min`/`--max` flags; `--unit` overrides the
/// file's unit. The result is validated.
pub fn resolve_config(args: &DistributionArgs) -> Result<Config> {
    let config = match (&args.config, args.to_duration_config()?) {
        (Some(path), flags) => {
            if flags.is_some() {
                tracing::warn!(path = %path.display(), "--config given, ignoring distribution flags");
            }
            let mut config = load_config(path)?;
            if let Some(unit) = args.unit {
                config.duration = config.duration.with_unit(unit.into());
            }
            config
        }
        (None, Some(duration)) => Config {
            duration,
            wait: WaitConfig::default(),
        },
        (None, None) => anyhow::bail!("either --config <FILE> or --min and --max must be given"),
    };

    validate_file_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::{FamilyArg, UnitArg};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const NORMAL_TOML: &str = r#"
[duration]
minimum = 30.0
maximum = 70.0
unit = "seconds"

[duration.distribution]
kind = "normal"
mean = 50.0
std_dev = 6.5

[wait]
spin_threshold_us = 15000
"#;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_toml_basic() {
        let config = parse_toml_string(NORMAL_TOML).unwrap();
        assert_eq!(
            config.duration,
            DurationConfig::normal(30.0, 70.0, 50.0, 6.5).with_unit(TimeUnit::Seconds)
        );
        assert_eq!(config.wait.spin_threshold_us, 15000);
        assert_eq!(config.wait.spin_cap, WaitConfig::default().spin_cap);
    }

    #[test]
    fn test_parse_toml_defaults() {
        let config = parse_toml_string("[duration]\nminimum = 1.0\nmaximum = 2.0\n").unwrap();
        assert_eq!(config.duration, DurationConfig::uniform(1.0, 2.0));
        assert_eq!(config.wait, WaitConfig::default());
    }

    #[test]
    fn test_parse_toml_families() {
        let config = parse_toml_string(
            "[duration]\nminimum = 0.0\nmaximum = 10.0\n[duration.distribution]\nkind = \"power\"\npower = 2.0\n",
        )
        .unwrap();
        assert_eq!(config.duration, DurationConfig::power(0.0, 10.0, 2.0, false));

        let config = parse_toml_string(
            "[duration]\nminimum = 5.0\nmaximum = 10.0\n[duration.distribution]\nkind = \"exponential\"\n",
        )
        .unwrap();
        assert_eq!(config.duration, DurationConfig::exponential(5.0, 10.0, None));
    }

    #[test]
    fn test_parse_toml_unknown_family() {
        let result = parse_toml_string(
            "[duration]\nminimum = 0.0\nmaximum = 1.0\n[duration.distribution]\nkind = \"zipf\"\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_file() {
        let file = write_temp(NORMAL_TOML);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.duration.unit(), TimeUnit::Seconds);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let file = write_temp(
            "[duration]\nminimum = 0.0\nmaximum = 1.0\n[duration.distribution]\nkind = \"triangular\"\nmode = 3.0\n",
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("mode"), "{:#}", err);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/durand.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_resolve_config_unit_override() {
        let file = write_temp(NORMAL_TOML);
        let args = DistributionArgs {
            config: Some(file.path().to_path_buf()),
            unit: Some(UnitArg::Milliseconds),
            ..DistributionArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.duration.unit(), TimeUnit::Milliseconds);
        assert_eq!(config.wait.spin_threshold_us, 15000);
    }

    #[test]
    fn test_resolve_config_from_flags() {
        let args = DistributionArgs {
            min: Some(1.0),
            max: Some(3.0),
            distribution: FamilyArg::Arcsine,
            ..DistributionArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.duration, DurationConfig::arcsine(1.0, 3.0));

        assert!(resolve_config(&DistributionArgs::default()).is_err());
    }
}
