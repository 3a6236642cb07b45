//! Application configuration management.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables.

use rent_core::{models::Precision, ports::LinearSolver};
use rent_solver::{DividerSettings, RentDivider, clarabel::ClarabelSolver};
use serde::{Deserialize, Serialize};
use std::path::Path;

type ClarabelSettings = <ClarabelSolver as LinearSolver>::Settings;

/// Tuning for the Clarabel backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClarabelConfig {
    /// Maximum interior point iterations
    pub max_iter: u32,
    /// Primal and dual feasibility tolerance
    pub tol_feas: f64,
    /// Absolute duality gap tolerance
    pub tol_gap_abs: f64,
    /// Relative duality gap tolerance
    pub tol_gap_rel: f64,
}

impl Default for ClarabelConfig {
    fn default() -> Self {
        let settings: ClarabelSettings = Default::default();
        Self {
            max_iter: settings.max_iter,
            tol_feas: settings.tol_feas,
            tol_gap_abs: settings.tol_gap_abs,
            tol_gap_rel: settings.tol_gap_rel,
        }
    }
}

/// The configuration of the rent divider used by every subcommand
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// The currency grid (`decimals`, 2 for cents)
    #[serde(default)]
    pub precision: Precision,

    /// Linear solver tuning
    #[serde(default)]
    pub clarabel: ClarabelConfig,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file, if given
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern
    /// `RENTDIV_<SECTION>__<KEY>` to `<section>.<key>`, for example
    ///
    /// ```bash
    /// # Divide whole currency units rather than cents
    /// export RENTDIV_PRECISION__DECIMALS=0
    ///
    /// # Allow the solver more iterations
    /// export RENTDIV_CLARABEL__MAX_ITER=500
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // This maps RENTDIV_CLARABEL__MAX_ITER to clarabel.max_iter
        config = config.add_source(
            config::Environment::with_prefix("RENTDIV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }

    /// Build the divider this configuration describes
    pub fn divider(&self) -> RentDivider<ClarabelSolver> {
        let mut settings: ClarabelSettings = Default::default();
        settings.verbose = false;
        settings.max_iter = self.clarabel.max_iter;
        settings.tol_feas = self.clarabel.tol_feas;
        settings.tol_gap_abs = self.clarabel.tol_gap_abs;
        settings.tol_gap_rel = self.clarabel.tol_gap_rel;

        RentDivider::new(
            ClarabelSolver::new(settings),
            DividerSettings {
                precision: self.precision,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.precision, Precision::default());
        assert_eq!(config.clarabel.max_iter, ClarabelConfig::default().max_iter);
    }

    #[test]
    fn test_file_overrides() {
        let path =
            std::env::temp_dir().join(format!("rentdiv-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[precision]\ndecimals = 0\n\n[clarabel]\nmax_iter = 42").unwrap();
        drop(file);

        let config = AppConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.precision.decimals(), 0);
        assert_eq!(config.clarabel.max_iter, 42);
        assert_eq!(config.divider().settings().precision.decimals(), 0);
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/rentdiv.toml");
        assert!(AppConfig::load(Some(path)).is_err());
    }
}
