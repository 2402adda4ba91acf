use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wall_bond::Bond;
use wall_core::{BrickDimensions, BrickLayout, ErrorInfo, WallError};
use wall_graph::{HomePosition, PlacementGraph, Sequencer, StrideEnvelope};
use wall_plan::SolverOptions;

use crate::commands::WallArgs;

/// Everything needed to plan one wall. Every field has a default so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default = "default_bond")]
    pub bond: Bond,
    #[serde(default = "default_courses")]
    pub courses: usize,
    /// Wall width in relative units; the bond's default width when absent.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub dims: BrickDimensions,
    #[serde(default)]
    pub envelope: StrideEnvelope,
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,
    #[serde(default)]
    pub solver: SolverOptions,
    #[serde(default)]
    pub home: HomePosition,
}

fn default_bond() -> Bond {
    Bond::Stretcher
}

fn default_courses() -> usize {
    8
}

fn default_time_limit_ms() -> u64 {
    10_000
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            bond: default_bond(),
            courses: default_courses(),
            width: None,
            dims: BrickDimensions::default(),
            envelope: StrideEnvelope::default(),
            time_limit_ms: default_time_limit_ms(),
            solver: SolverOptions::default(),
            home: HomePosition::default(),
        }
    }
}

impl PlanConfig {
    /// Reads a YAML config file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        let config: PlanConfig = serde_yaml::from_str(&contents).map_err(|err| {
            WallError::Config(
                ErrorInfo::new("invalid-config", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Ok(config)
    }

    /// Loads the file named by `--config` if any, then applies the command-line overrides.
    pub fn resolve(args: &WallArgs) -> Result<Self, Box<dyn Error>> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(args);
        Ok(config)
    }

    fn apply(&mut self, args: &WallArgs) {
        if let Some(bond) = args.bond {
            if bond != self.bond {
                // a width valid for one bond is rarely valid for another
                self.width = None;
            }
            self.bond = bond;
        }
        if let Some(courses) = args.courses {
            self.courses = courses;
        }
        if let Some(width) = args.width {
            self.width = Some(width);
        }
        if let Some(height) = args.stride_height {
            self.envelope.height = height;
        }
        if let Some(width) = args.stride_width {
            self.envelope.width = width;
        }
        if let Some(limit) = args.time_limit_ms {
            self.time_limit_ms = limit;
        }
        if let Some(kind) = args.solver {
            self.solver.kind = kind;
        }
        if let Some(restarts) = args.restarts {
            self.solver.restarts = restarts;
        }
        if let Some(seed) = args.seed {
            self.solver.seed = seed;
        }
    }

    /// Effective wall width.
    pub fn wall_width(&self) -> f64 {
        self.width.unwrap_or_else(|| self.bond.default_width())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    pub fn sequencer(&self) -> Sequencer {
        Sequencer::new(self.home)
    }

    /// Bond pattern converted to bricks.
    pub fn layout(&self) -> Result<BrickLayout, WallError> {
        self.bond
            .pattern(self.courses, self.wall_width())?
            .to_layout(self.dims)
    }

    /// Layout plus its support and reachability relations.
    pub fn graph(&self) -> Result<PlacementGraph, WallError> {
        PlacementGraph::build(self.layout()?, self.envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;
    use wall_plan::SolverKind;

    fn args() -> WallArgs {
        WallArgs::default()
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bond: flemish\nenvelope:\n  width: 500\nsolver:\n  kind: greedy").unwrap();
        let config = PlanConfig::load(file.path()).unwrap();
        assert_eq!(config.bond, Bond::Flemish);
        assert_eq!(config.courses, 8);
        assert_eq!(config.envelope.width, 500.0);
        assert_eq!(config.envelope.height, 1300.0);
        assert_eq!(config.solver.kind, SolverKind::Greedy);
        assert_eq!(config.solver.restarts, 8);
        assert_eq!(config.time_limit_ms, 10_000);
        assert_eq!(config.wall_width(), 5.75);
    }

    #[test]
    fn command_line_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "courses: 3\nwidth: 4.5\ntime_limit_ms: 250").unwrap();
        let args = WallArgs {
            config: Some(file.path().to_path_buf()),
            courses: Some(5),
            stride_width: Some(440.0),
            seed: Some(11),
            ..args()
        };
        let config = PlanConfig::resolve(&args).unwrap();
        assert_eq!(config.courses, 5);
        assert_eq!(config.width, Some(4.5));
        assert_eq!(config.envelope.width, 440.0);
        assert_eq!(config.time_limit(), Duration::from_millis(250));
        assert_eq!(config.solver.seed, 11);
    }

    #[test]
    fn switching_bond_drops_the_file_width() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bond: stretcher\nwidth: 4.5").unwrap();
        let args = WallArgs {
            config: Some(file.path().to_path_buf()),
            bond: Some(Bond::Cross),
            ..args()
        };
        let config = PlanConfig::resolve(&args).unwrap();
        assert_eq!(config.wall_width(), 3.5);
        assert_eq!(config.layout().unwrap().course_count(), 8);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "courses: many").unwrap();
        let err = PlanConfig::load(file.path()).unwrap_err();
        let err = err.downcast::<WallError>().unwrap();
        assert_eq!(err.code(), "invalid-config");
    }
}
