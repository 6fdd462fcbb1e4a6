//! Loading and validating gameplay tuning.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_hunt_core::Tuning;

/// Command-line values that replace fields of the loaded tuning.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Overrides {
    /// Side length of the playable area.
    pub area_size: Option<f32>,
    /// Enemies requested per round.
    pub enemy_count: Option<u32>,
}

impl Overrides {
    /// Writes every present override into `tuning`.
    pub fn apply(&self, tuning: &mut Tuning) {
        if let Some(area_size) = self.area_size {
            tuning.area_size = area_size;
        }
        if let Some(enemy_count) = self.enemy_count {
            tuning.enemy_count = enemy_count;
        }
    }
}

/// Parses a TOML tuning document. Missing fields keep their defaults.
pub fn parse_tuning(contents: &str) -> Result<Tuning> {
    toml::from_str(contents).context("failed to parse tuning toml contents")
}

/// Reads tuning from `path`, or uses the defaults, then applies overrides and validates.
pub fn load_tuning(path: Option<&Path>, overrides: Overrides) -> Result<Tuning> {
    let mut tuning = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read tuning file {}", path.display()))?;
            parse_tuning(&contents)
                .with_context(|| format!("invalid tuning file {}", path.display()))?
        }
        None => Tuning::default(),
    };

    overrides.apply(&mut tuning);
    tuning.validate().context("tuning rejected")?;
    Ok(tuning)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_keep_defaults() {
        let tuning = parse_tuning("enemy_count = 4\nplayer_speed = 9.5\n").expect("parse");

        assert_eq!(tuning.enemy_count, 4);
        assert_eq!(tuning.player_speed, 9.5);
        assert_eq!(tuning.area_size, Tuning::default().area_size);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(parse_tuning("enemy_count = \"many\"").is_err());
    }

    #[test]
    fn overrides_are_validated() {
        let overrides = Overrides {
            area_size: Some(2.0),
            enemy_count: None,
        };
        let error = load_tuning(None, overrides).expect_err("area too small");
        assert!(format!("{error:#}").contains("smaller than one cell"));

        let overrides = Overrides {
            area_size: Some(60.0),
            enemy_count: Some(3),
        };
        let tuning = load_tuning(None, overrides).expect("valid");
        assert_eq!(tuning.area_size, 60.0);
        assert_eq!(tuning.enemy_count, 3);

        let overrides = Overrides {
            area_size: None,
            enemy_count: Some(u32::MAX),
        };
        let error = load_tuning(None, overrides).expect_err("too many enemies");
        assert!(format!("{error:#}").contains("exceeds the maximum"));
    }

    #[test]
    fn missing_files_report_the_path() {
        let error = load_tuning(Some(Path::new("/nonexistent/tuning.toml")), Overrides::default())
            .expect_err("missing file");
        assert!(error.to_string().contains("/nonexistent/tuning.toml"));
    }
}
