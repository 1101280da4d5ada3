use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use snafu::prelude::*;

use crate::survey::config_reader::read_survey_config;
use crate::survey::io_common::path_display;
use crate::survey::*;

/// The survey configurations known to the program, by survey identifier.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SurveyRegistry {
    surveys: BTreeMap<String, SurveyOverrides>,
}

impl SurveyRegistry {
    pub fn new() -> SurveyRegistry {
        SurveyRegistry::default()
    }

    pub fn register(&mut self, survey: &str, overrides: SurveyOverrides) {
        if self.surveys.insert(survey.to_string(), overrides).is_some() {
            warn!("Configuration for survey {:?} registered twice", survey);
        }
    }

    /// Loads every `<survey>.json` file of a directory.
    ///
    /// A missing directory gives an empty registry.
    pub fn from_dir(dir: &Path) -> SurveyResult<SurveyRegistry> {
        let mut res = SurveyRegistry::new();
        if !dir.is_dir() {
            warn!("Configuration directory {} not found", path_display(dir));
            return Ok(res);
        }
        let entries = fs::read_dir(dir).context(ConfigReadSnafu {
            path: path_display(dir),
        })?;
        for entry_r in entries {
            let entry = entry_r.context(ConfigReadSnafu {
                path: path_display(dir),
            })?;
            let path = entry.path();
            let is_json = path.extension().map(|e| e == "json").unwrap_or(false);
            let stem = path.file_stem().and_then(|s| s.to_str());
            match stem {
                Some(survey) if is_json && path.is_file() => {
                    debug!("from_dir: loading {}", path_display(&path));
                    let overrides = read_survey_config(&path)?;
                    res.register(survey, overrides);
                }
                _ => debug!("from_dir: skipping {}", path_display(&path)),
            }
        }
        info!(
            "Loaded {} survey configurations from {}",
            res.surveys.len(),
            path_display(dir)
        );
        Ok(res)
    }

    pub fn known(&self) -> Vec<&str> {
        self.surveys.keys().map(|s| s.as_str()).collect()
    }

    pub fn resolve(&self, survey: &str) -> SurveyResult<&SurveyOverrides> {
        self.surveys.get(survey).context(ConfigNotFoundSnafu {
            survey,
            known: self.known().join(", "),
        })
    }
}
