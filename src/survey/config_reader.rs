use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::survey::io_common::path_display;
use crate::survey::*;

pub type JsRecord = BTreeMap<String, String>;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct JsInsertion {
    pub record: JsRecord,
    pub position: usize,
}

/// The default records, as they appear in the configuration files.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsTemplates {
    #[serde(rename = "groupFormat")]
    pub group_format: Option<JsRecord>,
    #[serde(rename = "oneChoiceQuestion")]
    pub one_choice_question: Option<JsRecord>,
    #[serde(rename = "oneChoiceAnswer")]
    pub one_choice_answer: Option<JsRecord>,
    #[serde(rename = "rankingQuestion")]
    pub ranking_question: Option<JsRecord>,
    #[serde(rename = "rankingAnswer")]
    pub ranking_answer: Option<JsRecord>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "headerToModify", default)]
    pub header_to_modify: Vec<JsRecord>,
    #[serde(rename = "headerToAdd", default)]
    pub header_to_add: Vec<JsInsertion>,
    #[serde(rename = "descriptionToModify", default)]
    pub description_to_modify: Vec<JsRecord>,
    #[serde(rename = "descriptionToAdd", default)]
    pub description_to_add: Vec<JsInsertion>,
    #[serde(flatten)]
    pub templates: JsTemplates,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(rename = "mainHeaders")]
    pub main_headers: Vec<String>,
    #[serde(rename = "globalHeaders")]
    pub global_headers: Vec<JsRecord>,
    #[serde(rename = "globalDescription")]
    pub global_description: Vec<JsRecord>,
    #[serde(flatten)]
    pub templates: JsTemplates,
}

fn to_record(js: &JsRecord) -> Record {
    Record::from(js.clone())
}

fn to_records(js: &[JsRecord]) -> Vec<Record> {
    js.iter().map(to_record).collect()
}

fn to_insertions(js: &[JsInsertion]) -> Vec<Insertion> {
    js.iter()
        .map(|i| Insertion {
            record: to_record(&i.record),
            position: i.position,
        })
        .collect()
}

impl JsTemplates {
    pub fn overrides(&self) -> TemplateOverrides {
        TemplateOverrides {
            group: self.group_format.as_ref().map(to_record),
            one_choice_question: self.one_choice_question.as_ref().map(to_record),
            one_choice_answer: self.one_choice_answer.as_ref().map(to_record),
            ranking_question: self.ranking_question.as_ref().map(to_record),
            ranking_answer: self.ranking_answer.as_ref().map(to_record),
        }
    }
}

impl SurveyConfig {
    pub fn overrides(&self) -> SurveyOverrides {
        SurveyOverrides {
            header_to_modify: to_records(&self.header_to_modify),
            header_to_add: to_insertions(&self.header_to_add),
            description_to_modify: to_records(&self.description_to_modify),
            description_to_add: to_insertions(&self.description_to_add),
            templates: self.templates.overrides(),
        }
    }
}

impl GlobalConfig {
    /// Missing default records fall back to the built-in ones.
    pub fn template(&self) -> GlobalTemplate {
        GlobalTemplate {
            schema: Schema::new(&self.main_headers),
            headers: to_records(&self.global_headers),
            description: to_records(&self.global_description),
            templates: QuestionTemplates::limesurvey().with_overrides(&self.templates.overrides()),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> SurveyResult<T> {
    let p = path_display(path);
    let contents = fs::read_to_string(path).context(ConfigReadSnafu { path: p.clone() })?;
    serde_json::from_str(contents.as_str()).context(ConfigParseSnafu { path: p })
}

pub fn read_survey_config(path: &Path) -> SurveyResult<SurveyOverrides> {
    let config: SurveyConfig = read_json(path)?;
    debug!("read_survey_config: {}: {:?}", path_display(path), config);
    Ok(config.overrides())
}

pub fn read_global_config(path: &Path) -> SurveyResult<GlobalTemplate> {
    let config: GlobalConfig = read_json(path)?;
    debug!("read_global_config: {}: {:?}", path_display(path), config);
    Ok(config.template())
}
