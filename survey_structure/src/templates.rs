use std::str::FromStr;

use crate::error::StructureError;
use crate::record::{Record, Schema};

/// The answer formats that can appear in the question file.
///
/// Only `OneChoice` and `Ranking` generate rows. The other formats are
/// recognized so that they can be reported as unsupported instead of being
/// silently dropped.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum AnswerFormat {
    OneChoice,
    Ranking,
    Likert,
    FreeNumeric,
    FreeText,
    MultipleChoice,
}

impl AnswerFormat {
    pub fn tag(&self) -> &'static str {
        match self {
            AnswerFormat::OneChoice => "one choice",
            AnswerFormat::Ranking => "ranking",
            AnswerFormat::Likert => "likert",
            AnswerFormat::FreeNumeric => "freenumeric",
            AnswerFormat::FreeText => "freetext",
            AnswerFormat::MultipleChoice => "multiple choice",
        }
    }
}

impl FromStr for AnswerFormat {
    type Err = String;

    /// Case insensitive.
    fn from_str(s: &str) -> Result<AnswerFormat, String> {
        match s.trim().to_lowercase().as_str() {
            "one choice" => Ok(AnswerFormat::OneChoice),
            "ranking" => Ok(AnswerFormat::Ranking),
            "likert" => Ok(AnswerFormat::Likert),
            "freenumeric" => Ok(AnswerFormat::FreeNumeric),
            "freetext" => Ok(AnswerFormat::FreeText),
            "multiple choice" => Ok(AnswerFormat::MultipleChoice),
            _ => Err(s.to_string()),
        }
    }
}

/// The default records for the question and its answers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FormatTemplates<'a> {
    pub question: &'a Record,
    pub answer: &'a Record,
}

/// Default records for everything generated from the question file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct QuestionTemplates {
    pub group: Record,
    pub one_choice_question: Record,
    pub one_choice_answer: Record,
    pub ranking_question: Record,
    pub ranking_answer: Record,
}

/// Per-survey replacements for the default records.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TemplateOverrides {
    pub group: Option<Record>,
    pub one_choice_question: Option<Record>,
    pub one_choice_answer: Option<Record>,
    pub ranking_question: Option<Record>,
    pub ranking_answer: Option<Record>,
}

impl QuestionTemplates {
    pub fn limesurvey() -> QuestionTemplates {
        QuestionTemplates {
            group: Record::from_pairs(&[("class", "G"), ("relevance", "1")]),
            // L: list (radio)
            one_choice_question: Record::from_pairs(&[
                ("class", "Q"),
                ("type/scale", "L"),
                ("relevance", "1"),
                ("mandatory", "Y"),
            ]),
            one_choice_answer: Record::from_pairs(&[("class", "A"), ("type/scale", "0")]),
            // R: ranking
            ranking_question: Record::from_pairs(&[
                ("class", "Q"),
                ("type/scale", "R"),
                ("relevance", "1"),
                ("mandatory", "N"),
            ]),
            ranking_answer: Record::from_pairs(&[("class", "A"), ("type/scale", "0")]),
        }
    }

    pub fn with_overrides(&self, overrides: &TemplateOverrides) -> QuestionTemplates {
        let pick = |o: &Option<Record>, d: &Record| o.clone().unwrap_or_else(|| d.clone());
        QuestionTemplates {
            group: pick(&overrides.group, &self.group),
            one_choice_question: pick(&overrides.one_choice_question, &self.one_choice_question),
            one_choice_answer: pick(&overrides.one_choice_answer, &self.one_choice_answer),
            ranking_question: pick(&overrides.ranking_question, &self.ranking_question),
            ranking_answer: pick(&overrides.ranking_answer, &self.ranking_answer),
        }
    }

    /// The templates to use for a question row.
    ///
    /// `lineno` and `code` only serve the error message.
    pub fn for_format(
        &self,
        format: AnswerFormat,
        lineno: usize,
        code: &str,
    ) -> Result<FormatTemplates<'_>, StructureError> {
        match format {
            AnswerFormat::OneChoice => Ok(FormatTemplates {
                question: &self.one_choice_question,
                answer: &self.one_choice_answer,
            }),
            AnswerFormat::Ranking => Ok(FormatTemplates {
                question: &self.ranking_question,
                answer: &self.ranking_answer,
            }),
            AnswerFormat::Likert
            | AnswerFormat::FreeNumeric
            | AnswerFormat::FreeText
            | AnswerFormat::MultipleChoice => Err(StructureError::UnsupportedFormat {
                lineno,
                code: code.to_string(),
                format: format.tag().to_string(),
            }),
        }
    }
}

/// The configuration shared by all the surveys.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GlobalTemplate {
    pub schema: Schema,
    /// Survey settings rows (class S).
    pub headers: Vec<Record>,
    /// Language settings rows (class SL).
    pub description: Vec<Record>,
    pub templates: QuestionTemplates,
}

fn settings(class: &str, rows: &[(&str, &str)], language: Option<&str>) -> Vec<Record> {
    rows.iter()
        .map(|&(name, text)| {
            let r = Record::from_pairs(&[("class", class), ("name", name), ("text", text)]);
            match language {
                Some(l) => r.with("language", l),
                None => r,
            }
        })
        .collect()
}

impl GlobalTemplate {
    pub fn limesurvey() -> GlobalTemplate {
        let headers = settings(
            "S",
            &[
                ("sid", ""),
                ("admin", "Administrator"),
                ("adminemail", ""),
                ("anonymized", "N"),
                ("format", "G"),
                ("language", "en"),
                ("datestamp", "Y"),
                ("ipaddr", "N"),
                ("refurl", "N"),
                ("showprogress", "Y"),
                ("allowprev", "Y"),
                ("questionindex", "0"),
                ("nokeyboard", "N"),
                ("showxquestions", "Y"),
                ("shownoanswer", "N"),
                ("showwelcome", "Y"),
                ("autoredirect", "N"),
            ],
            None,
        );
        let description = settings(
            "SL",
            &[
                ("surveyls_title", ""),
                ("surveyls_description", ""),
                ("surveyls_welcometext", ""),
                ("surveyls_endtext", ""),
                ("surveyls_url", ""),
                ("surveyls_urldescription", ""),
                ("surveyls_dateformat", "9"),
                ("surveyls_numberformat", "0"),
            ],
            Some("en"),
        );
        GlobalTemplate {
            schema: Schema::limesurvey(),
            headers,
            description,
            templates: QuestionTemplates::limesurvey(),
        }
    }
}
