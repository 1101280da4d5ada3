use log::debug;

use crate::error::StructureError;
use crate::record::Record;
use crate::templates::{AnswerFormat, QuestionTemplates};

/// The only language generated for now.
pub const LANGUAGE: &str = "en";

/// The number of rank sub-questions of a ranking question, whatever the
/// number of answers.
pub const RANK_POSITIONS: usize = 8;

/// One line of the question file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct QuestionRow {
    pub lineno: usize,
    /// Starts at 1.
    pub section: usize,
    pub code: String,
    pub question: String,
    pub answer_format: AnswerFormat,
    pub answer_file: String,
}

impl QuestionRow {
    /// Builds a row from the raw cells of the question file.
    pub fn parse(
        lineno: usize,
        section: &str,
        code: &str,
        question: &str,
        answer_format: &str,
        answer_file: &str,
    ) -> Result<QuestionRow, StructureError> {
        let malformed = |field: &str, value: &str| StructureError::MalformedRow {
            lineno,
            field: field.to_string(),
            value: value.to_string(),
        };
        let section_idx = match section.trim().parse::<usize>() {
            Ok(x) if x >= 1 => x,
            _ => return Err(malformed("section", section)),
        };
        let format = answer_format
            .parse::<AnswerFormat>()
            .map_err(|s| malformed("answer_format", &s))?;
        Ok(QuestionRow {
            lineno,
            section: section_idx,
            code: code.to_string(),
            question: question.to_string(),
            answer_format: format,
            answer_file: answer_file.to_string(),
        })
    }
}

/// The visible label of a line of an answer file.
///
/// Only the part before the first `;` is kept, without the surrounding
/// quotes.
pub fn answer_label(line: &str) -> &str {
    line.split(';').next().unwrap_or("").trim_matches('"')
}

/// Counts of the records emitted so far.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct WalkStats {
    pub groups: usize,
    pub questions: usize,
    pub subquestions: usize,
    pub answers: usize,
}

/// Turns question rows into groups, questions and answers.
///
/// The walker keeps the index of the current group. A new group record is
/// written every time the section of a row differs from the current one.
pub struct RowWalker<'a> {
    templates: &'a QuestionTemplates,
    section: usize,
    stats: WalkStats,
}

impl<'a> RowWalker<'a> {
    pub fn new(templates: &'a QuestionTemplates) -> RowWalker<'a> {
        RowWalker {
            templates,
            section: 0,
            stats: WalkStats::default(),
        }
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Writes the first group. It is always present, even if the question
    /// file starts at a later section.
    pub fn begin<E, S>(&mut self, sink: &mut S) -> Result<(), E>
    where
        E: From<StructureError>,
        S: FnMut(Record) -> Result<(), E>,
    {
        self.section = 0;
        self.emit_group(sink)
    }

    pub fn visit<E, A, S>(&mut self, row: &QuestionRow, answers: &mut A, sink: &mut S) -> Result<(), E>
    where
        E: From<StructureError>,
        A: FnMut(&str) -> Result<Vec<String>, E>,
        S: FnMut(Record) -> Result<(), E>,
    {
        debug!("visit: {:?}", row);
        let section = row
            .section
            .checked_sub(1)
            .ok_or_else(|| StructureError::MalformedRow {
                lineno: row.lineno,
                field: "section".to_string(),
                value: row.section.to_string(),
            })?;
        if section != self.section {
            self.section = section;
            self.emit_group(sink)?;
        }

        let templates = self.templates;
        let t = templates.for_format(row.answer_format, row.lineno, &row.code)?;
        let mut question = t
            .question
            .clone()
            .with("name", row.code.clone())
            .with("text", row.question.clone())
            .with("language", LANGUAGE);
        if row.answer_format == AnswerFormat::OneChoice {
            question.set("other", "Y");
        }
        sink(question)?;
        self.stats.questions += 1;

        if row.answer_format == AnswerFormat::Ranking {
            for i in 1..=RANK_POSITIONS {
                sink(rank_subquestion(i))?;
                self.stats.subquestions += 1;
            }
        }

        let lines = answers(&row.answer_file)?;
        for (idx, line) in lines.iter().enumerate() {
            let answer = t
                .answer
                .clone()
                .with("name", (idx + 1).to_string())
                .with("text", answer_label(line))
                .with("language", LANGUAGE);
            sink(answer)?;
            self.stats.answers += 1;
        }
        Ok(())
    }

    fn emit_group<E, S>(&mut self, sink: &mut S) -> Result<(), E>
    where
        E: From<StructureError>,
        S: FnMut(Record) -> Result<(), E>,
    {
        let group = self
            .templates
            .group
            .clone()
            .with("type/scale", format!("G{}", self.section))
            .with("language", LANGUAGE);
        debug!("emit_group: G{}", self.section);
        sink(group)?;
        self.stats.groups += 1;
        Ok(())
    }
}

fn rank_subquestion(i: usize) -> Record {
    Record::from_pairs(&[
        ("class", "SQ"),
        ("type/scale", "0"),
        ("relevance", "1"),
        ("language", LANGUAGE),
    ])
    .with("name", i.to_string())
    .with("text", format!("Rank {}", i))
}
