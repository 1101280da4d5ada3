// Primitives for reading the question file and the answer lists.

use std::fs::{self, File};
use std::path::Path;

use log::debug;
use snafu::prelude::*;

use crate::survey::io_common::{ensure_file, path_display};
use crate::survey::*;

const QUESTION_COLUMNS: [&str; 5] = ["section", "code", "question", "answer_format", "answer_file"];

/// The rows of the question file, parsed one at a time.
pub struct QuestionReader {
    records: csv::StringRecordsIntoIter<File>,
    /// Position of each of `QUESTION_COLUMNS` in the header.
    idxs: Vec<usize>,
    path: String,
    count: usize,
}

/// Opens the question file and checks its line of column names.
///
/// The line numbers start at 1 with the line of column names. Rows may have
/// more or fewer cells than the header, as long as the required ones are
/// there.
pub fn read_questions(path: &Path) -> SurveyResult<QuestionReader> {
    ensure_file(path)?;
    let p = path_display(path);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .context(CsvReadSnafu { path: p.clone() })?;

    let headers = rdr
        .headers()
        .context(CsvReadSnafu { path: p.clone() })?
        .clone();
    let mut idxs: Vec<usize> = Vec::new();
    for column in QUESTION_COLUMNS {
        let idx = headers
            .iter()
            .position(|h| h == column)
            .context(MissingColumnSnafu {
                path: p.clone(),
                column,
            })?;
        idxs.push(idx);
    }
    debug!("read_questions: header: {:?} columns: {:?}", headers, idxs);

    Ok(QuestionReader {
        records: rdr.into_records(),
        idxs,
        path: p,
        count: 0,
    })
}

impl QuestionReader {
    fn parse_line(&self, line_r: csv::Result<csv::StringRecord>) -> SurveyResult<QuestionRow> {
        let line = line_r.context(CsvReadSnafu {
            path: self.path.clone(),
        })?;
        let lineno = line
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(self.count + 2);
        let mut cells: Vec<&str> = Vec::with_capacity(QUESTION_COLUMNS.len());
        for (column, &idx) in QUESTION_COLUMNS.iter().zip(self.idxs.iter()) {
            let cell = line
                .get(idx)
                .ok_or_else(|| StructureError::MalformedRow {
                    lineno,
                    field: column.to_string(),
                    value: String::new(),
                })
                .context(MalformedRowSnafu {
                    path: self.path.clone(),
                })?;
            cells.push(cell);
        }
        let row = QuestionRow::parse(lineno, cells[0], cells[1], cells[2], cells[3], cells[4])
            .context(MalformedRowSnafu {
                path: self.path.clone(),
            })?;
        debug!("read_questions: {:?}", row);
        Ok(row)
    }
}

impl Iterator for QuestionReader {
    type Item = SurveyResult<QuestionRow>;

    fn next(&mut self) -> Option<SurveyResult<QuestionRow>> {
        let line_r = self.records.next()?;
        let res = self.parse_line(line_r);
        self.count += 1;
        Some(res)
    }
}

/// The lines of `listAnswers/<name>.csv`, without their terminators.
pub fn load_answers(folder: &Path, name: &str) -> SurveyResult<Vec<String>> {
    let path = folder.join("listAnswers").join(format!("{}.csv", name));
    ensure_file(&path)?;
    let contents = fs::read_to_string(&path).context(ReadingSnafu {
        path: path_display(&path),
    })?;
    let lines: Vec<String> = contents.lines().map(|s| s.to_string()).collect();
    debug!("load_answers: {}: {} lines", name, lines.len());
    Ok(lines)
}
