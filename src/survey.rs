use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_structure::*;

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::survey::config_reader::read_global_config;
use crate::survey::io_common::{ensure_file, path_display, survey_id};
use crate::survey::io_csv::{load_answers, read_questions};
use crate::survey::io_text::{load_message, MessageKind};
use crate::survey::io_tsv::TsvWriter;
use crate::survey::registry::SurveyRegistry;

mod config_reader;
mod io_common;
mod io_csv;
mod io_text;
mod io_tsv;
mod registry;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("No configuration for survey {survey:?}. Known surveys: [{known}]"))]
    ConfigNotFound { survey: String, known: String },
    #[snafu(display("Error reading configuration file {path}: {source}"))]
    ConfigRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file {path}: {source}"))]
    ConfigParse {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("File not found: {path}"))]
    FileNotFound { path: String },
    #[snafu(display("Cannot use {path} as a survey folder"))]
    InvalidFolder { path: String },
    #[snafu(display("Error reading {path}: {source}"))]
    Reading {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing csv file {path}: {source}"))]
    CsvRead { source: csv::Error, path: String },
    #[snafu(display("{path}: missing column {column:?}"))]
    MissingColumn { path: String, column: String },
    #[snafu(display("{path}: {source}"))]
    MalformedRow {
        source: StructureError,
        path: String,
    },
    #[snafu(display("Error writing {path}: {source}"))]
    Writing { source: csv::Error, path: String },
    #[snafu(display("Error flushing {path}: {source}"))]
    Flushing {
        source: std::io::Error,
        path: String,
    },
    #[snafu(context(false), display("{source}"))]
    Structure { source: StructureError },
    #[snafu(display("Output {path} differs from reference {reference}"))]
    ReferenceMismatch { path: String, reference: String },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// Everything needed to convert one survey folder.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ConversionRequest {
    pub folder: PathBuf,
    pub config_dir: PathBuf,
    pub global_config: Option<PathBuf>,
    /// Defaults to `<folder>/<id>_to_import.txt`.
    pub out: Option<PathBuf>,
    pub reference: Option<PathBuf>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ConversionSummary {
    pub survey: String,
    pub output: PathBuf,
    pub header_rows: usize,
    pub description_rows: usize,
    pub stats: WalkStats,
    /// Without the line of column names.
    pub rows: usize,
}

pub fn output_path(folder: &Path, survey: &str) -> PathBuf {
    folder.join(format!("{}_to_import.txt", survey))
}

pub fn run_conversion(req: &ConversionRequest) -> SurveyResult<ConversionSummary> {
    let survey = survey_id(&req.folder)?;
    info!("Converting survey {:?} in {}", survey, path_display(&req.folder));

    let global = match &req.global_config {
        Some(p) => read_global_config(p)?,
        None => GlobalTemplate::limesurvey(),
    };
    let registry = SurveyRegistry::from_dir(&req.config_dir)?;
    let overrides = registry.resolve(&survey)?;
    debug!("overrides: {:?}", overrides);
    let templates = global.templates.with_overrides(&overrides.templates);

    let questions_path = req.folder.join(format!("{}.csv", survey));
    ensure_file(&questions_path)?;

    let output = req
        .out
        .clone()
        .unwrap_or_else(|| output_path(&req.folder, &survey));
    let mut writer = TsvWriter::create(&output, &global.schema)?;

    let header = build_header(&global, overrides)?;
    for r in header.iter() {
        writer.append(r)?;
    }
    info!("Wrote {} header rows", header.len());

    let welcome = load_message(&req.folder, MessageKind::Welcome, None)?;
    let end = load_message(&req.folder, MessageKind::End, None)?;
    let description = build_description(&global, overrides, &welcome, &end)?;
    for r in description.iter() {
        writer.append(r)?;
    }
    info!("Wrote {} description rows", description.len());

    let rows = read_questions(&questions_path)?;

    let mut walker = RowWalker::new(&templates);
    let mut sink = |r: Record| writer.append(&r);
    let mut answers = |name: &str| load_answers(&req.folder, name);
    walker.begin(&mut sink)?;
    for row_r in rows {
        let row = row_r?;
        walker
            .visit(&row, &mut answers, &mut sink)
            .map_err(|e| match e {
                SurveyError::Structure {
                    source: source @ StructureError::UnsupportedFormat { .. },
                } => SurveyError::MalformedRow {
                    source,
                    path: path_display(&questions_path),
                },
                e => e,
            })?;
    }
    let stats = walker.stats();
    info!(
        "Read {} questions from {}",
        stats.questions,
        path_display(&questions_path)
    );
    let total = writer.finish()?;

    let summary = ConversionSummary {
        survey,
        output,
        header_rows: header.len(),
        description_rows: description.len(),
        stats,
        rows: total,
    };
    info!(
        "Wrote {} rows to {} ({} groups, {} questions, {} answers)",
        summary.rows,
        path_display(&summary.output),
        stats.groups,
        stats.questions,
        stats.answers
    );

    if let Some(reference) = &req.reference {
        check_reference(&summary.output, reference)?;
    }
    Ok(summary)
}

/// Compares the output with a reference file, printing a diff on mismatch.
pub fn check_reference(output: &Path, reference: &Path) -> SurveyResult<()> {
    ensure_file(reference)?;
    let expected = fs::read_to_string(reference).context(ReadingSnafu {
        path: path_display(reference),
    })?;
    let actual = fs::read_to_string(output).context(ReadingSnafu {
        path: path_display(output),
    })?;
    if expected != actual {
        warn!("Found differences with the reference file");
        print_diff(expected.as_str(), actual.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: path_display(output),
            reference: path_display(reference),
        }
        .fail();
    }
    info!("Output matches reference {}", path_display(reference));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const QUESTIONS: &str = "section,code,question,answer_format,answer_file
1,Q1,Do you write code?,One Choice,yesno
1,Q2,Rank your languages,Ranking,languages
2,Q3,Do you test it?,one choice,yesno
";

    struct Fixture {
        _dir: TempDir,
        folder: PathBuf,
        config_dir: PathBuf,
    }

    impl Fixture {
        fn new(questions: &str) -> Fixture {
            let dir = tempfile::tempdir().unwrap();
            let folder = dir.path().join("rse");
            let config_dir = dir.path().join("config");
            fs::create_dir_all(folder.join("listAnswers")).unwrap();
            fs::create_dir_all(folder.join("texts")).unwrap();
            fs::create_dir_all(&config_dir).unwrap();
            fs::write(folder.join("rse.csv"), questions).unwrap();
            fs::write(
                folder.join("listAnswers").join("yesno.csv"),
                "\"Yes\";1\n\"No\";0\n\"Don't know\"\n",
            )
            .unwrap();
            fs::write(
                folder.join("listAnswers").join("languages.csv"),
                "\"Rust\"\n\"Python\"\n",
            )
            .unwrap();
            fs::write(
                folder.join("texts").join("welcome_message.md"),
                "# Welcome\n\nThanks for *taking* part.\n",
            )
            .unwrap();
            fs::write(folder.join("texts").join("end_message.md"), "Bye.\n").unwrap();
            fs::write(
                config_dir.join("rse.json"),
                r#"{
                    "headerToModify": [{"class": "S", "name": "sid", "text": "4242"}],
                    "headerToAdd": [{"record": {"class": "S", "name": "template", "text": "default"}, "position": 1}],
                    "descriptionToModify": [{"class": "SL", "name": "surveyls_title", "text": "RSE survey", "language": "en"}]
                }"#,
            )
            .unwrap();
            Fixture {
                _dir: dir,
                folder,
                config_dir,
            }
        }

        fn request(&self) -> ConversionRequest {
            ConversionRequest {
                folder: self.folder.clone(),
                config_dir: self.config_dir.clone(),
                global_config: None,
                out: None,
                reference: None,
            }
        }
    }

    fn read_output(path: &Path) -> Vec<Vec<String>> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(path)
            .unwrap();
        rdr.records()
            .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn converts_full_survey() {
        let fx = Fixture::new(QUESTIONS);
        let summary = run_conversion(&fx.request()).unwrap();
        assert_eq!(summary.survey, "rse");
        assert_eq!(summary.output, fx.folder.join("rse_to_import.txt"));

        let global = GlobalTemplate::limesurvey();
        let schema = global.schema.fields().to_vec();
        let lines = read_output(&summary.output);
        assert_eq!(lines[0], schema);
        assert!(lines.iter().all(|l| l.len() == schema.len()));
        assert_eq!(lines.len(), summary.rows + 1);

        let col = |name: &str| schema.iter().position(|f| f == name).unwrap();
        let (c_class, c_type, c_name, c_text) =
            (col("class"), col("type/scale"), col("name"), col("text"));

        // Header: the modified sid, then the inserted row.
        assert_eq!(lines[1][c_name], "sid");
        assert_eq!(lines[1][c_text], "4242");
        assert_eq!(lines[2][c_name], "template");
        assert_eq!(summary.header_rows, global.headers.len() + 1);

        let find = |name: &str| lines.iter().find(|l| l[c_name] == name).unwrap();
        assert_eq!(find("surveyls_title")[c_text], "RSE survey");
        assert!(find("surveyls_welcometext")[c_text].contains("<h1>Welcome</h1>"));
        assert!(find("surveyls_welcometext")[c_text].contains("<em>taking</em>"));
        assert_eq!(find("surveyls_endtext")[c_text], "<p>Bye.</p>\n");

        let body: Vec<(String, String, String)> = lines
            [1 + summary.header_rows + summary.description_rows..]
            .iter()
            .map(|l| {
                (
                    l[c_class].clone(),
                    l[c_type].clone(),
                    l[c_name].clone(),
                )
            })
            .collect();
        let kinds: Vec<&str> = body.iter().map(|(c, _, _)| c.as_str()).collect();
        let mut expected = vec!["G", "Q", "A", "A", "A", "Q"];
        expected.extend(std::iter::repeat("SQ").take(8));
        expected.extend(["A", "A", "G", "Q", "A", "A", "A"]);
        assert_eq!(kinds, expected);
        assert_eq!(body[0].1, "G0");
        assert_eq!(body[1].2, "Q1");
        assert_eq!(body[2].2, "1");
        assert_eq!(body[4].2, "3");
        assert_eq!(body[16].1, "G1");

        assert_eq!(
            summary.stats,
            WalkStats {
                groups: 2,
                questions: 3,
                subquestions: 8,
                answers: 8
            }
        );
    }

    #[test]
    fn unknown_survey_is_reported() {
        let fx = Fixture::new(QUESTIONS);
        fs::remove_file(fx.config_dir.join("rse.json")).unwrap();
        fs::write(fx.config_dir.join("other.json"), "{}").unwrap();
        let res = run_conversion(&fx.request());
        match res {
            Err(SurveyError::ConfigNotFound { survey, known }) => {
                assert_eq!(survey, "rse");
                assert_eq!(known, "other");
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn likert_row_aborts_and_keeps_partial_output() {
        let fx = Fixture::new(
            "section,code,question,answer_format,answer_file
1,Q1,Do you write code?,One Choice,yesno
1,Q2,How much?,Likert,yesno
",
        );
        let res = run_conversion(&fx.request());
        match res {
            Err(SurveyError::MalformedRow {
                source: StructureError::UnsupportedFormat { lineno, code, .. },
                ..
            }) => {
                assert_eq!(lineno, 3);
                assert_eq!(code, "Q2");
            }
            x => panic!("unexpected result {:?}", x),
        }
        let partial = fs::read_to_string(fx.folder.join("rse_to_import.txt")).unwrap();
        assert!(partial.contains("Do you write code?"));
    }

    #[test]
    fn bad_row_keeps_earlier_rows() {
        let fx = Fixture::new(
            "section,code,question,answer_format,answer_file
1,Q1,Do you write code?,One Choice,yesno
x,Q2,How much?,One Choice,yesno
",
        );
        match run_conversion(&fx.request()) {
            Err(SurveyError::MalformedRow {
                source: StructureError::MalformedRow { lineno, field, .. },
                ..
            }) => {
                assert_eq!(lineno, 3);
                assert_eq!(field, "section");
            }
            x => panic!("unexpected result {:?}", x),
        }
        let lines = read_output(&fx.folder.join("rse_to_import.txt"));
        let schema = Schema::limesurvey();
        let col = |name: &str| schema.fields().iter().position(|f| f == name).unwrap();
        assert!(lines.iter().any(|l| l[col("type/scale")] == "G0"));
        assert!(lines.iter().any(|l| l[col("name")] == "Q1"));
        assert_eq!(
            lines.iter().filter(|l| l[col("class")] == "A").count(),
            3
        );
        assert!(!lines.iter().any(|l| l[col("name")] == "Q2"));
    }

    #[test]
    fn missing_answer_file_is_reported() {
        let fx = Fixture::new(
            "section,code,question,answer_format,answer_file
1,Q1,Colour?,One Choice,colours
",
        );
        match run_conversion(&fx.request()) {
            Err(SurveyError::FileNotFound { path }) => {
                assert!(path.ends_with("colours.csv"), "{}", path);
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn missing_welcome_message_is_reported() {
        let fx = Fixture::new(QUESTIONS);
        fs::remove_file(fx.folder.join("texts").join("welcome_message.md")).unwrap();
        assert!(matches!(
            run_conversion(&fx.request()),
            Err(SurveyError::FileNotFound { .. })
        ));
    }

    #[test]
    fn reference_comparison() {
        let fx = Fixture::new(QUESTIONS);
        let first = run_conversion(&fx.request()).unwrap();
        let reference = fx.folder.join("reference.txt");
        fs::copy(&first.output, &reference).unwrap();

        let mut req = fx.request();
        req.out = Some(fx.folder.join("second.txt"));
        req.reference = Some(reference.clone());
        assert!(run_conversion(&req).is_ok());

        fs::write(&reference, "class\n").unwrap();
        assert!(matches!(
            run_conversion(&req),
            Err(SurveyError::ReferenceMismatch { .. })
        ));
    }

    #[test]
    fn insertion_out_of_range_fails() {
        let fx = Fixture::new(QUESTIONS);
        fs::write(
            fx.config_dir.join("rse.json"),
            r#"{"headerToAdd": [{"record": {"name": "late"}, "position": 400}]}"#,
        )
        .unwrap();
        assert!(matches!(
            run_conversion(&fx.request()),
            Err(SurveyError::Structure {
                source: StructureError::MergeIndex { position: 400, .. }
            })
        ));
    }
}
