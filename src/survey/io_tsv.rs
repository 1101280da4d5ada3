// Writer for the tab separated structure file.

use std::fs::File;
use std::path::Path;

use log::debug;
use snafu::prelude::*;

use crate::survey::io_common::path_display;
use crate::survey::*;

pub struct TsvWriter {
    writer: csv::Writer<File>,
    schema: Schema,
    path: String,
    rows: usize,
}

impl TsvWriter {
    /// Truncates the file and writes the line of column names.
    pub fn create(path: &Path, schema: &Schema) -> SurveyResult<TsvWriter> {
        let p = path_display(path);
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote(b'"')
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(path)
            .context(WritingSnafu { path: p.clone() })?;
        let mut res = TsvWriter {
            writer,
            schema: schema.clone(),
            path: p,
            rows: 0,
        };
        res.writer
            .write_record(res.schema.fields())
            .context(WritingSnafu {
                path: res.path.clone(),
            })?;
        res.flush()?;
        Ok(res)
    }

    /// Writes one record, in the order of the schema.
    ///
    /// Each record is flushed, so that the file is complete up to the last
    /// record if a later row fails.
    pub fn append(&mut self, record: &Record) -> SurveyResult<()> {
        let values = self.schema.values(record)?;
        debug!("append: {:?}", values);
        self.writer.write_record(&values).context(WritingSnafu {
            path: self.path.clone(),
        })?;
        self.rows += 1;
        self.flush()
    }

    /// Returns the number of records written, not counting the column names.
    pub fn finish(mut self) -> SurveyResult<usize> {
        self.flush()?;
        Ok(self.rows)
    }

    fn flush(&mut self) -> SurveyResult<()> {
        self.writer.flush().context(FlushingSnafu {
            path: self.path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("out.txt");
        let schema = Schema::new(&["class".to_string(), "name".to_string(), "text".to_string()]);
        let mut w = TsvWriter::create(&p, &schema).unwrap();
        w.append(&Record::from_pairs(&[("name", "Q1"), ("class", "Q")]))
            .unwrap();
        w.append(&Record::from_pairs(&[("text", "a \"quoted\"\tvalue")]))
            .unwrap();
        assert_eq!(w.finish().unwrap(), 2);
        let contents = fs::read_to_string(&p).unwrap();
        assert_eq!(
            contents,
            "class\tname\ttext\nQ\tQ1\t\n\t\t\"a \"\"quoted\"\"\tvalue\"\n"
        );
    }

    #[test]
    fn multiline_text_is_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("out.txt");
        let schema = Schema::new(&["name".to_string(), "text".to_string()]);
        let mut w = TsvWriter::create(&p, &schema).unwrap();
        w.append(&Record::from_pairs(&[("name", "x"), ("text", "<p>a</p>\n")]))
            .unwrap();
        w.finish().unwrap();
        let contents = fs::read_to_string(&p).unwrap();
        assert_eq!(contents, "name\ttext\nx\t\"<p>a</p>\n\"\n");
    }

    #[test]
    fn unknown_field_fails() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("out.txt");
        let mut w = TsvWriter::create(&p, &Schema::limesurvey()).unwrap();
        let res = w.append(&Record::from_pairs(&[("name", "Q1"), ("colour", "red")]));
        assert!(matches!(
            res,
            Err(SurveyError::Structure {
                source: StructureError::SchemaMismatch { .. }
            })
        ));
        assert_eq!(w.finish().unwrap(), 0);
    }

    #[test]
    fn create_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("out.txt");
        fs::write(&p, "stale content\nfrom a previous run\n").unwrap();
        let schema = Schema::new(&["name".to_string()]);
        TsvWriter::create(&p, &schema).unwrap().finish().unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "name\n");
    }
}
