/*!

Row generation for the LimeSurvey tab separated survey structure format.

A survey structure file is a flat list of rows: survey settings (class `S`),
language settings (class `SL`), then for each section a group (`G`) followed
by its questions (`Q`), sub-questions (`SQ`) and answers (`A`).

This crate only builds the rows. Reading the survey folder and writing the
file is done by the `surveytsv` program.

```
use survey_structure::*;

let global = GlobalTemplate::limesurvey();
let overrides = SurveyOverrides::default();
let header = build_header(&global, &overrides)?;
assert_eq!(header.len(), global.headers.len());

let mut rows: Vec<Record> = Vec::new();
let mut walker = RowWalker::new(&global.templates);
let mut sink = |r: Record| -> Result<(), StructureError> {
    rows.push(r);
    Ok(())
};
let mut answers = |_: &str| -> Result<Vec<String>, StructureError> {
    Ok(vec!["\"Yes\"".to_string(), "\"No\"".to_string()])
};
walker.begin(&mut sink)?;
let q = QuestionRow::parse(2, "1", "Q1", "Are you happy?", "One Choice", "yesno")?;
walker.visit(&q, &mut answers, &mut sink)?;
assert_eq!(rows.len(), 4);
# Ok::<(), StructureError>(())
```
*/

mod error;
mod merge;
mod record;
mod templates;
mod walker;

pub use crate::error::*;
pub use crate::merge::*;
pub use crate::record::*;
pub use crate::templates::*;
pub use crate::walker::*;
