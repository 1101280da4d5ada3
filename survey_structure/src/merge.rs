use log::{debug, warn};

use crate::error::StructureError;
use crate::record::Record;
use crate::templates::{GlobalTemplate, TemplateOverrides};

pub const WELCOME_TEXT: &str = "surveyls_welcometext";
pub const END_TEXT: &str = "surveyls_endtext";

/// A record to insert at a given position.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Insertion {
    pub record: Record,
    pub position: usize,
}

/// What a single survey changes from the global template.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SurveyOverrides {
    pub header_to_modify: Vec<Record>,
    pub header_to_add: Vec<Insertion>,
    pub description_to_modify: Vec<Record>,
    pub description_to_add: Vec<Insertion>,
    pub templates: TemplateOverrides,
}

/// Layers the overrides on top of a list of default records.
///
/// Each record of `base` is swapped for the first record of `replacements`
/// with the same name. The insertions are then applied in order, so that a
/// position refers to the list as grown by the previous insertions.
pub fn merge(
    base: &[Record],
    replacements: &[Record],
    insertions: &[Insertion],
) -> Result<Vec<Record>, StructureError> {
    let mut res: Vec<Record> = base
        .iter()
        .map(|r| {
            replacements
                .iter()
                .find(|rep| rep.name() == r.name())
                .unwrap_or(r)
                .clone()
        })
        .collect();
    for ins in insertions {
        if ins.position > res.len() {
            return Err(StructureError::MergeIndex {
                position: ins.position,
                len: res.len(),
            });
        }
        res.insert(ins.position, ins.record.clone());
    }
    Ok(res)
}

pub fn build_header(
    global: &GlobalTemplate,
    overrides: &SurveyOverrides,
) -> Result<Vec<Record>, StructureError> {
    merge(
        &global.headers,
        &overrides.header_to_modify,
        &overrides.header_to_add,
    )
}

/// The language settings rows, with the welcome and end messages filled in.
pub fn build_description(
    global: &GlobalTemplate,
    overrides: &SurveyOverrides,
    welcome_html: &str,
    end_html: &str,
) -> Result<Vec<Record>, StructureError> {
    let mut res = merge(
        &global.description,
        &overrides.description_to_modify,
        &overrides.description_to_add,
    )?;
    set_first_text(&mut res, WELCOME_TEXT, welcome_html);
    set_first_text(&mut res, END_TEXT, end_html);
    Ok(res)
}

// Only the first record with that name receives the text.
fn set_first_text(records: &mut [Record], name: &str, text: &str) {
    match records.iter_mut().find(|r| r.name() == name) {
        Some(r) => {
            debug!("set_first_text: filling {}", name);
            r.set("text", text);
        }
        None => {
            warn!("No {} record in the description, the message is dropped", name);
        }
    }
}
