// ********* Rows of the structure file ***********

use std::collections::BTreeMap;

use crate::error::StructureError;

/// The field used to match records between a template and its overrides.
pub const NAME_FIELD: &str = "name";

/// One row of the structure file.
///
/// Only the fields that are set are stored. When written out, the missing
/// fields of the schema are empty strings.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Record {
    values: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Record {
        Record {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Record {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(|s| s.as_str())
    }

    /// The identity of the record for merging. Empty if unset.
    pub fn name(&self) -> &str {
        self.get(NAME_FIELD).unwrap_or("")
    }

    /// A copy of this record with all the fields of `other` written on top.
    pub fn merged_with(&self, other: &Record) -> Record {
        let mut res = self.clone();
        for (k, v) in other.values.iter() {
            res.values.insert(k.clone(), v.clone());
        }
        res
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for Record {
    fn from(values: BTreeMap<String, String>) -> Record {
        Record { values }
    }
}

/// The ordered columns of the structure file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    pub fn new(fields: &[String]) -> Schema {
        Schema {
            fields: fields.to_vec(),
        }
    }

    /// The main headers of the LimeSurvey tab separated format.
    ///
    /// https://manual.limesurvey.org/Tab_Separated_Value_survey_structure
    pub fn limesurvey() -> Schema {
        let fields: Vec<String> = [
            "id",
            "related_id",
            "class",
            "type/scale",
            "name",
            "relevance",
            "text",
            "help",
            "language",
            "validation",
            "mandatory",
            "other",
            "default",
            "same_default",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        Schema { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// The values of a record, in the order of the schema.
    ///
    /// Fails if the record has a field that the schema does not know about:
    /// it would otherwise be silently dropped from the output.
    pub fn values<'a>(&'a self, record: &'a Record) -> Result<Vec<&'a str>, StructureError> {
        if let Some((field, _)) = record.fields().find(|(k, _)| !self.contains(k)) {
            return Err(StructureError::SchemaMismatch {
                field: field.to_string(),
                record: record.name().to_string(),
            });
        }
        Ok(self
            .fields
            .iter()
            .map(|f| record.get(f).unwrap_or(""))
            .collect())
    }
}
