use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use pulldown_cmark::{html, Parser};
use snafu::prelude::*;

use crate::survey::io_common::{ensure_file, path_display};
use crate::survey::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MessageKind {
    Welcome,
    End,
}

impl MessageKind {
    fn prefix(&self) -> &'static str {
        match self {
            MessageKind::Welcome => "welcome",
            MessageKind::End => "end",
        }
    }
}

/// `texts/<kind>_message[_<locale>].md` inside the survey folder.
pub fn message_path(folder: &Path, kind: MessageKind, locale: Option<&str>) -> PathBuf {
    let filename = match locale {
        Some(l) => format!("{}_message_{}.md", kind.prefix(), l),
        None => format!("{}_message.md", kind.prefix()),
    };
    folder.join("texts").join(filename)
}

pub fn markdown_to_html(source: &str) -> String {
    let mut res = String::new();
    html::push_html(&mut res, Parser::new(source));
    res
}

/// Reads a message and renders it to HTML.
pub fn load_message(folder: &Path, kind: MessageKind, locale: Option<&str>) -> SurveyResult<String> {
    let path = message_path(folder, kind, locale);
    ensure_file(&path)?;
    let source = fs::read_to_string(&path).context(ReadingSnafu {
        path: path_display(&path),
    })?;
    debug!("load_message: {}: {} bytes", path_display(&path), source.len());
    Ok(markdown_to_html(&source))
}
