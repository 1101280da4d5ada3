use std::path::Path;

use snafu::prelude::*;

use crate::survey::*;

pub fn path_display(path: &Path) -> String {
    path.display().to_string()
}

pub fn ensure_file(path: &Path) -> SurveyResult<()> {
    ensure!(
        path.is_file(),
        FileNotFoundSnafu {
            path: path_display(path)
        }
    );
    Ok(())
}

/// The identifier of a survey is the name of its folder, as given.
///
/// A symlinked folder keeps the name of the link. Only a path without a
/// name, such as `.` or `..`, is resolved first.
pub fn survey_id(folder: &Path) -> SurveyResult<String> {
    ensure!(
        folder.is_dir(),
        FileNotFoundSnafu {
            path: path_display(folder)
        }
    );
    let name = match folder.file_name() {
        Some(name) => name.to_owned(),
        None => {
            let full = folder.canonicalize().context(ReadingSnafu {
                path: path_display(folder),
            })?;
            full.file_name()
                .map(|s| s.to_owned())
                .context(InvalidFolderSnafu {
                    path: path_display(folder),
                })?
        }
    };
    name.to_str()
        .map(|s| s.to_string())
        .context(InvalidFolderSnafu {
            path: path_display(folder),
        })
}
