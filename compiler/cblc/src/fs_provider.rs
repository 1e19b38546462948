//! Copybooks read from directories on disk.

use std::fs;
use std::path::{Path, PathBuf};

use cbl_copybook::CopybookProvider;
use cbl_ir::{CopybookModel, CopybookName, DialectKind};
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

/// Extensions tried for every name, in order. The empty one means the bare
/// name.
pub const COPYBOOK_EXTENSIONS: [&str; 5] = ["cpy", "cbl", "cob", "copy", ""];

/// Looks copybooks up in search directories.
///
/// Dialect copybooks are searched in that dialect's directories first, then
/// in the shared ones. Within a directory the name is tried as written,
/// upper-cased and lower-cased, each with every extension in
/// [`COPYBOOK_EXTENSIONS`] (and its upper-case form).
#[derive(Clone, Debug, Default)]
pub struct FileSystemCopybooks {
    search_paths: Vec<PathBuf>,
    dialect_paths: FxHashMap<DialectKind, Vec<PathBuf>>,
}

impl FileSystemCopybooks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    #[must_use]
    pub fn with_dialect_path(mut self, dialect: DialectKind, path: impl Into<PathBuf>) -> Self {
        self.dialect_paths.entry(dialect).or_default().push(path.into());
        self
    }

    fn directories(&self, dialect: DialectKind) -> impl Iterator<Item = &PathBuf> {
        self.dialect_paths
            .get(&dialect)
            .into_iter()
            .flatten()
            .chain(&self.search_paths)
    }

    /// The first existing file for `name`, if any.
    pub fn locate(&self, name: &CopybookName) -> Option<PathBuf> {
        let written = name.display_name();
        let mut stems = vec![written.to_string()];
        for variant in [written.to_ascii_uppercase(), written.to_ascii_lowercase()] {
            if !stems.contains(&variant) {
                stems.push(variant);
            }
        }

        self.directories(name.dialect()).find_map(|dir| {
            stems.iter().find_map(|stem| {
                COPYBOOK_EXTENSIONS.iter().find_map(|ext| {
                    candidates(dir, stem, ext)
                        .into_iter()
                        .find(|path| path.is_file())
                })
            })
        })
    }
}

fn candidates(dir: &Path, stem: &str, ext: &str) -> Vec<PathBuf> {
    if ext.is_empty() {
        return vec![dir.join(stem)];
    }
    vec![
        dir.join(format!("{stem}.{ext}")),
        dir.join(format!("{stem}.{}", ext.to_ascii_uppercase())),
    ]
}

/// `file://` URI for a path.
pub fn file_uri(path: &Path) -> String {
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let text = absolute.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{text}")
    } else {
        format!("file:///{text}")
    }
}

impl CopybookProvider for FileSystemCopybooks {
    fn lookup(&self, name: &CopybookName) -> CopybookModel {
        let Some(path) = self.locate(name) else {
            trace!(copybook = %name, "no file found");
            return CopybookModel::missing(name.clone());
        };
        match fs::read_to_string(&path) {
            Ok(content) => CopybookModel::new(name.clone(), file_uri(&path), content),
            Err(err) => {
                warn!(copybook = %name, path = %path.display(), %err, "cannot read copybook");
                CopybookModel::missing(name.clone())
            }
        }
    }
}
