//! Command handlers for the `cblc` CLI.
//!
//! Option parsing and the work behind each command live here so they can
//! be tested; `main.rs` only dispatches and prints.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cbl_copybook::CachingCopybookProvider;
use cbl_diagnostic::SyntaxError;
use cbl_ir::{DialectKind, Locality, LocalityMapper, SourceText};

use crate::analysis::{AnalysisFragment, Analyzer};
use crate::config::{ConfigError, Settings};
use crate::fs_provider::{file_uri, FileSystemCopybooks};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid offset `{0}`")]
    InvalidOffset(String),
}

/// Options shared by every command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOptions {
    pub file: PathBuf,
    pub copybook_dirs: Vec<PathBuf>,
    /// `(dialect name, directory)`, searched before `copybook_dirs` for
    /// that dialect's copybooks.
    pub dialect_dirs: Vec<(String, PathBuf)>,
    pub settings: Settings,
    /// Positional arguments after the file.
    pub rest: Vec<String>,
}

/// Parse `<file> [args...] [--copybooks=<dir>]... [--dialect-copybooks=<dialect>:<dir>]...
/// [--dialect=<name>]... [--mode=<mode>]`.
pub fn parse_options(args: &[String]) -> Result<CommandOptions, CommandError> {
    let mut options = CommandOptions::default();
    let mut file = None;
    for arg in args {
        if let Some(dir) = arg.strip_prefix("--copybooks=") {
            options.copybook_dirs.push(PathBuf::from(dir));
        } else if let Some(spec) = arg.strip_prefix("--dialect-copybooks=") {
            let Some((dialect, dir)) = spec.split_once(':') else {
                return Err(CommandError::Usage(format!("expected `<dialect>:<dir>` in `{arg}`")));
            };
            options.dialect_dirs.push((dialect.to_string(), PathBuf::from(dir)));
        } else if let Some(dialects) = arg.strip_prefix("--dialect=") {
            options
                .settings
                .dialects
                .extend(dialects.split(',').filter(|d| !d.is_empty()).map(str::to_string));
        } else if let Some(mode) = arg.strip_prefix("--mode=") {
            options.settings.copybook_mode = Some(mode.to_string());
        } else if arg.starts_with("--") {
            return Err(CommandError::Usage(format!("unknown option `{arg}`")));
        } else if file.is_none() {
            file = Some(PathBuf::from(arg));
        } else {
            options.rest.push(arg.clone());
        }
    }
    let Some(file) = file else {
        return Err(CommandError::Usage("missing file path".to_string()));
    };
    options.file = file;
    Ok(options)
}

/// Read the file and analyze it with the copybook directories from
/// `options` (the file's own directory is searched last).
pub fn analyze_file(options: &CommandOptions) -> Result<AnalysisFragment, CommandError> {
    let files = [options.file.clone()];
    let analyzer = analyzer_for(options, &files)?;
    let source = read_source(&options.file)?;
    Ok(analyzer.analyze(&source))
}

/// Analyze `options.file` and every positional argument as independent
/// programs. Each program's directory is searched after the configured
/// ones. Results are in argument order.
pub fn analyze_files(options: &CommandOptions) -> Result<Vec<AnalysisFragment>, CommandError> {
    let files: Vec<PathBuf> = std::iter::once(options.file.clone())
        .chain(options.rest.iter().map(PathBuf::from))
        .collect();
    let analyzer = analyzer_for(options, &files)?;
    let sources = files.iter().map(|file| read_source(file)).collect::<Result<Vec<_>, _>>()?;
    Ok(analyzer.analyze_many(&sources))
}

fn analyzer_for(options: &CommandOptions, files: &[PathBuf]) -> Result<Analyzer, CommandError> {
    let mut copybooks = FileSystemCopybooks::new();
    for (dialect, dir) in &options.dialect_dirs {
        let dialect: DialectKind = dialect.parse().map_err(ConfigError::from)?;
        copybooks = copybooks.with_dialect_path(dialect, dir);
    }
    for dir in &options.copybook_dirs {
        copybooks = copybooks.with_search_path(dir);
    }
    let mut program_dirs: Vec<&Path> = Vec::new();
    for file in files {
        let parent = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !program_dirs.contains(&parent) {
            program_dirs.push(parent);
        }
    }
    for dir in program_dirs {
        copybooks = copybooks.with_search_path(dir);
    }

    let analyzer = Analyzer::new(Arc::new(CachingCopybookProvider::new(copybooks)));
    analyzer.config().update_from_settings(&options.settings)?;
    Ok(analyzer)
}

fn read_source(file: &Path) -> Result<SourceText, CommandError> {
    let content = std::fs::read_to_string(file).map_err(|source| CommandError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    Ok(SourceText::new(file_uri(file), content))
}

/// `uri:line:column`
pub fn format_locality(locality: &Locality) -> String {
    format!("{}:{}:{}", locality.uri, locality.range.start.line, locality.range.start.column)
}

/// One line per diagnostic, ordered as reported.
pub fn render_diagnostics(diagnostics: &[SyntaxError]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let _ = writeln!(
            out,
            "{}: {}[{}]: {}",
            format_locality(&diagnostic.locality),
            diagnostic.severity,
            diagnostic.code,
            diagnostic.message
        );
    }
    out
}

/// Origin of `offset` in the expanded text, as `uri:line:column`.
pub fn map_offset(fragment: &AnalysisFragment, offset: &str) -> Result<String, CommandError> {
    let value: u32 = offset
        .parse()
        .map_err(|_| CommandError::InvalidOffset(offset.to_string()))?;
    fragment
        .map_offset(value)
        .map(|locality| format_locality(&locality))
        .ok_or_else(|| CommandError::InvalidOffset(offset.to_string()))
}
