//! Copybook identities and provider results.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use crate::{DocumentUri, SourceText};

/// The dialects whose copy directives the engine understands.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DialectKind {
    /// Plain COBOL: `COPY name.`
    #[default]
    Cobol,
    /// CA IDMS: `COPY IDMS name.`
    Idms,
    /// DaCo: `COPY MAID name.`
    DaCo,
}

impl DialectKind {
    pub const ALL: [DialectKind; 3] = [DialectKind::Cobol, DialectKind::Idms, DialectKind::DaCo];

    pub const fn as_str(self) -> &'static str {
        match self {
            DialectKind::Cobol => "COBOL",
            DialectKind::Idms => "IDMS",
            DialectKind::DaCo => "DaCo",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dialect name that matches none of [`DialectKind::ALL`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect `{0}`")]
pub struct UnknownDialect(pub String);

impl FromStr for DialectKind {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DialectKind::ALL
            .into_iter()
            .find(|dialect| dialect.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}

/// Name of a copybook as written in a copy directive.
///
/// Equality and hashing use only the qualified name: the upper-cased
/// display name, suffixed with `@DIALECT` for dialect-specific copybooks.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopybookName {
    display_name: String,
    dialect: DialectKind,
    qualified_name: String,
}

impl CopybookName {
    pub fn new(display_name: impl Into<String>, dialect: DialectKind) -> Self {
        let display_name = display_name.into();
        let upper = display_name.to_ascii_uppercase();
        let qualified_name = match dialect {
            DialectKind::Cobol => upper,
            other => format!("{upper}@{other}"),
        };
        CopybookName {
            display_name,
            dialect,
            qualified_name,
        }
    }

    /// The name as it appeared in source.
    #[inline]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[inline]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    #[inline]
    pub fn dialect(&self) -> DialectKind {
        self.dialect
    }
}

impl PartialEq for CopybookName {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name == other.qualified_name
    }
}

impl Eq for CopybookName {}

impl Hash for CopybookName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.qualified_name.hash(state);
    }
}

impl fmt::Display for CopybookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// What a provider knows about a copybook.
///
/// `content == None` means the copybook could not be located; that is an
/// expected outcome, not a fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopybookModel {
    pub name: CopybookName,
    pub uri: DocumentUri,
    pub content: Option<Arc<str>>,
}

impl CopybookModel {
    pub fn new(name: CopybookName, uri: impl Into<DocumentUri>, content: impl Into<Arc<str>>) -> Self {
        CopybookModel {
            name,
            uri: uri.into(),
            content: Some(content.into()),
        }
    }

    /// A model for a copybook nobody could find.
    pub fn missing(name: CopybookName) -> Self {
        let uri = DocumentUri::from(format!("copybook:missing/{}", name.qualified_name()));
        CopybookModel {
            name,
            uri,
            content: None,
        }
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.content.is_none()
    }

    /// Snapshot of the copybook text, if it was found.
    pub fn source(&self) -> Option<SourceText> {
        self.content
            .as_ref()
            .map(|content| SourceText::new(self.uri.clone(), Arc::clone(content)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn qualified_names_are_dialect_namespaced() {
        assert_eq!(CopybookName::new("test", DialectKind::Cobol).qualified_name(), "TEST");
        assert_eq!(
            CopybookName::new("pmorec", DialectKind::DaCo).qualified_name(),
            "PMOREC@DaCo"
        );
        assert_eq!(
            CopybookName::new("EMPREC", DialectKind::Idms).qualified_name(),
            "EMPREC@IDMS"
        );
    }

    #[test]
    fn identity_ignores_display_case() {
        let mut set = HashSet::new();
        set.insert(CopybookName::new("Test", DialectKind::Cobol));
        set.insert(CopybookName::new("TEST", DialectKind::Cobol));
        set.insert(CopybookName::new("TEST", DialectKind::Idms));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_keeps_source_spelling() {
        assert_eq!(CopybookName::new("MyBook", DialectKind::Cobol).to_string(), "MyBook");
    }

    #[test]
    fn dialects_parse_case_insensitively() {
        assert_eq!("idms".parse::<DialectKind>(), Ok(DialectKind::Idms));
        assert_eq!(" DACO ".parse::<DialectKind>(), Ok(DialectKind::DaCo));
        assert_eq!("cobol".parse::<DialectKind>(), Ok(DialectKind::Cobol));
        assert_eq!(
            "PL/I".parse::<DialectKind>(),
            Err(UnknownDialect("PL/I".to_string()))
        );
    }

    #[test]
    fn missing_model_has_no_source() {
        let model = CopybookModel::missing(CopybookName::new("GONE", DialectKind::Cobol));
        assert!(model.is_missing());
        assert!(model.source().is_none());
    }

    #[test]
    fn found_model_source_uses_model_uri() {
        let name = CopybookName::new("TEST", DialectKind::Cobol);
        let model = CopybookModel::new(name, "file:///TEST.cpy", "NEXT LINE\n");
        let source = model.source();
        assert_eq!(source.as_ref().map(|s| s.uri().as_str()), Some("file:///TEST.cpy"));
        assert_eq!(source.as_ref().map(SourceText::text), Some("NEXT LINE\n"));
    }
}
