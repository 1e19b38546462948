//! Copybook lookup.
//!
//! Resolution never reads files itself; it asks a [`CopybookProvider`].
//! Lookups are total: a copybook nobody can find comes back as a model
//! without content, never as an error.

use std::sync::Arc;

use cbl_ir::{CopybookModel, CopybookName};
use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use tracing::trace;

pub trait CopybookProvider: Send + Sync {
    fn lookup(&self, name: &CopybookName) -> CopybookModel;
}

impl<P: CopybookProvider + ?Sized> CopybookProvider for Arc<P> {
    fn lookup(&self, name: &CopybookName) -> CopybookModel {
        (**self).lookup(name)
    }
}

/// Copybooks held in memory, keyed by qualified name.
///
/// Documents get `copybook:///NAME` URIs (`copybook:///NAME@DIALECT` for
/// dialect copybooks).
#[derive(Clone, Debug, Default)]
pub struct InMemoryCopybooks {
    books: FxHashMap<CopybookName, Arc<str>>,
}

impl InMemoryCopybooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a copybook, replacing any previous content under the same name.
    pub fn insert(&mut self, name: CopybookName, content: impl Into<Arc<str>>) {
        self.books.insert(name, content.into());
    }

    #[must_use]
    pub fn with(mut self, name: CopybookName, content: impl Into<Arc<str>>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn uri_for(name: &CopybookName) -> String {
        format!("copybook:///{}", name.qualified_name())
    }
}

impl CopybookProvider for InMemoryCopybooks {
    fn lookup(&self, name: &CopybookName) -> CopybookModel {
        match self.books.get(name) {
            Some(content) => CopybookModel::new(name.clone(), Self::uri_for(name), Arc::clone(content)),
            None => CopybookModel::missing(name.clone()),
        }
    }
}

/// Memoises the copybooks an inner provider finds.
///
/// Safe for concurrent analyses: readers get immutable `Arc<str>`
/// snapshots. Missing copybooks are not cached; they may appear later.
pub struct CachingCopybookProvider<P> {
    inner: P,
    cache: DashMap<CopybookName, CopybookModel, FxBuildHasher>,
}

impl<P: CopybookProvider> CachingCopybookProvider<P> {
    pub fn new(inner: P) -> Self {
        CachingCopybookProvider {
            inner,
            cache: DashMap::with_hasher(FxBuildHasher),
        }
    }
}

impl<P: CopybookProvider> CopybookProvider for CachingCopybookProvider<P> {
    fn lookup(&self, name: &CopybookName) -> CopybookModel {
        // Fast path: already cached
        if let Some(model) = self.cache.get(name) {
            trace!(copybook = %name, "copybook cache hit");
            return model.clone();
        }

        let model = self.inner.lookup(name);
        if !model.is_missing() {
            self.cache.insert(name.clone(), model.clone());
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbl_ir::DialectKind;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn cobol(name: &str) -> CopybookName {
        CopybookName::new(name, DialectKind::Cobol)
    }

    #[test]
    fn in_memory_lookup() {
        let books = InMemoryCopybooks::new().with(cobol("TEST"), "NEXT LINE\n");
        let found = books.lookup(&cobol("test"));
        assert_eq!(found.uri.as_str(), "copybook:///TEST");
        assert_eq!(found.content.as_deref(), Some("NEXT LINE\n"));
        assert!(books.lookup(&cobol("OTHER")).is_missing());
    }

    #[test]
    fn dialect_names_do_not_collide() {
        let books = InMemoryCopybooks::new().with(CopybookName::new("REC", DialectKind::DaCo), "x");
        assert!(books.lookup(&cobol("REC")).is_missing());
        assert_eq!(
            books.lookup(&CopybookName::new("REC", DialectKind::DaCo)).uri.as_str(),
            "copybook:///REC@DaCo"
        );
    }

    /// Counts how often the inner provider is asked.
    struct Counting {
        books: InMemoryCopybooks,
        calls: Arc<AtomicUsize>,
    }

    impl CopybookProvider for Counting {
        fn lookup(&self, name: &CopybookName) -> CopybookModel {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.books.lookup(name)
        }
    }

    fn counting() -> (Counting, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Counting {
            books: InMemoryCopybooks::new().with(cobol("A"), "a"),
            calls: Arc::clone(&calls),
        };
        (provider, calls)
    }

    #[test]
    fn caches_found_copybooks_only() {
        let (provider, calls) = counting();
        let cache = CachingCopybookProvider::new(provider);
        cache.lookup(&cobol("A"));
        cache.lookup(&cobol("A"));
        cache.lookup(&cobol("MISSING"));
        cache.lookup(&cobol("MISSING"));
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn concurrent_readers_see_the_same_content() {
        let (provider, calls) = counting();
        let cache = Arc::new(CachingCopybookProvider::new(provider));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    (0..100)
                        .map(|_| cache.lookup(&cobol("A")).content)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            let Ok(contents) = handle.join() else {
                panic!("reader thread panicked");
            };
            assert!(contents.iter().all(|c| c.as_deref() == Some("a")));
        }
        // racing first lookups may each reach the inner provider
        assert!(calls.load(Ordering::Relaxed) <= 8);
    }
}
