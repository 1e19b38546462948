//! Stack growth for nested copybook resolution.
//!
//! One level of copybook nesting is one trip around
//! `CopybookResolver::resolve` → `DialectAdapter::visit` →
//! `ResolutionContext::resolve_copy` → `CopybookResolver::resolve`, with a
//! parse and a transformation alive in every frame. A chain of a thousand
//! copybooks would exhaust the thread's stack, so `resolve` enters
//! through here. Native targets grow the stack on demand with `stacker`;
//! wasm calls straight through.

/// Grow the stack when less than this remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cbl_ir::{copy_nodes, CopybookName, DialectKind, SourceText};
    use pretty_assertions::assert_eq;

    use crate::dialect::DialectSet;
    use crate::provider::InMemoryCopybooks;
    use crate::CopybookResolver;

    #[test]
    fn long_copybook_chain_resolves() {
        const LEVELS: usize = 1_000;
        let mut books = InMemoryCopybooks::new();
        for level in 0..LEVELS {
            let text = if level + 1 == LEVELS {
                "01 LAST.".to_string()
            } else {
                format!("COPY B{}.", level + 1)
            };
            books.insert(CopybookName::new(format!("B{level}"), DialectKind::Cobol), text);
        }
        let resolver = CopybookResolver::new(Arc::new(books));

        let handle = std::thread::Builder::new()
            .stack_size(4 * 1024 * 1024)
            .spawn(move || {
                let source = SourceText::new("prog", "COPY B0.");
                let resolution = resolver.resolve_document(&source, &DialectSet::cobol());
                (
                    resolution.extended_text(),
                    copy_nodes(&resolution.nodes).count(),
                    resolution.errors.len(),
                )
            });
        let Ok(Ok((text, copies, errors))) = handle.map(std::thread::JoinHandle::join) else {
            panic!("resolution thread failed");
        };
        assert_eq!(text, "01 LAST.");
        assert_eq!(copies, LEVELS);
        assert_eq!(errors, 0);
    }
}
