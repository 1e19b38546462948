//! Cycle detection state for one resolution chain.

use cbl_ir::CopybookName;
use rustc_hash::FxHashSet;

/// The copybooks on the current resolution chain.
///
/// A name is entered when resolution descends into a copybook and left
/// when it returns, so siblings never see each other's names: the same
/// copybook included twice side by side is not a cycle. One set belongs to
/// one top-level analysis and is never shared.
#[derive(Clone, Debug, Default)]
pub struct ProcessedSet {
    members: FxHashSet<CopybookName>,
    chain: Vec<CopybookName>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, name: &CopybookName) -> bool {
        self.members.contains(name)
    }

    /// Push `name` onto the chain. Returns `false` if it is already on it.
    pub fn enter(&mut self, name: CopybookName) -> bool {
        if !self.members.insert(name.clone()) {
            return false;
        }
        self.chain.push(name);
        true
    }

    /// Pop `name`, which must be the innermost entry.
    pub fn leave(&mut self, name: &CopybookName) {
        debug_assert_eq!(self.chain.last(), Some(name), "unbalanced copybook chain");
        if self.chain.last() == Some(name) {
            self.chain.pop();
            self.members.remove(name);
        }
    }

    /// Number of copybooks on the chain.
    #[inline]
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// Outermost first.
    pub fn chain(&self) -> &[CopybookName] {
        &self.chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbl_ir::DialectKind;
    use pretty_assertions::assert_eq;

    fn name(s: &str) -> CopybookName {
        CopybookName::new(s, DialectKind::Cobol)
    }

    #[test]
    fn enter_and_leave_are_scoped() {
        let mut processed = ProcessedSet::new();
        assert!(processed.enter(name("A")));
        assert!(processed.enter(name("B")));
        assert!(!processed.enter(name("a")));
        assert_eq!(processed.depth(), 2);

        processed.leave(&name("B"));
        assert!(!processed.contains(&name("B")));
        // A sibling may enter B again.
        assert!(processed.enter(name("B")));
        processed.leave(&name("B"));
        processed.leave(&name("A"));
        assert_eq!(processed.depth(), 0);
    }

    #[test]
    fn dialects_are_separate_names() {
        let mut processed = ProcessedSet::new();
        processed.enter(name("REC"));
        assert!(!processed.contains(&CopybookName::new("REC", DialectKind::DaCo)));
        assert_eq!(processed.chain(), &[name("REC")]);
    }
}
