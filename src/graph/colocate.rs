//! Colocation tag groups.
//!
//! A disjoint set over tags. The oldest tag of a group is its canonical id,
//! so merging always folds the newer group into the older one.

use indexmap::IndexMap;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct ColocateTags {
    /// Tag to slot, slots numbered in creation order.
    slots: IndexMap<String, usize>,
    parent: Vec<usize>,
}

impl ColocateTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.slots.contains_key(tag)
    }

    /// Register `tag` as its own group if unseen.
    pub fn insert(&mut self, tag: &str) -> usize {
        if let Some(slot) = self.slots.get(tag) {
            return *slot;
        }
        let slot = self.parent.len();
        self.parent.push(slot);
        self.slots.insert(tag.to_string(), slot);
        slot
    }

    fn root_of(&mut self, slot: usize) -> usize {
        let mut root = slot;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression.
        let mut cur = slot;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn root_of_ref(&self, slot: usize) -> usize {
        let mut root = slot;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        root
    }

    fn tag_at(&self, slot: usize) -> &str {
        self.slots
            .get_index(slot)
            .map(|(tag, _)| tag.as_str())
            .unwrap_or_default()
    }

    /// Canonical tag of the group holding `tag`.
    pub fn find(&mut self, tag: &str) -> Option<String> {
        let slot = *self.slots.get(tag)?;
        let root = self.root_of(slot);
        Some(self.tag_at(root).to_string())
    }

    /// Same as [`find`](Self::find) without compressing paths.
    pub fn resolve(&self, tag: &str) -> Option<&str> {
        let slot = *self.slots.get(tag)?;
        Some(self.tag_at(self.root_of_ref(slot)))
    }

    /// Merge the groups of `a` and `b`, registering either if needed.
    /// Returns the canonical tag of the merged group.
    pub fn union(&mut self, a: &str, b: &str) -> String {
        let sa = self.insert(a);
        let sb = self.insert(b);
        let ra = self.root_of(sa);
        let rb = self.root_of(sb);
        let (keep, fold) = if ra <= rb { (ra, rb) } else { (rb, ra) };
        if keep != fold {
            self.parent[fold] = keep;
            tracing::debug!(
                merged = self.tag_at(fold),
                into = self.tag_at(keep),
                "colocation groups merged"
            );
        }
        self.tag_at(keep).to_string()
    }

    /// Every tag that is not itself canonical, mapped to its canonical tag.
    pub fn mapping(&self) -> BTreeMap<String, String> {
        self.slots
            .iter()
            .filter_map(|(tag, slot)| {
                let root = self.root_of_ref(*slot);
                (root != *slot).then(|| (tag.clone(), self.tag_at(root).to_string()))
            })
            .collect()
    }
}
