//! Node key to parser dispatch table.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dom::NodeKey;
use crate::parsers::ElementParser;

/// A shareable parser handle.
pub type SharedParser = Arc<dyn ElementParser>;

/// Ordered candidate parsers per node key, plus backups tried after every
/// key's own list.
#[derive(Clone, Default)]
pub struct DispatchTable {
    parsers: HashMap<NodeKey, Vec<SharedParser>>,
    backups: Vec<SharedParser>,
}

impl DispatchTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `parser` to the list of every key it declares.
    pub fn register(&mut self, parser: SharedParser) {
        for key in &parser.descriptor().keys {
            self.insert(key.clone(), Arc::clone(&parser), None);
        }
    }

    /// Insert `parser` for `key` at `position`, clamped to the list length.
    /// `None` appends.
    pub fn insert(&mut self, key: NodeKey, parser: SharedParser, position: Option<usize>) {
        let list = self.parsers.entry(key).or_default();
        let index = position.map_or(list.len(), |p| p.min(list.len()));
        list.insert(index, parser);
    }

    /// Append a parser tried for every key after its own candidates.
    pub fn add_backup(&mut self, parser: SharedParser) {
        self.backups.push(parser);
    }

    /// Parsers registered for `key`, without backups.
    #[must_use]
    pub fn parsers(&self, key: &NodeKey) -> &[SharedParser] {
        self.parsers.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn backups(&self) -> &[SharedParser] {
        &self.backups
    }

    /// Candidates for `key` in the order they are tried.
    pub fn candidates<'a>(
        &'a self,
        key: &NodeKey,
    ) -> impl Iterator<Item = &'a SharedParser> + use<'a> {
        self.parsers(key).iter().chain(self.backups.iter())
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |list: &[SharedParser]| {
            list.iter()
                .map(|p| p.name().to_string())
                .collect::<Vec<_>>()
        };
        let mut map = f.debug_map();
        for (key, list) in &self.parsers {
            map.entry(&key.to_string(), &names(list));
        }
        map.entry(&"backups", &names(&self.backups));
        map.finish()
    }
}
