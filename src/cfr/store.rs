//! Information-set storage.
//!
//! One [`NodeStore`] is owned exclusively by one solver instance. The
//! baseline design is single-threaded, so the store is a plain owned map
//! with no interior mutability; parallel self-play workers, if ever added,
//! would each own an independent store and merge sums after training.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;

use crate::cfr::node::{Node, Real};
use crate::game::InfoSetKey;

/// Owned mapping from information-set key to [`Node`].
///
/// Nodes are created lazily on first visit and never removed; the map grows
/// monotonically over training (12 information sets for the full Kuhn game)
/// and is not persisted anywhere.
#[derive(Debug, Clone, Default)]
pub struct NodeStore<T> {
    nodes: FxHashMap<InfoSetKey, Node<T>>,
}

impl<T: Real> NodeStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
        }
    }

    /// Fetch the node for `key`, creating it on first visit.
    pub fn node_mut(&mut self, key: InfoSetKey) -> &mut Node<T> {
        self.nodes.entry(key).or_default()
    }

    /// Look up a node without creating it.
    pub fn get(&self, key: &InfoSetKey) -> Option<&Node<T>> {
        self.nodes.get(key)
    }

    /// Number of information sets visited so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True before the first traversal.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all visited information sets.
    pub fn iter(&self) -> impl Iterator<Item = (&InfoSetKey, &Node<T>)> {
        self.nodes.iter()
    }

    /// Drop all accumulated state.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Human-readable rendering of every visited information set, sorted by
    /// key, with its raw accumulators and average strategy.
    ///
    /// Diagnostics only; not a stable format and not meant for persistence.
    pub fn dump(&self) -> String {
        let mut keys: Vec<&InfoSetKey> = self.nodes.keys().collect();
        keys.sort();

        let mut out = String::new();
        for key in keys {
            let node = &self.nodes[key];
            let regret = node.regret_sum();
            let sums = node.strategy_sum();
            let average = node.average_strategy();
            let _ = writeln!(
                out,
                "{:<5} regret=[{:>10.4}, {:>10.4}]  strategy_sum=[{:>10.4}, {:>10.4}]  avg(p/b)=[{:.4}, {:.4}]",
                key.to_string(),
                regret[0],
                regret[1],
                sums[0],
                sums[1],
                average[0],
                average[1],
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{History, KuhnAction, Rank};

    #[test]
    fn nodes_are_created_lazily_and_reused() {
        let mut store = NodeStore::<f64>::new();
        assert!(store.is_empty());

        let key = InfoSetKey::new(Rank::Queen, History::new().push(KuhnAction::Pass));
        store.node_mut(key).update_strategy(1.0);
        assert_eq!(store.len(), 1);

        // Same key hits the same node.
        store.node_mut(key).update_strategy(1.0);
        assert_eq!(store.len(), 1);
        let sums = store.get(&key).unwrap().strategy_sum();
        assert!((sums[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn separate_stores_do_not_interfere() {
        let key = InfoSetKey::new(Rank::Jack, History::new());
        let mut a = NodeStore::<f64>::new();
        let mut b = NodeStore::<f64>::new();
        a.node_mut(key).update_strategy(1.0);
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
        b.node_mut(key).update_strategy(1.0);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn dump_lists_every_key_sorted() {
        let mut store = NodeStore::<f64>::new();
        let king = InfoSetKey::new(Rank::King, History::new());
        let jack = InfoSetKey::new(Rank::Jack, History::new().push(KuhnAction::Bet));
        store.node_mut(king).update_strategy(1.0);
        store.node_mut(jack).update_strategy(1.0);

        let dump = store.dump();
        let jack_pos = dump.find("J:b").expect("jack entry missing");
        let king_pos = dump.find("K:").expect("king entry missing");
        assert!(jack_pos < king_pos, "dump is not sorted:\n{}", dump);
    }
}
