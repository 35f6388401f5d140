use std::collections::{BTreeMap, HashSet};

use futures::future::select_all;
use launchpad_ledger_interface::Subscription;
use tracing::warn;

/// Aggregated view over several components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedView<V> {
    /// Latest snapshot of each component which delivered one.
    pub snapshot: BTreeMap<u64, Vec<V>>,
    /// Every observed component delivered at least one snapshot.
    pub is_fully_loaded: bool,
}

impl<V> ObservedView<V> {
    /// All items, in component order.
    pub fn items(&self) -> impl Iterator<Item = &V> {
        self.snapshot.values().flatten()
    }
}

/// Fan-in of one subscription per component into a single map.
///
/// `K` identifies what is observed. Switching to another key drops the
/// previous subscriptions and clears the view before anything else happens.
pub(crate) struct Fanout<K, T, V> {
    key: Option<K>,
    components: Vec<u64>,
    feeds: Vec<(u64, Subscription<T>)>,
    snapshot: BTreeMap<u64, Vec<V>>,
    loaded: HashSet<u64>,
}

impl<K: PartialEq, T: Send + 'static, V: Clone> Fanout<K, T, V> {
    pub fn new() -> Self {
        Self {
            key: None,
            components: vec![],
            feeds: vec![],
            snapshot: BTreeMap::new(),
            loaded: HashSet::new(),
        }
    }

    /// Returns `false` when `key` is already observed.
    pub fn reset(&mut self, key: K, components: Vec<u64>) -> bool {
        if self.key.as_ref() == Some(&key) {
            return false;
        }

        self.feeds.clear();
        self.snapshot.clear();
        self.loaded.clear();
        self.components = components;
        self.key = Some(key);
        true
    }

    /// Forget the current key and its subscriptions.
    pub fn clear(&mut self) {
        self.feeds.clear();
        self.snapshot.clear();
        self.loaded.clear();
        self.components.clear();
        self.key = None;
    }

    pub fn attach(&mut self, component_id: u64, subscription: Subscription<T>) {
        self.feeds.push((component_id, subscription));
    }

    /// Wait for the next snapshot of any component.
    ///
    /// Returns `None` once every feed is closed.
    pub async fn next_snapshot(&mut self) -> Option<(u64, Vec<T>)> {
        loop {
            if self.feeds.is_empty() {
                return None;
            }

            let (output, index, pending) = select_all(
                self.feeds
                    .iter_mut()
                    .map(|(component_id, sub)| {
                        let component_id = *component_id;
                        Box::pin(async move { (component_id, sub.next().await) })
                    }),
            )
            .await;
            drop(pending);

            match output {
                (component_id, Some(items)) => return Some((component_id, items)),
                (component_id, None) => {
                    warn!(component_id, "Ledger feed closed");
                    self.feeds.remove(index);
                }
            }
        }
    }

    pub fn store(&mut self, component_id: u64, items: Vec<V>) {
        self.snapshot.insert(component_id, items);
        self.loaded.insert(component_id);
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.key.is_some() && self.components.iter().all(|id| self.loaded.contains(id))
    }

    pub fn view(&self) -> ObservedView<V> {
        ObservedView {
            snapshot: self.snapshot.clone(),
            is_fully_loaded: self.is_fully_loaded(),
        }
    }
}
