use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use super::graph::Link;

pub fn list_neighbors_of(links: &[Link], public_key: &str) -> Vec<String> {
    let mut neighbors = IndexSet::new();
    for link in links {
        if link.is_self_loop() {
            continue;
        }
        if let Some(other) = link.other_end(public_key) {
            neighbors.insert(other);
        }
    }

    neighbors.into_iter().map(str::to_owned).collect()
}

/// Groups `items` by the value `key` extracts; `None` collects items that lack the attribute.
///
/// Groups appear in the order their key was first seen and keep item order.
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> IndexMap<Option<K>, Vec<T>>
where
    K: Hash + Eq,
    F: FnMut(&T) -> Option<K>,
{
    let mut groups: IndexMap<Option<K>, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

pub trait LayoutEngine {
    type Node;

    fn initialize(&mut self, nodes: Vec<Self::Node>);
}

/// Rejected nodes never reach the inner engine, so they take no part in its computation.
pub struct FilteredLayout<E, P> {
    engine: E,
    predicate: P,
}

impl<E, P> FilteredLayout<E, P> {
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }
}

impl<E, P> LayoutEngine for FilteredLayout<E, P>
where
    E: LayoutEngine,
    P: FnMut(&E::Node) -> bool,
{
    type Node = E::Node;

    fn initialize(&mut self, nodes: Vec<Self::Node>) {
        let kept = nodes
            .into_iter()
            .filter(|node| (self.predicate)(node))
            .collect();
        self.engine.initialize(kept);
    }
}

pub fn filter_force_nodes<E, P>(engine: E, predicate: P) -> FilteredLayout<E, P>
where
    E: LayoutEngine,
    P: FnMut(&E::Node) -> bool,
{
    FilteredLayout { engine, predicate }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<u32>,
    }

    impl LayoutEngine for Recorder {
        type Node = u32;

        fn initialize(&mut self, nodes: Vec<u32>) {
            self.seen = nodes;
        }
    }

    #[test]
    fn neighbors_of_middle_node() {
        let links = vec![Link::new("A", "B", 0.0, 0.0), Link::new("B", "C", 0.0, 0.0)];

        assert_eq!(list_neighbors_of(&links, "B"), vec!["A", "C"]);
    }

    #[test]
    fn neighbors_are_deduplicated_in_first_seen_order() {
        let links = vec![
            Link::new("C", "B", 0.0, 0.0),
            Link::new("B", "A", 0.0, 0.0),
            Link::new("B", "C", 0.0, 0.0),
            Link::new("A", "D", 0.0, 0.0),
        ];

        assert_eq!(list_neighbors_of(&links, "B"), vec!["C", "A"]);
    }

    #[test]
    fn self_loops_contribute_nothing() {
        let links = vec![Link::new("B", "B", 5.0, 5.0)];

        assert!(list_neighbors_of(&links, "B").is_empty());
    }

    #[test]
    fn unknown_key_has_no_neighbors() {
        let links = vec![Link::new("A", "B", 0.0, 0.0)];

        assert!(list_neighbors_of(&links, "Q").is_empty());
    }

    #[test]
    fn group_by_preserves_order_and_collects_missing_keys() {
        let items = vec![("a", Some(1)), ("b", None), ("c", Some(1)), ("d", Some(2))];
        let groups = group_by(items, |item| item.1);

        let keys = groups.keys().copied().collect::<Vec<_>>();
        assert_eq!(keys, vec![Some(1), None, Some(2)]);
        assert_eq!(groups[&Some(1)], vec![("a", Some(1)), ("c", Some(1))]);
        assert_eq!(groups[&None], vec![("b", None)]);
    }

    #[test]
    fn group_by_empty_input() {
        let groups = group_by(Vec::<u8>::new(), |item| Some(*item));

        assert!(groups.is_empty());
    }

    #[test]
    fn filtered_layout_only_forwards_accepted_nodes() {
        let mut layout = filter_force_nodes(Recorder::default(), |node: &u32| node % 2 == 0);
        layout.initialize(vec![1, 2, 3, 4, 6]);

        assert_eq!(layout.engine().seen, vec![2, 4, 6]);
    }
}
