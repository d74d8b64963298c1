use crate::algorithms::ItemRecommender;
use crate::models::{ItemId, Recommendation};
use crate::store::RatingStore;
use crate::utils::rank_descending;
use rayon::prelude::*;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::info;

/// Sequence-based item-to-item engine.
///
/// Every time a user rates item `a` immediately before item `b`, the
/// directed edge a->b accumulates `exp(-|rating(a) - rating(b)|) - 0.5`
/// of affinity. Edge cost is the negated affinity, so close ratings make
/// an edge cheaper than zero. A bounded best-first search from each
/// source then ranks its neighborhood. Negative costs are intentional:
/// they let multi-hop paths overtake direct edges, and rule out swapping
/// in a textbook non-negative shortest-path routine.
pub struct PathEngine {
    limit: usize,
    recs: HashMap<ItemId, Vec<Recommendation>>,
}

#[derive(Debug, Clone, Copy)]
struct HeapKey {
    cost: f32,
    node: usize,
    entry: usize,
}

impl PartialEq for HeapKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapKey {}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
            .then_with(|| self.entry.cmp(&other.entry))
    }
}

impl PathEngine {
    pub fn build(store: &RatingStore, limit: usize) -> Self {
        // Nodes are interned in first-encounter order over transitions;
        // items that never take part in one stay out of the graph.
        let mut node_ids: Vec<ItemId> = Vec::new();
        let mut index_of: HashMap<ItemId, usize> = HashMap::new();
        let mut weights: HashMap<(usize, usize), f32> = HashMap::new();

        for &user_id in store.user_ids() {
            let ratings: Vec<_> = store.user_ratings(user_id).collect();
            // A single rating yields no transition.
            for pair in ratings.windows(2) {
                let a = intern(&mut node_ids, &mut index_of, pair[0].item_id);
                let b = intern(&mut node_ids, &mut index_of, pair[1].item_id);
                let affinity = (-(pair[0].value - pair[1].value).abs()).exp() - 0.5;
                *weights.entry((a, b)).or_insert(0.0) += affinity;
            }
        }

        let n = node_ids.len();
        let mut adjacency: Vec<Vec<(usize, f32)>> = vec![Vec::new(); n];
        for (&(a, b), &weight) in &weights {
            adjacency[a].push((b, -weight));
        }
        for edges in adjacency.iter_mut() {
            edges.sort_by(|x, y| {
                x.1.total_cmp(&y.1)
                    .then_with(|| node_ids[x.0].cmp(&node_ids[y.0]))
            });
        }

        let sources: Vec<usize> = (0..n).filter(|&i| !adjacency[i].is_empty()).collect();

        // Per-source searches are independent; results collect in
        // source order, so the parallel build stays deterministic.
        let results: Vec<(ItemId, Vec<Recommendation>)> = sources
            .par_iter()
            .map(|&source| {
                let settled = bounded_search(&adjacency, source, limit);
                let recs = settled
                    .into_iter()
                    .filter(|&(node, _)| node != source)
                    .map(|(node, cost)| Recommendation::new(node_ids[node], -cost))
                    .collect();
                // Descending score is ascending cumulative cost.
                (node_ids[source], rank_descending(recs, limit))
            })
            .collect();

        info!(
            nodes = n,
            edges = weights.len(),
            sources = results.len(),
            "similarity graph built"
        );

        Self {
            limit,
            recs: results.into_iter().collect(),
        }
    }

    /// Source nodes with a precomputed neighborhood.
    pub fn sources(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.recs.keys().copied()
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.recs.contains_key(&item_id)
    }
}

impl ItemRecommender for PathEngine {
    fn recommend(&self, item_id: ItemId) -> Vec<Recommendation> {
        self.recs.get(&item_id).cloned().unwrap_or_default()
    }

    fn limit(&self) -> usize {
        self.limit
    }
}

fn intern(node_ids: &mut Vec<ItemId>, index_of: &mut HashMap<ItemId, usize>, id: ItemId) -> usize {
    *index_of.entry(id).or_insert_with(|| {
        node_ids.push(id);
        node_ids.len() - 1
    })
}

/// Priority frontier over an arena of entries with validity flags.
///
/// The heap cannot decrease a key in place, so improving a node's cost
/// invalidates its previous entry and pushes a fresh one; stale entries
/// are skipped when popped.
#[derive(Default)]
struct Frontier {
    entries: Vec<(f32, usize)>,
    valid: Vec<bool>,
    heap: BinaryHeap<Reverse<HeapKey>>,
    best: HashMap<usize, usize>,
}

impl Frontier {
    fn push(&mut self, cost: f32, node: usize) {
        let entry = self.entries.len();
        self.entries.push((cost, node));
        self.valid.push(true);
        self.best.insert(node, entry);
        self.heap.push(Reverse(HeapKey { cost, node, entry }));
    }

    /// Pops the cheapest live entry, consuming it.
    fn pop(&mut self) -> Option<(usize, f32)> {
        while let Some(Reverse(key)) = self.heap.pop() {
            if self.valid[key.entry] {
                self.valid[key.entry] = false;
                return Some((key.node, key.cost));
            }
        }
        None
    }

    /// Records `cost` for `node` if it strictly beats the best known one.
    fn offer(&mut self, cost: f32, node: usize) {
        match self.best.get(&node) {
            Some(&entry) if cost >= self.entries[entry].0 => {}
            Some(&entry) => {
                self.valid[entry] = false;
                self.push(cost, node);
            }
            None => self.push(cost, node),
        }
    }
}

/// Best-first traversal from `source`, capped at `limit + 1` settled
/// nodes (the source included) rather than by a cost radius. Settled
/// nodes are final even if a cheaper path shows up later; the cap, not
/// cost exhaustion, is what usually ends the search.
fn bounded_search(
    adjacency: &[Vec<(usize, f32)>],
    source: usize,
    limit: usize,
) -> Vec<(usize, f32)> {
    let mut frontier = Frontier::default();
    let mut settled: Vec<(usize, f32)> = Vec::new();
    let mut settled_set: HashSet<usize> = HashSet::new();
    let mut budget = limit as i64 + 1;

    frontier.push(0.0, source);

    while let Some((node, cost)) = frontier.pop() {
        budget -= 1;
        if budget < 0 {
            break;
        }
        settled_set.insert(node);
        settled.push((node, cost));

        for &(neighbor, edge_cost) in &adjacency[node] {
            if settled_set.contains(&neighbor) {
                continue;
            }
            frontier.offer(cost + edge_cost, neighbor);
        }
    }

    settled
}
