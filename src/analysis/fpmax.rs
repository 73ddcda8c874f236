//! Maximal frequent itemset mining (FP-Max)
//!
//! Finds every set of columns whose rows-containing-all-of-them fraction
//! meets a minimum support, keeping only sets with no qualifying superset.
//!
//! # Algorithm
//!
//! 1. Count column frequencies and rank frequent columns, most frequent
//!    first (ties broken by column index).
//! 2. Insert every row, restricted to frequent columns in rank order, into
//!    an FP-tree (prefix tree with per-node counts and a per-item node list).
//! 3. Walk the header items least frequent first. For each item, build the
//!    conditional tree from its prefix paths and recurse with the item added
//!    to the suffix. A branch is skipped when `suffix + item + conditional
//!    items` is already covered by a known maximal set; a single-path tree
//!    yields `suffix + path` directly.
//! 4. A final sweep drops any collected set that is a proper subset of
//!    another.
//!
//! # Complexity
//!
//! Tree construction is `O(cells)` per level. The search is exponential in
//! the number of frequent columns in the worst case: lowering the minimum
//! support admits more columns and deeper conditional trees, while high
//! support prunes most columns in step 1. The maximal-set cover check is
//! linear in the number of sets found so far.

use std::collections::HashMap;

use crate::error::{Result, TrackerError};
use crate::types::{EncodedMatrix, FrequentItemset, ItemsetTable};

/// Tolerance applied when turning a support fraction back into a row count
pub const SUPPORT_EPSILON: f64 = 1e-9;

/// Mining options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinerOptions {
    /// Report mac ids (true) or positional column indices (false)
    pub use_labels: bool,
}

impl Default for MinerOptions {
    fn default() -> Self {
        Self { use_labels: true }
    }
}

/// Relative support threshold for an absolute occurrence count.
///
/// Fails with [`TrackerError::Division`] when there are no groups.
pub fn support_threshold(occurrences: usize, n_groups: usize) -> Result<f64> {
    if n_groups == 0 {
        return Err(TrackerError::Division(format!(
            "cannot derive support for {} occurrences over zero groups",
            occurrences
        )));
    }
    Ok(occurrences as f64 / n_groups as f64)
}

/// Smallest row count whose fraction of `n_rows` reaches `min_support`
pub fn min_count_for(min_support: f64, n_rows: usize) -> usize {
    let raw = min_support * n_rows as f64;
    (raw - SUPPORT_EPSILON).ceil().max(1.0) as usize
}

/// FP-Max miner over an [`EncodedMatrix`]
#[derive(Debug, Clone, Default)]
pub struct FpMax {
    options: MinerOptions,
}

impl FpMax {
    pub fn new(options: MinerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MinerOptions {
        &self.options
    }

    /// Mine maximal itemsets with support `>= min_support`.
    ///
    /// An empty matrix is an error; a threshold above 1 is legal and yields
    /// an empty table. Results are ordered by descending count, then by
    /// descending length, then by items.
    pub fn mine(&self, matrix: &EncodedMatrix, min_support: f64) -> Result<ItemsetTable> {
        if matrix.is_empty() {
            return Err(TrackerError::EmptyInput(
                "no groups to mine".to_string(),
            ));
        }
        if min_support.is_nan() || min_support <= 0.0 {
            return Err(TrackerError::Config(format!(
                "min_support must be a positive number, got {}",
                min_support
            )));
        }

        let n = matrix.n_rows();
        let labeled = self.options.use_labels;
        if min_support > 1.0 {
            tracing::warn!(
                "min_support {:.4} exceeds 1 over {} groups; no itemset can qualify",
                min_support,
                n
            );
            return Ok(ItemsetTable::new(Vec::new(), labeled));
        }

        let min_count = min_count_for(min_support, n);
        tracing::debug!(
            "Mining {} groups x {} columns, min_support {:.6} (count {})",
            n,
            matrix.n_cols(),
            min_support,
            min_count
        );

        let transactions = matrix.transactions();
        let found = mine_maximal(&transactions, matrix.n_cols(), min_count);

        let mut itemsets: Vec<FrequentItemset> = found
            .into_iter()
            .map(|(cols, count)| {
                let mut items: Vec<u16> = if labeled {
                    cols.iter().map(|&c| matrix.columns()[c]).collect()
                } else {
                    cols.iter().map(|&c| c as u16).collect()
                };
                items.sort_unstable();
                FrequentItemset {
                    items,
                    support: count as f64 / n as f64,
                    count,
                }
            })
            .collect();

        itemsets.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(b.items.len().cmp(&a.items.len()))
                .then_with(|| a.items.cmp(&b.items))
        });

        tracing::debug!("Found {} maximal itemsets", itemsets.len());
        Ok(ItemsetTable::new(itemsets, labeled))
    }
}

/// Mine maximal itemsets over column-index transactions.
///
/// Returns `(sorted columns, count)` pairs, unordered.
pub fn mine_maximal(
    transactions: &[Vec<usize>],
    n_cols: usize,
    min_count: usize,
) -> Vec<(Vec<usize>, usize)> {
    let mut counts = vec![0usize; n_cols];
    for tx in transactions {
        let mut seen = tx.clone();
        seen.sort_unstable();
        seen.dedup();
        for c in seen {
            counts[c] += 1;
        }
    }

    let mut order: Vec<usize> = (0..n_cols).filter(|&c| counts[c] >= min_count).collect();
    order.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));
    let mut rank = vec![usize::MAX; n_cols];
    for (r, &c) in order.iter().enumerate() {
        rank[c] = r;
    }

    let weighted: Vec<(Vec<usize>, usize)> = transactions.iter().map(|tx| (tx.clone(), 1)).collect();
    let tree = FpTree::build(&weighted, &rank, min_count);

    let mut collector = MaximalSets::default();
    search(&tree, &[], &rank, min_count, &mut collector);
    collector.into_maximal()
}

const ROOT: usize = 0;

#[derive(Debug)]
struct FpNode {
    item: usize,
    count: usize,
    parent: usize,
    children: Vec<usize>,
}

/// Prefix tree of rank-ordered transactions
#[derive(Debug)]
struct FpTree {
    nodes: Vec<FpNode>,
    /// Nodes carrying each item
    header: HashMap<usize, Vec<usize>>,
    /// Items present, most frequent (lowest rank) first
    items: Vec<usize>,
    /// Total count per item
    counts: HashMap<usize, usize>,
}

impl FpTree {
    fn build(transactions: &[(Vec<usize>, usize)], rank: &[usize], min_count: usize) -> Self {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for (tx, weight) in transactions {
            let mut seen = tx.clone();
            seen.sort_unstable();
            seen.dedup();
            for item in seen {
                *counts.entry(item).or_insert(0) += weight;
            }
        }
        counts.retain(|&item, count| *count >= min_count && rank[item] != usize::MAX);

        let mut items: Vec<usize> = counts.keys().copied().collect();
        items.sort_by_key(|&i| rank[i]);

        let mut tree = Self {
            nodes: vec![FpNode {
                item: usize::MAX,
                count: 0,
                parent: ROOT,
                children: Vec::new(),
            }],
            header: HashMap::new(),
            items,
            counts,
        };

        for (tx, weight) in transactions {
            let mut path: Vec<usize> = tx
                .iter()
                .copied()
                .filter(|i| tree.counts.contains_key(i))
                .collect();
            path.sort_by_key(|&i| rank[i]);
            path.dedup();
            tree.insert(&path, *weight);
        }
        tree
    }

    fn insert(&mut self, path: &[usize], weight: usize) {
        let mut cur = ROOT;
        for &item in path {
            let existing = self.nodes[cur]
                .children
                .iter()
                .copied()
                .find(|&c| self.nodes[c].item == item);
            cur = match existing {
                Some(child) => {
                    self.nodes[child].count += weight;
                    child
                }
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(FpNode {
                        item,
                        count: weight,
                        parent: cur,
                        children: Vec::new(),
                    });
                    self.nodes[cur].children.push(idx);
                    self.header.entry(item).or_default().push(idx);
                    idx
                }
            };
        }
    }

    fn is_empty(&self) -> bool {
        self.nodes[ROOT].children.is_empty()
    }

    /// Items along the path and the count of its deepest node, when the
    /// tree never branches
    fn single_path(&self) -> Option<(Vec<usize>, usize)> {
        let mut path = Vec::new();
        let mut count = 0;
        let mut cur = ROOT;
        loop {
            match self.nodes[cur].children.as_slice() {
                [] => return Some((path, count)),
                [only] => {
                    cur = *only;
                    path.push(self.nodes[cur].item);
                    count = self.nodes[cur].count;
                }
                _ => return None,
            }
        }
    }

    /// Conditional pattern base of `item`: root-first ancestor paths
    /// weighted by the count of each `item` node
    fn prefix_paths(&self, item: usize) -> Vec<(Vec<usize>, usize)> {
        let Some(nodes) = self.header.get(&item) else {
            return Vec::new();
        };
        nodes
            .iter()
            .map(|&idx| {
                let mut path = Vec::new();
                let mut cur = self.nodes[idx].parent;
                while cur != ROOT {
                    path.push(self.nodes[cur].item);
                    cur = self.nodes[cur].parent;
                }
                path.reverse();
                (path, self.nodes[idx].count)
            })
            .collect()
    }
}

/// Known maximal candidates, each a sorted column list with its count
#[derive(Debug, Default)]
struct MaximalSets {
    sets: Vec<(Vec<usize>, usize)>,
}

impl MaximalSets {
    /// Whether some known set contains every column of `candidate`
    fn covers(&self, candidate: &[usize]) -> bool {
        self.sets
            .iter()
            .any(|(set, _)| is_subset(candidate, set))
    }

    fn insert(&mut self, candidate: Vec<usize>, count: usize) {
        if !self.covers(&candidate) {
            self.sets.push((candidate, count));
        }
    }

    fn into_maximal(self) -> Vec<(Vec<usize>, usize)> {
        let sets = self.sets;
        sets.iter()
            .filter(|(a, _)| {
                !sets
                    .iter()
                    .any(|(b, _)| a.len() < b.len() && is_subset(a, b))
            })
            .cloned()
            .collect()
    }
}

/// `a ⊆ b` for ascending slices
fn is_subset(a: &[usize], b: &[usize]) -> bool {
    if a.len() > b.len() {
        return false;
    }
    let mut j = 0;
    for &x in a {
        while j < b.len() && b[j] < x {
            j += 1;
        }
        if j == b.len() || b[j] != x {
            return false;
        }
        j += 1;
    }
    true
}

fn search(
    tree: &FpTree,
    suffix: &[usize],
    rank: &[usize],
    min_count: usize,
    found: &mut MaximalSets,
) {
    if let Some((path, count)) = tree.single_path() {
        if !path.is_empty() {
            let mut candidate: Vec<usize> = suffix.iter().chain(path.iter()).copied().collect();
            candidate.sort_unstable();
            found.insert(candidate, count);
        }
        return;
    }

    for &item in tree.items.iter().rev() {
        let mut next_suffix = suffix.to_vec();
        next_suffix.push(item);

        let cond = FpTree::build(&tree.prefix_paths(item), rank, min_count);

        let mut head: Vec<usize> = next_suffix.iter().chain(cond.items.iter()).copied().collect();
        head.sort_unstable();
        if found.covers(&head) {
            continue;
        }

        if cond.is_empty() {
            next_suffix.sort_unstable();
            let count = tree.counts.get(&item).copied().unwrap_or(0);
            found.insert(next_suffix, count);
        } else {
            search(&cond, &next_suffix, rank, min_count, found);
        }
    }
}
