// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Balanced search tree over acceptance intervals.
//!
//! The fast sketch strategy places one interval of width `tau` per
//! measurement in the 64-bit hash space and needs, for every element hash,
//! the set of intervals containing it. Bottoms are sorted and arranged as a
//! balanced binary search tree; because all intervals share one width, the
//! intervals containing a given hash form contiguous runs in bottom order
//! and a single descent plus a short expansion reports all of them.

use crate::error::Error;

/// Returns whether `h` lies in the circular interval `[bot, top)`.
///
/// `top` is `bot + tau` modulo the 64-bit space; a wrapped interval
/// (`top < bot`) covers `[bot, 2^64)` and `[0, top)`.
#[inline]
pub(crate) fn interval_contains(bot: u64, top: u64, h: u64) -> bool {
    if top >= bot {
        h >= bot && h < top
    } else {
        h >= bot || h < top
    }
}

#[derive(Debug)]
struct IntervalNode {
    bot: u64,
    top: u64,
    /// Output bit addressed when this interval collides, in pre-sort order.
    measurement: u32,
    left: Option<usize>,
    right: Option<usize>,
}

/// Read-only interval tree, built once per sketch call.
///
/// Nodes live in a flat arena indexed by sorted-bottom position; child
/// links are arena indices.
#[derive(Debug)]
pub(crate) struct IntervalTree {
    nodes: Vec<IntervalNode>,
    root: usize,
}

impl IntervalTree {
    /// Builds the tree from `(bottom, measurement)` pairs sorted by bottom,
    /// all sharing the interval width `tau`.
    pub(crate) fn build(sorted: &[(u64, u32)], tau: u64) -> Result<Self, Error> {
        debug_assert!(!sorted.is_empty());
        debug_assert!(sorted.is_sorted_by_key(|&(bot, _)| bot));

        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(sorted.len())
            .map_err(|e| Error::allocation("interval tree arena", e))?;
        for &(bot, measurement) in sorted {
            nodes.push(IntervalNode {
                bot,
                top: bot.wrapping_add(tau),
                measurement,
                left: None,
                right: None,
            });
        }

        let mut tree = Self { nodes, root: 0 };
        tree.root = tree.link_range(0, sorted.len() - 1);
        Ok(tree)
    }

    /// Balanced middle-split over the sorted sub-range `[lo, hi]`; returns
    /// the sub-range's root index.
    fn link_range(&mut self, lo: usize, hi: usize) -> usize {
        if lo == hi {
            return lo;
        }
        if hi == lo + 1 {
            self.nodes[lo].right = Some(hi);
            return lo;
        }

        let mid = lo + (hi - lo) / 2;
        self.nodes[mid].left = Some(self.link_range(lo, mid - 1));
        self.nodes[mid].right = Some(self.link_range(mid + 1, hi));
        mid
    }

    /// Invokes `hit` with the measurement index of every interval
    /// containing `h`. Each matching measurement is reported exactly once.
    pub(crate) fn for_each_overlap(&self, h: u64, mut hit: impl FnMut(u32)) {
        // Descend on bottoms. A wrapped node reached with h >= bot matches
        // through its upper arc; its low arc is handled by the tail sweep.
        let mut cursor = Some(self.root);
        let mut anchor = None;
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            if h < node.bot {
                cursor = node.left;
            } else if node.top < node.bot || h < node.top {
                anchor = Some(idx);
                break;
            } else {
                cursor = node.right;
            }
        }

        // Intervals whose bottom lies in (h - tau, h] form one contiguous
        // run around the anchor: later bottoms match while they stay at or
        // below h, earlier ones while their span still reaches h.
        if let Some(idx) = anchor {
            hit(self.nodes[idx].measurement);
            for node in &self.nodes[idx + 1..] {
                if node.bot > h {
                    break;
                }
                hit(node.measurement);
            }
            for node in self.nodes[..idx].iter().rev() {
                if !interval_contains(node.bot, node.top, h) {
                    break;
                }
                hit(node.measurement);
            }
        }

        // Wrapped intervals sort to the tail of the bottom order, and their
        // low arc [0, top) is reachable only from here: the descent turns
        // left before ever visiting them.
        for node in self.nodes.iter().rev() {
            if node.top >= node.bot || h >= node.top {
                break;
            }
            hit(node.measurement);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn overlaps(sorted: &[(u64, u32)], tau: u64, h: u64) -> Vec<u32> {
        let tree = IntervalTree::build(sorted, tau).unwrap();
        let mut found = Vec::new();
        tree.for_each_overlap(h, |m| found.push(m));
        found.sort_unstable();
        found
    }

    fn brute_overlaps(sorted: &[(u64, u32)], tau: u64, h: u64) -> Vec<u32> {
        let mut found: Vec<u32> = sorted
            .iter()
            .filter(|&&(bot, _)| interval_contains(bot, bot.wrapping_add(tau), h))
            .map(|&(_, m)| m)
            .collect();
        found.sort_unstable();
        found
    }

    #[test]
    fn test_contains_plain_interval() {
        assert!(interval_contains(10, 20, 10));
        assert!(interval_contains(10, 20, 19));
        assert!(!interval_contains(10, 20, 20));
        assert!(!interval_contains(10, 20, 9));
    }

    #[test]
    fn test_contains_wrapped_interval() {
        let bot = u64::MAX - 5;
        let top = bot.wrapping_add(10);
        assert_eq!(top, 4);
        assert!(interval_contains(bot, top, u64::MAX));
        assert!(interval_contains(bot, top, 0));
        assert!(interval_contains(bot, top, 3));
        assert!(!interval_contains(bot, top, 4));
        assert!(!interval_contains(bot, top, bot - 1));
    }

    #[test]
    fn test_contains_empty_interval() {
        assert!(!interval_contains(10, 10, 10));
    }

    #[test]
    fn test_single_node() {
        let sorted = [(100u64, 0u32)];
        assert_eq!(overlaps(&sorted, 50, 120), vec![0]);
        assert_eq!(overlaps(&sorted, 50, 150), Vec::<u32>::new());
        assert_eq!(overlaps(&sorted, 50, 99), Vec::<u32>::new());
    }

    #[test]
    fn test_two_nodes_share_parent_and_right_child() {
        // size-2 ranges link the lower bottom as parent with a right child
        let sorted = [(100u64, 0u32), (200u64, 1u32)];
        let tree = IntervalTree::build(&sorted, 150).unwrap();
        assert_eq!(tree.root, 0);
        assert_eq!(tree.nodes[0].right, Some(1));
        assert_eq!(tree.nodes[0].left, None);
    }

    #[test]
    fn test_balanced_middle_split() {
        let sorted: Vec<(u64, u32)> = (0..7).map(|i| (i as u64 * 100, i)).collect();
        let tree = IntervalTree::build(&sorted, 10).unwrap();
        assert_eq!(tree.root, 3);
        assert_eq!(tree.nodes[3].left, Some(1));
        assert_eq!(tree.nodes[3].right, Some(5));
        assert_eq!(tree.nodes[1].left, Some(0));
        assert_eq!(tree.nodes[1].right, Some(2));
    }

    #[test]
    fn test_overlapping_run_is_fully_reported() {
        // tau larger than the spacing, so neighbours overlap
        let sorted: Vec<(u64, u32)> = (0..16).map(|i| (1000 + i as u64 * 10, i)).collect();
        assert_eq!(overlaps(&sorted, 35, 1054), vec![2, 3, 4, 5]);
        assert_eq!(brute_overlaps(&sorted, 35, 1054), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_wrapped_low_arc_is_reported() {
        let sorted = [(5u64, 3u32), (u64::MAX - 10, 1), (u64::MAX - 2, 2)];
        let mut sorted = sorted;
        sorted.sort_unstable_by_key(|&(bot, _)| bot);
        // h = 1 lies in the low arcs of both wrapped intervals and below
        // no plain bottom other than measurement 3's span
        let tau = 100u64;
        assert_eq!(overlaps(&sorted, tau, 1), brute_overlaps(&sorted, tau, 1));
        assert_eq!(overlaps(&sorted, tau, 1), vec![1, 2]);
    }

    #[test]
    fn test_matches_brute_force_on_random_inputs() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for round in 0..400 {
            let m = rng.random_range(1..=64u32);
            // small, large, and near-full widths to exercise wraparound
            let tau = match round % 3 {
                0 => rng.random_range(0..1u64 << 32),
                1 => rng.random::<u64>() >> 1,
                _ => u64::MAX - rng.random_range(0..1u64 << 40),
            };
            let mut sorted: Vec<(u64, u32)> =
                (0..m).map(|i| (rng.random::<u64>(), i)).collect();
            sorted.sort_unstable_by_key(|&(bot, _)| bot);

            for _ in 0..8 {
                let h = match rng.random_range(0..3u32) {
                    0 => rng.random::<u64>(),
                    1 => sorted[rng.random_range(0..sorted.len())]
                        .0
                        .wrapping_add(rng.random_range(0..=tau.max(1))),
                    _ => rng.random_range(0..tau.max(1)),
                };
                assert_eq!(
                    overlaps(&sorted, tau, h),
                    brute_overlaps(&sorted, tau, h),
                    "m={m} tau={tau} h={h}"
                );
            }
        }
    }
}
