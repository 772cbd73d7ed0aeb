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

use rayon::prelude::*;

use crate::common::RandomSource;
use crate::common::XorShift32;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::hash::murmur3_low64;
use crate::sparse::estimator;
use crate::sparse::estimator::JaccardEstimate;
use crate::sparse::interval_tree::IntervalTree;
use crate::sparse::interval_tree::interval_contains;

const DEFAULT_NUM_BITS: u32 = 256;
const DEFAULT_GAMMA: f64 = 0.5;
const DEFAULT_SEED: u32 = 9001;

/// Returns the density parameter that maximizes the per-bit entropy of a
/// sketch whose expected input size is `sparsity` elements.
///
/// Computed as `1 - 2^(-1/sparsity)`; `gamma_for_sparsity(1)` is exactly
/// `0.5`.
///
/// # Errors
///
/// Returns an error if `sparsity` is zero.
///
/// # Examples
///
/// ```
/// # use sparsesketch::sparse::gamma_for_sparsity;
/// assert_eq!(gamma_for_sparsity(1).unwrap(), 0.5);
/// assert!(gamma_for_sparsity(100).unwrap() < 0.01);
/// ```
pub fn gamma_for_sparsity(sparsity: u32) -> Result<f64, Error> {
    if sparsity == 0 {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            "sparsity must be at least 1",
        ));
    }
    Ok(1.0 - 2f64.powf(-1.0 / f64::from(sparsity)))
}

/// Input multiset for one sketch call.
///
/// One sketch call consumes a homogeneous sequence of elements: byte
/// strings of arbitrary lengths, or fixed-width integers hashed through
/// their little-endian representation. The variant is inspected once per
/// construction phase, not per element.
#[derive(Debug, Clone, Copy)]
pub enum Elements<'a> {
    /// Byte strings with explicit lengths.
    Bytes(&'a [&'a [u8]]),
    /// 16-bit integers.
    U16(&'a [u16]),
    /// 32-bit integers.
    U32(&'a [u32]),
}

impl Elements<'_> {
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        match self {
            Elements::Bytes(items) => items.len(),
            Elements::U16(values) => values.len(),
            Elements::U32(values) => values.len(),
        }
    }

    /// Returns whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether any element's hash under `seed` falls below the
    /// floating-point threshold `tau`. The scan stops at the first hit.
    fn any_hash_below(&self, seed: u32, tau: f64) -> bool {
        match self {
            Elements::Bytes(items) => items
                .iter()
                .any(|item| (murmur3_low64(item, seed) as f64) < tau),
            Elements::U16(values) => values
                .iter()
                .any(|value| (murmur3_low64(&value.to_le_bytes(), seed) as f64) < tau),
            Elements::U32(values) => values
                .iter()
                .any(|value| (murmur3_low64(&value.to_le_bytes(), seed) as f64) < tau),
        }
    }

    /// Hashes every element once under `seed`, in input order.
    fn hash_cache(&self, seed: u32) -> Result<Vec<u64>, Error> {
        let mut hashes = Vec::new();
        hashes
            .try_reserve_exact(self.len())
            .map_err(|e| Error::allocation("element hash cache", e))?;
        hashes.resize(self.len(), 0u64);

        match self {
            Elements::Bytes(items) => hashes
                .par_iter_mut()
                .zip(items.par_iter())
                .for_each(|(slot, item)| *slot = murmur3_low64(item, seed)),
            Elements::U16(values) => hashes
                .par_iter_mut()
                .zip(values.par_iter())
                .for_each(|(slot, value)| *slot = murmur3_low64(&value.to_le_bytes(), seed)),
            Elements::U32(values) => hashes
                .par_iter_mut()
                .zip(values.par_iter())
                .for_each(|(slot, value)| *slot = murmur3_low64(&value.to_le_bytes(), seed)),
        }

        Ok(hashes)
    }
}

/// Configured constructor for sparse bit sketches.
///
/// A sketcher holds the parameters every sketch it produces shares: the
/// density `gamma`, the sketch size in bits, and the seed that makes the
/// construction reproducible. Three strategies trade hashing cost against
/// comparison cost; sketches from different strategies are comparable as
/// long as `gamma` and the bit length match.
///
/// Use [`SparseSketcherBuilder`] to construct instances.
///
/// # Examples
///
/// ```
/// use sparsesketch::sparse::Elements;
/// use sparsesketch::sparse::SparseSketcher;
///
/// let sketcher = SparseSketcher::builder()
///     .num_bits(64)
///     .seed(7)
///     .build()
///     .unwrap();
///
/// let values = [1u32, 2, 3, 4, 5];
/// let sketch = sketcher.sketch(&Elements::U32(&values)).unwrap();
/// assert_eq!(sketch.bit_len(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct SparseSketcher {
    gamma: f64,
    num_bits: u32,
    seed: u32,
}

impl SparseSketcher {
    /// Returns a builder for creating a sketcher.
    pub fn builder() -> SparseSketcherBuilder {
        SparseSketcherBuilder::default()
    }

    /// Returns the density parameter.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Returns the sketch size in bits.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Returns the construction seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    // ========================================================================
    // Construction Strategies
    // ========================================================================

    /// Computes the sketch with one independent hash seed per measurement.
    ///
    /// Each measurement draws its own 32-bit seed and scans the input until
    /// an element's hash falls below the acceptance threshold
    /// `gamma * 2^64`; the first collision sets the measurement's bit and
    /// ends its scan. Costs `O(n * m)` hash evaluations and is the
    /// statistical baseline the other strategies approximate.
    ///
    /// Measurements are independent and run in parallel; each one owns its
    /// result slot and the bits are packed into bytes after the join.
    ///
    /// # Errors
    ///
    /// Returns an error if a working buffer cannot be allocated.
    pub fn sketch(&self, input: &Elements<'_>) -> Result<SparseSketch, Error> {
        let mut rng = XorShift32::seeded(self.seed);
        let m = self.num_bits as usize;

        let mut seeds = Vec::new();
        seeds
            .try_reserve_exact(m)
            .map_err(|e| Error::allocation("measurement seed table", e))?;
        for _ in 0..m {
            seeds.push(rng.next_u32());
        }

        let tau = self.gamma * u64::MAX as f64;
        let hits: Vec<bool> = seeds
            .par_iter()
            .map(|&seed| input.any_hash_below(seed, tau))
            .collect();
        self.pack_hits(&hits)
    }

    /// Computes the sketch with one hash per element and a linear interval
    /// scan per measurement.
    ///
    /// Every measurement becomes a random interval of width
    /// `gamma * 2^64` in the hash-value space, and each element is hashed
    /// exactly once, seeded by the first interval bottom. A measurement's
    /// bit is set when any element hash lands in its interval, honoring
    /// wraparound. Costs `O(n)` hash evaluations plus `O(n * m)`
    /// comparisons.
    ///
    /// All measurements observe the same per-element hash, so their
    /// collision decisions are correlated through it; the intervals are
    /// still placed independently, which keeps each bit's marginal
    /// distribution intact.
    ///
    /// # Errors
    ///
    /// Returns an error if a working buffer cannot be allocated.
    pub fn sketch_medium(&self, input: &Elements<'_>) -> Result<SparseSketch, Error> {
        let (bots, tau) = self.draw_interval_bottoms()?;
        let hashes = input.hash_cache(bots[0] as u32)?;

        let hits: Vec<bool> = bots
            .par_iter()
            .map(|&bot| {
                let top = bot.wrapping_add(tau);
                hashes.iter().any(|&h| interval_contains(bot, top, h))
            })
            .collect();
        self.pack_hits(&hits)
    }

    /// Computes the sketch with one hash per element and an interval tree.
    ///
    /// Draws the same intervals and element hashes as [`sketch_medium`],
    /// then sorts the interval bottoms into a balanced search tree and
    /// descends it once per element, setting the bit of every interval the
    /// hash lands in. Costs `O(n)` hash evaluations plus `O(n log m)`
    /// expected descents; produces bit-identical output to
    /// [`sketch_medium`].
    ///
    /// The descent phase expands across overlapping intervals and may set
    /// several bits per element, so it runs sequentially over the element
    /// hashes.
    ///
    /// [`sketch_medium`]: Self::sketch_medium
    ///
    /// # Errors
    ///
    /// Returns an error if a working buffer cannot be allocated.
    pub fn sketch_fast(&self, input: &Elements<'_>) -> Result<SparseSketch, Error> {
        let (bots, tau) = self.draw_interval_bottoms()?;
        let hashes = input.hash_cache(bots[0] as u32)?;

        let mut order = Vec::new();
        order
            .try_reserve_exact(bots.len())
            .map_err(|e| Error::allocation("sorted interval table", e))?;
        order.extend(bots.iter().copied().zip(0u32..));
        order.sort_unstable_by_key(|&(bot, _)| bot);

        let tree = IntervalTree::build(&order, tau)?;
        let mut bits = zeroed_bits(self.num_bits)?;
        for &h in &hashes {
            tree.for_each_overlap(h, |measurement| set_bit(&mut bits, measurement as usize));
        }
        Ok(SparseSketch {
            bits,
            bit_len: self.num_bits,
        })
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Draws one interval bottom per measurement and the shared width.
    fn draw_interval_bottoms(&self) -> Result<(Vec<u64>, u64), Error> {
        let mut rng = XorShift32::seeded(self.seed);
        let m = self.num_bits as usize;

        let mut bots = Vec::new();
        bots.try_reserve_exact(m)
            .map_err(|e| Error::allocation("interval bottom table", e))?;
        for _ in 0..m {
            bots.push(rng.next_u64());
        }

        let tau = (self.gamma * u64::MAX as f64) as u64;
        Ok((bots, tau))
    }

    fn pack_hits(&self, hits: &[bool]) -> Result<SparseSketch, Error> {
        let mut bits = zeroed_bits(self.num_bits)?;
        for (index, &hit) in hits.iter().enumerate() {
            if hit {
                set_bit(&mut bits, index);
            }
        }
        Ok(SparseSketch {
            bits,
            bit_len: self.num_bits,
        })
    }
}

fn zeroed_bits(num_bits: u32) -> Result<Vec<u8>, Error> {
    let len = (num_bits as usize).div_ceil(8);
    let mut bits = Vec::new();
    bits.try_reserve_exact(len)
        .map_err(|e| Error::allocation("sketch bit buffer", e))?;
    bits.resize(len, 0u8);
    Ok(bits)
}

/// Bits are packed most-significant-bit first.
#[inline]
fn set_bit(bits: &mut [u8], index: usize) {
    bits[index / 8] |= 0x80 >> (index % 8);
}

// ============================================================================
// Sketch
// ============================================================================

/// An immutable sparse bit sketch.
///
/// Bit `i` is 1 iff measurement `i` detected a hash collision against the
/// input set. Bits are packed most-significant-bit first into
/// `ceil(bit_len / 8)` bytes; unused low-order bits of the final byte are
/// always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseSketch {
    bits: Vec<u8>,
    bit_len: u32,
}

impl SparseSketch {
    /// Returns the number of meaningful bits.
    pub fn bit_len(&self) -> u32 {
        self.bit_len
    }

    /// Returns the packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Returns bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= bit_len()`.
    pub fn bit(&self, index: u32) -> bool {
        assert!(index < self.bit_len, "bit index out of range");
        self.bits[(index / 8) as usize] & (0x80 >> (index % 8)) != 0
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.bits.iter().map(|byte| byte.count_ones()).sum()
    }

    /// Returns the fraction of set bits.
    pub fn density(&self) -> f64 {
        f64::from(self.count_ones()) / f64::from(self.bit_len)
    }

    /// Estimates the Jaccard similarity of the underlying sets.
    ///
    /// # Errors
    ///
    /// Returns an error if the sketches have different bit lengths.
    pub fn jaccard(&self, other: &SparseSketch) -> Result<JaccardEstimate, Error> {
        self.check_comparable(other)?;
        estimator::jaccard_estimate(&self.bits, &other.bits, self.bit_len)
    }

    /// Returns the Hamming distance between the two sketches.
    ///
    /// # Errors
    ///
    /// Returns an error if the sketches have different bit lengths.
    pub fn hamming(&self, other: &SparseSketch) -> Result<u32, Error> {
        self.check_comparable(other)?;
        estimator::hamming_distance(&self.bits, &other.bits, self.bit_len)
    }

    fn check_comparable(&self, other: &SparseSketch) -> Result<(), Error> {
        if self.bit_len != other.bit_len {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "sketch bit lengths differ",
            )
            .with_context("left_bits", self.bit_len)
            .with_context("right_bits", other.bit_len));
        }
        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`SparseSketcher`] instances.
///
/// # Examples
///
/// ```
/// use sparsesketch::sparse::SparseSketcher;
///
/// let sketcher = SparseSketcher::builder()
///     .gamma(0.02)
///     .num_bits(128)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(sketcher.num_bits(), 128);
/// ```
#[derive(Debug, Clone)]
pub struct SparseSketcherBuilder {
    gamma: f64,
    num_bits: u32,
    seed: u32,
}

impl Default for SparseSketcherBuilder {
    fn default() -> Self {
        SparseSketcherBuilder {
            gamma: DEFAULT_GAMMA,
            num_bits: DEFAULT_NUM_BITS,
            seed: DEFAULT_SEED,
        }
    }
}

impl SparseSketcherBuilder {
    /// Sets the density parameter (default: 0.5).
    ///
    /// `gamma` is the fraction of the hash-value space each measurement
    /// accepts; [`gamma_for_sparsity`] picks the entropy-maximizing value
    /// for an expected input size.
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the sketch size in bits (default: 256).
    pub fn num_bits(mut self, num_bits: u32) -> Self {
        self.num_bits = num_bits;
        self
    }

    /// Sets the construction seed (default: 9001).
    ///
    /// Sketches are reproducible: the same seed, parameters, and input
    /// always produce the same bits.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the sketcher.
    ///
    /// # Errors
    ///
    /// Returns an error if `gamma` is not in the open interval `(0, 1)` or
    /// `num_bits` is zero.
    pub fn build(self) -> Result<SparseSketcher, Error> {
        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "gamma must lie in the open interval (0, 1)",
            )
            .with_context("gamma", self.gamma));
        }
        if self.num_bits == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "num_bits must be at least 1",
            ));
        }
        Ok(SparseSketcher {
            gamma: self.gamma,
            num_bits: self.num_bits,
            seed: self.seed,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
