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

use googletest::assert_that;
use googletest::prelude::near;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sparsesketch::sparse::Elements;
use sparsesketch::sparse::JaccardEstimate;
use sparsesketch::sparse::SparseSketch;
use sparsesketch::sparse::SparseSketcher;
use sparsesketch::sparse::gamma_for_sparsity;

fn sketcher(gamma: f64, num_bits: u32, seed: u32) -> SparseSketcher {
    SparseSketcher::builder()
        .gamma(gamma)
        .num_bits(num_bits)
        .seed(seed)
        .build()
        .unwrap()
}

fn sketch_with(strategy: usize, sketcher: &SparseSketcher, input: &Elements<'_>) -> SparseSketch {
    match strategy {
        0 => sketcher.sketch(input),
        1 => sketcher.sketch_medium(input),
        _ => sketcher.sketch_fast(input),
    }
    .unwrap()
}

#[test]
fn test_medium_and_fast_are_bit_identical() {
    let mut rng = StdRng::seed_from_u64(0x5a5a);
    for _ in 0..40 {
        let num_bits = rng.random_range(1..=300u32);
        let gamma = rng.random_range(0.01..0.99f64);
        let seed = rng.random::<u32>();
        let count = rng.random_range(0..=200usize);
        let values: Vec<u32> = (0..count).map(|_| rng.random()).collect();

        let sketcher = sketcher(gamma, num_bits, seed);
        let input = Elements::U32(&values);
        assert_eq!(
            sketcher.sketch_medium(&input).unwrap(),
            sketcher.sketch_fast(&input).unwrap(),
            "gamma={gamma} num_bits={num_bits} seed={seed}"
        );
    }
}

#[test]
fn test_medium_and_fast_agree_under_heavy_wraparound() {
    // gamma close to 1 makes most intervals wrap past the top of the space
    let values: Vec<u32> = (0..64).collect();
    let input = Elements::U32(&values);
    for seed in 0..10 {
        let sketcher = sketcher(0.97, 128, seed);
        assert_eq!(
            sketcher.sketch_medium(&input).unwrap(),
            sketcher.sketch_fast(&input).unwrap()
        );
    }
}

#[test]
fn test_strategies_are_reproducible_and_seed_sensitive() {
    let values: Vec<u32> = (0..50).collect();
    let input = Elements::U32(&values);
    // tuned gamma keeps the sketches near half density, so two seeds
    // cannot collapse onto the same saturated bit pattern
    let gamma = gamma_for_sparsity(50).unwrap();
    for strategy in 0..3 {
        let first = sketch_with(strategy, &sketcher(gamma, 256, 1), &input);
        let again = sketch_with(strategy, &sketcher(gamma, 256, 1), &input);
        let other = sketch_with(strategy, &sketcher(gamma, 256, 2), &input);
        assert_eq!(first, again);
        assert_ne!(first, other);
    }
}

#[test]
fn test_one_bit_fraction_converges() {
    // with gamma tuned to the input size, the expected fraction of set
    // bits is 1 - (1 - gamma)^n = 0.5
    let values: Vec<u32> = (0..32).collect();
    let input = Elements::U32(&values);
    let gamma = gamma_for_sparsity(32).unwrap();
    let expected = 1.0 - (1.0 - gamma).powi(32);
    assert_that!(expected, near(0.5, 1e-12));

    const TRIALS: u32 = 300;
    for strategy in 0..3 {
        let mut total = 0.0;
        for seed in 0..TRIALS {
            let sketcher = sketcher(gamma, 256, seed);
            total += sketch_with(strategy, &sketcher, &input).density();
        }
        assert_that!(total / f64::from(TRIALS), near(expected, 0.05));
    }
}

#[test]
fn test_self_similarity_saturates_at_one() {
    let values: Vec<u32> = (0..100).collect();
    let input = Elements::U32(&values);
    let sketcher = sketcher(gamma_for_sparsity(100).unwrap(), 64, 123);
    for strategy in 0..3 {
        let sketch = sketch_with(strategy, &sketcher, &input);
        // a mixed sketch keeps the estimator away from its boundaries
        assert!(sketch.count_ones() > 0);
        assert!(sketch.count_ones() < sketch.bit_len());
        assert_eq!(sketch.jaccard(&sketch).unwrap(), JaccardEstimate::Estimate(1.0));
        assert_eq!(sketch.hamming(&sketch).unwrap(), 0);
    }
}

#[test]
fn test_disjoint_sets_end_to_end() {
    let left: Vec<u32> = (0..100).collect();
    let right: Vec<u32> = (1000..1100).collect();
    let gamma = gamma_for_sparsity(100).unwrap();

    const TRIALS: u32 = 50;
    for strategy in [0, 2] {
        let mut jaccard_total = 0.0;
        let mut estimates = 0u32;
        let mut hamming_total = 0u32;
        for seed in 0..TRIALS {
            let sketcher = sketcher(gamma, 64, seed);
            let a = sketch_with(strategy, &sketcher, &Elements::U32(&left));
            let b = sketch_with(strategy, &sketcher, &Elements::U32(&right));

            let distance = a.hamming(&b).unwrap();
            assert!(distance > 0);
            assert!(distance <= 64);
            hamming_total += distance;

            if let JaccardEstimate::Estimate(j) = a.jaccard(&b).unwrap() {
                jaccard_total += j;
                estimates += 1;
            }
        }

        // both sketches sit near half density, so disagreement covers
        // about half the bits and the similarity estimate stays near zero
        assert!(estimates >= TRIALS * 9 / 10);
        assert_that!(jaccard_total / f64::from(estimates), near(0.0, 0.2));
        assert_that!(
            f64::from(hamming_total) / f64::from(TRIALS),
            near(32.0, 10.0)
        );
    }
}

#[test]
fn test_string_and_integer_inputs_share_the_pipeline() {
    let words = ["alpha", "beta", "gamma", "delta", "epsilon"];
    let tokens: Vec<&[u8]> = words.iter().map(|w| w.as_bytes()).collect();
    let sketcher = sketcher(gamma_for_sparsity(5).unwrap(), 128, 9);

    let from_bytes = sketcher.sketch_fast(&Elements::Bytes(&tokens)).unwrap();
    assert!(from_bytes.count_ones() > 0);
    assert_eq!(
        from_bytes.jaccard(&from_bytes).unwrap(),
        JaccardEstimate::Estimate(1.0)
    );

    let values: Vec<u16> = (0..500).collect();
    let from_ints = sketcher.sketch_medium(&Elements::U16(&values)).unwrap();
    assert_eq!(from_ints.bit_len(), 128);
}
