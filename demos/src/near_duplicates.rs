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

//! Example demonstrating near-duplicate detection with sparse sketches

use sparsesketch::sparse::Elements;
use sparsesketch::sparse::JaccardEstimate;
use sparsesketch::sparse::SparseSketcher;
use sparsesketch::sparse::gamma_for_sparsity;

fn print_similarity(estimate: JaccardEstimate) {
    match estimate {
        JaccardEstimate::Estimate(j) => println!("   Jaccard estimate: {j:.3}"),
        JaccardEstimate::NoOverlap => println!("   Jaccard estimate: saturated, no shared zeros"),
        JaccardEstimate::Identical => println!("   Jaccard estimate: sketches indistinguishable"),
    }
}

fn main() {
    println!("=== Sparse Sketch Example ===\n");

    // Example 1: near-duplicate documents compared by word multiset
    println!("1. Near-duplicate documents:");
    let left = "the quick brown fox jumps over the lazy dog near the river bank";
    let right = "the quick brown fox jumps over the lazy cat near the river bank";
    let left_tokens: Vec<&[u8]> = left.split_whitespace().map(str::as_bytes).collect();
    let right_tokens: Vec<&[u8]> = right.split_whitespace().map(str::as_bytes).collect();

    let gamma = gamma_for_sparsity(left_tokens.len() as u32).expect("non-zero sparsity");
    let sketcher = SparseSketcher::builder()
        .gamma(gamma)
        .num_bits(256)
        .seed(42)
        .build()
        .expect("valid parameters");

    let a = sketcher
        .sketch_fast(&Elements::Bytes(&left_tokens))
        .expect("sketch");
    let b = sketcher
        .sketch_fast(&Elements::Bytes(&right_tokens))
        .expect("sketch");
    println!("   Densities: {:.3} and {:.3}", a.density(), b.density());
    println!("   Hamming distance: {}", a.hamming(&b).expect("same length"));
    print_similarity(a.jaccard(&b).expect("same length"));
    println!();

    // Example 2: disjoint integer sets
    println!("2. Disjoint integer sets:");
    let evens: Vec<u32> = (0..100).map(|i| i * 2).collect();
    let odds: Vec<u32> = (0..100).map(|i| i * 2 + 1).collect();

    let gamma = gamma_for_sparsity(100).expect("non-zero sparsity");
    let sketcher = SparseSketcher::builder()
        .gamma(gamma)
        .num_bits(256)
        .seed(42)
        .build()
        .expect("valid parameters");

    let a = sketcher
        .sketch_medium(&Elements::U32(&evens))
        .expect("sketch");
    let b = sketcher.sketch_medium(&Elements::U32(&odds)).expect("sketch");
    println!("   Hamming distance: {}", a.hamming(&b).expect("same length"));
    print_similarity(a.jaccard(&b).expect("same length"));
}
