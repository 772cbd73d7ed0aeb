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

//! Sparse bit-sketch implementation for approximate set similarity.
//!
//! A sparse sketch summarizes a multiset as `m` bits, each set when one
//! randomized measurement detects a hash collision against the input. Two
//! sketches built with the same bit length and density can then estimate
//! the Jaccard similarity and Hamming distance of the original sets
//! without touching them again.
//!
//! # Usage
//!
//! ```rust
//! use sparsesketch::sparse::Elements;
//! use sparsesketch::sparse::SparseSketcher;
//! use sparsesketch::sparse::gamma_for_sparsity;
//!
//! let sketcher = SparseSketcher::builder()
//!     .gamma(gamma_for_sparsity(4).unwrap())
//!     .num_bits(128)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let left = [10u32, 20, 30, 40];
//! let right = [10u32, 20, 30, 99];
//! let a = sketcher.sketch_fast(&Elements::U32(&left)).unwrap();
//! let b = sketcher.sketch_fast(&Elements::U32(&right)).unwrap();
//!
//! let distance = a.hamming(&b).unwrap();
//! assert!(distance <= 128);
//! ```
//!
//! # Strategies
//!
//! Three construction strategies produce statistically interchangeable
//! sketches:
//!
//! - [`SparseSketcher::sketch`] hashes every element once per measurement;
//! - [`SparseSketcher::sketch_medium`] hashes every element once in total
//!   and scans the measurement intervals linearly;
//! - [`SparseSketcher::sketch_fast`] replaces the linear scan with a
//!   balanced interval tree.

mod estimator;
mod interval_tree;
mod sketch;

pub use self::estimator::JaccardEstimate;
pub use self::estimator::hamming_distance;
pub use self::estimator::jaccard_estimate;
pub use self::sketch::Elements;
pub use self::sketch::SparseSketch;
pub use self::sketch::SparseSketcher;
pub use self::sketch::SparseSketcherBuilder;
pub use self::sketch::gamma_for_sparsity;
