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

//! Sparse probabilistic bit sketches for approximate set similarity.
//!
//! This crate computes compact bit sketches of large multisets so that two
//! sketches can estimate the Jaccard similarity and Hamming distance of
//! the original sets without comparing them directly. It targets workloads
//! where pairwise set comparison is infeasible: near-duplicate detection,
//! record deduplication, and clustering over large feature sets.
//!
//! See the [`sparse`] module for the sketch constructors and estimators.

pub mod common;
pub mod error;
pub mod hash;
pub mod sparse;
