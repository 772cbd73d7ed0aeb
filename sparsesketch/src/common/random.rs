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

//! Shared random utilities for sketches.

/// Random number source for sketch construction.
///
/// Sketch construction draws its seeds and interval bounds from a source
/// that is re-created from the caller's seed on every call, so the same
/// seed always reproduces the same sketch. Statistical uniformity is all
/// that is required; none of this is cryptographic.
pub trait RandomSource {
    /// Returns the next random 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Returns the next random 64-bit value, composed of two successive
    /// 32-bit draws: the first draw fills the low word, the second the high.
    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_u32());
        let high = u64::from(self.next_u32());
        (high << 32) | low
    }
}

/// Xorshift-based random generator for sketch operations.
#[derive(Debug, Clone, Copy)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Creates a new generator using the provided seed.
    pub fn seeded(seed: u32) -> Self {
        // Xorshift has a fixed point at zero.
        let state = if seed == 0 { 0x9e37_79b9 } else { seed };
        Self { state }
    }
}

impl RandomSource for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
