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

//! Keyed hash primitive shared by the sketch strategies.

/// Returns the low 64 bits of the MurmurHash3 x64-128 digest of `bytes`
/// under `seed`.
///
/// The sketch strategies only consume the first word of the 128-bit
/// digest; good statistical uniformity is required but no cryptographic
/// property is.
#[inline]
pub fn murmur3_low64(bytes: &[u8], seed: u32) -> u64 {
    let (low, _high) = mur3::murmurhash3_x64_128(bytes, seed);
    low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        let key = "The quick brown fox jumps over the lazy dog";
        assert_eq!(murmur3_low64(key.as_bytes(), 0), 0xe34bbc7bbc071b6c);

        // one changed bit flips roughly half the output
        let key = "The quick brown fox jumps over the lazy eog";
        assert_eq!(murmur3_low64(key.as_bytes(), 0), 0x362108102c62d1c9);

        // remainder of exactly 8 bytes
        let key = "The quick brown fox jumps over the lazy1";
        assert_eq!(murmur3_low64(key.as_bytes(), 0), 0xe3301a827e5cdfe3);
    }

    #[test]
    fn test_seed_changes_digest() {
        let key = b"near-duplicate record";
        assert_ne!(murmur3_low64(key, 1), murmur3_low64(key, 2));
    }

    #[test]
    fn test_deterministic() {
        let key = b"abcdef";
        assert_eq!(murmur3_low64(key, 77), murmur3_low64(key, 77));
    }
}
