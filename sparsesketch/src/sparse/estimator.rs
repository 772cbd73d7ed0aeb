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

//! Similarity estimation from sketch bit statistics.
//!
//! Both estimators operate on raw packed buffers so sketches produced
//! elsewhere can be compared as long as they share a bit length. When the
//! bit length is not a multiple of 8, the unused low-order bits of the
//! final byte are treated as ones for zero counting and masked out of the
//! distance, so padding content never influences a result.

use crate::error::Error;
use crate::error::ErrorKind;

/// Result of the Jaccard estimator.
///
/// The closed form divides by `ln(z_and / bit_len)` where `z_and` counts
/// the positions zero in both sketches, so it is undefined at the two
/// boundaries; those are reported as distinguished variants rather than a
/// NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JaccardEstimate {
    /// The similarity estimate.
    Estimate(f64),
    /// No position is zero in both sketches. The sketches are saturated
    /// and carry no overlap information.
    NoOverlap,
    /// Every position is zero in both sketches; the inputs are
    /// indistinguishable to the estimator.
    Identical,
}

impl JaccardEstimate {
    /// Returns the numeric estimate, or `None` for the saturated cases.
    pub fn value(self) -> Option<f64> {
        match self {
            JaccardEstimate::Estimate(value) => Some(value),
            _ => None,
        }
    }
}

/// Estimates the Jaccard similarity of the sets behind two sketches.
///
/// Counts the positions where each sketch is zero (`z1`, `z2`) and where
/// both are (`z_and`), then evaluates
/// `ln(z1 * z2 / (z_and * bit_len)) / ln(z_and / bit_len)`, modeling every
/// bit as an independent Bernoulli trial whose zero probability depends on
/// the underlying overlap. Two identical sketches with both zeros and ones
/// estimate exactly 1.0.
///
/// # Errors
///
/// Returns an error if `bit_len` is zero or either buffer is not exactly
/// `ceil(bit_len / 8)` bytes.
///
/// # Examples
///
/// ```
/// use sparsesketch::sparse::JaccardEstimate;
/// use sparsesketch::sparse::jaccard_estimate;
///
/// let estimate = jaccard_estimate(&[0b1100_0000], &[0b1100_0000], 8).unwrap();
/// assert_eq!(estimate, JaccardEstimate::Estimate(1.0));
///
/// // saturated: no shared zero position
/// let estimate = jaccard_estimate(&[0b1111_0000], &[0b0000_1111], 8).unwrap();
/// assert_eq!(estimate, JaccardEstimate::NoOverlap);
/// ```
pub fn jaccard_estimate(
    sketch_a: &[u8],
    sketch_b: &[u8],
    bit_len: u32,
) -> Result<JaccardEstimate, Error> {
    let (full, extra) = checked_layout(sketch_a, sketch_b, bit_len)?;

    let mut zeros_a = 0u32;
    let mut zeros_b = 0u32;
    let mut zeros_both = 0u32;
    for i in 0..full {
        let za = !sketch_a[i];
        let zb = !sketch_b[i];
        zeros_a += za.count_ones();
        zeros_b += zb.count_ones();
        zeros_both += (za & zb).count_ones();
    }
    if extra != 0 {
        // padding reads as ones, so it never counts as a zero position
        let pad = 0xFFu8 >> extra;
        let za = !(sketch_a[full] | pad);
        let zb = !(sketch_b[full] | pad);
        zeros_a += za.count_ones();
        zeros_b += zb.count_ones();
        zeros_both += (za & zb).count_ones();
    }

    if zeros_both == 0 {
        return Ok(JaccardEstimate::NoOverlap);
    }
    if zeros_both == bit_len {
        return Ok(JaccardEstimate::Identical);
    }

    let total = f64::from(bit_len);
    let ratio = (f64::from(zeros_a) * f64::from(zeros_b)) / (f64::from(zeros_both) * total);
    Ok(JaccardEstimate::Estimate(
        ratio.ln() / (f64::from(zeros_both) / total).ln(),
    ))
}

/// Returns the Hamming distance between two sketches.
///
/// The population count of the bitwise XOR over the first `bit_len` bits;
/// always in `[0, bit_len]`.
///
/// # Errors
///
/// Returns an error if `bit_len` is zero or either buffer is not exactly
/// `ceil(bit_len / 8)` bytes.
///
/// # Examples
///
/// ```
/// use sparsesketch::sparse::hamming_distance;
///
/// assert_eq!(hamming_distance(&[0b1010_0000], &[0b0110_0000], 8).unwrap(), 2);
/// ```
pub fn hamming_distance(sketch_a: &[u8], sketch_b: &[u8], bit_len: u32) -> Result<u32, Error> {
    let (full, extra) = checked_layout(sketch_a, sketch_b, bit_len)?;

    let mut distance = 0u32;
    for i in 0..full {
        distance += (sketch_a[i] ^ sketch_b[i]).count_ones();
    }
    if extra != 0 {
        let keep = !(0xFFu8 >> extra);
        distance += ((sketch_a[full] ^ sketch_b[full]) & keep).count_ones();
    }
    Ok(distance)
}

/// Validates the buffers against `bit_len`; returns the full byte count
/// and the number of meaningful bits in the trailing partial byte.
fn checked_layout(sketch_a: &[u8], sketch_b: &[u8], bit_len: u32) -> Result<(usize, u8), Error> {
    if bit_len == 0 {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            "bit_len must be at least 1",
        ));
    }
    let expected = (bit_len as usize).div_ceil(8);
    if sketch_a.len() != expected || sketch_b.len() != expected {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            "sketch buffers do not match the bit length",
        )
        .with_context("expected_bytes", expected)
        .with_context("left_bytes", sketch_a.len())
        .with_context("right_bytes", sketch_b.len()));
    }
    Ok(((bit_len / 8) as usize, (bit_len % 8) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_zero_counts() {
        // a = 1100_0000: zeros at 2..8; b = 1010_0000: zeros at 1, 3..8
        // z1 = 6, z2 = 6, z_and = 5
        let estimate = jaccard_estimate(&[0b1100_0000], &[0b1010_0000], 8)
            .unwrap()
            .value()
            .unwrap();
        let expected = (36.0f64 / 40.0).ln() / 0.625f64.ln();
        assert!((estimate - expected).abs() < 1e-12);
        assert!((estimate - 0.224_17).abs() < 1e-4);
    }

    #[test]
    fn test_saturated_sentinels() {
        assert_eq!(
            jaccard_estimate(&[0xFF], &[0xFF], 8).unwrap(),
            JaccardEstimate::NoOverlap
        );
        assert_eq!(
            jaccard_estimate(&[0x00], &[0x00], 8).unwrap(),
            JaccardEstimate::Identical
        );
    }

    #[test]
    fn test_partial_byte_sentinels_ignore_padding() {
        // 4 meaningful bits, all set; padding left dirty in one buffer
        assert_eq!(
            jaccard_estimate(&[0b1111_0101], &[0b1111_0000], 4).unwrap(),
            JaccardEstimate::NoOverlap
        );
        // 4 meaningful bits, all zero
        assert_eq!(
            jaccard_estimate(&[0b0000_1111], &[0b0000_0000], 4).unwrap(),
            JaccardEstimate::Identical
        );
    }

    #[test]
    fn test_hamming_masks_padding() {
        assert_eq!(hamming_distance(&[0b1010_1111], &[0b1010_0000], 4).unwrap(), 0);
        assert_eq!(hamming_distance(&[0b1010_0000], &[0b0101_1111], 4).unwrap(), 4);
    }

    #[test]
    fn test_rejects_bad_layout() {
        let err = jaccard_estimate(&[0, 0], &[0, 0, 0], 16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = hamming_distance(&[0], &[0], 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = jaccard_estimate(&[0], &[0], 16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
