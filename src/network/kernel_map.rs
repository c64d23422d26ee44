//! Focal 1-D kernel map
//!
//! The separable attention kernel samples `kernel_size` taps along one axis.
//! Taps near the centre are dense; further out the stride grows segment by
//! segment. `kernel_loc[i]` is the one-sided tap index where segment `i`
//! ends and `kernel_stride[i]` its spacing.

use crate::config::{ConfigError, ConfigResult};
use serde::Serialize;

/// Largest `kernel_size` accepted; bounds the number of taps.
pub const MAX_KERNEL_SIZE: u32 = 255;

/// One sampled tap: pixel offset from the centre and local stride
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tap {
    pub offset: i64,
    pub stride: i64,
}

/// Full kernel map along one axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KernelMap {
    taps: Vec<Tap>,
    patch_size: u32,
}

impl KernelMap {
    /// Build the map, checking the layout constraints the operator relies on.
    pub fn build(kernel_size: u32, kernel_loc: &[u32], kernel_stride: &[u32]) -> ConfigResult<Self> {
        if kernel_loc.is_empty() {
            return Err(ConfigError::invalid("network_g.kernel_loc", "must not be empty"));
        }
        if kernel_loc.len() != kernel_stride.len() {
            return Err(ConfigError::invalid(
                "network_g.kernel_stride",
                format!(
                    "has {} entries but kernel_loc has {}",
                    kernel_stride.len(),
                    kernel_loc.len()
                ),
            ));
        }
        if kernel_size > MAX_KERNEL_SIZE {
            return Err(ConfigError::invalid(
                "network_g.kernel_size",
                format!("{kernel_size} exceeds the largest supported kernel ({MAX_KERNEL_SIZE})"),
            ));
        }
        if kernel_size % 2 == 0 {
            return Err(ConfigError::invalid(
                "network_g.kernel_size",
                format!("{kernel_size} must be odd"),
            ));
        }
        if let Some(&stride) = kernel_stride.iter().find(|&&s| s == 0) {
            return Err(ConfigError::invalid(
                "network_g.kernel_stride",
                format!("stride {stride} must be positive"),
            ));
        }

        let mut start = 1;
        for &loc in kernel_loc {
            if loc <= start {
                return Err(ConfigError::invalid(
                    "network_g.kernel_loc",
                    format!("{kernel_loc:?} must be strictly increasing and start above 1"),
                ));
            }
            start = loc;
        }

        let expected_last = kernel_size / 2 + 1;
        if start != expected_last {
            return Err(ConfigError::invalid(
                "network_g.kernel_loc",
                format!(
                    "last location is {start} but kernel_size {kernel_size} needs {expected_last}"
                ),
            ));
        }

        // One side including the centre tap.
        let mut offsets: Vec<i64> = vec![0];
        let mut strides: Vec<i64> = vec![1];
        let mut start = 1;
        for (&loc, &stride) in kernel_loc.iter().zip(kernel_stride) {
            let base = offsets[offsets.len() - 1] + strides[strides.len() - 1];
            let stride = i64::from(stride);
            for n in 0..i64::from(loc - start) {
                offsets.push(base + n * stride);
                strides.push(stride);
            }
            start = loc;
        }

        let reach = offsets[offsets.len() - 1] + strides[strides.len() - 1];
        let patch_size = u32::try_from(reach * 2 - 1).map_err(|_| {
            ConfigError::invalid("network_g.kernel_stride", "kernel reach overflows")
        })?;

        let taps = offsets
            .iter()
            .zip(&strides)
            .skip(1)
            .rev()
            .map(|(&offset, &stride)| Tap { offset: -offset, stride })
            .chain(
                offsets
                    .iter()
                    .zip(&strides)
                    .map(|(&offset, &stride)| Tap { offset, stride }),
            )
            .collect();

        Ok(Self { taps, patch_size })
    }

    pub fn taps(&self) -> &[Tap] {
        &self.taps
    }

    /// Receptive field in pixels covered by one kernel application.
    pub fn patch_size(&self) -> u32 {
        self.patch_size
    }

    pub fn offsets(&self) -> Vec<i64> {
        self.taps.iter().map(|tap| tap.offset).collect()
    }
}
