//! LAMNet generator checks and derived architecture facts
//!
//! The network itself runs in the external framework; this module only
//! verifies that `network_g` describes a model that can be instantiated and
//! reports what it would look like.

mod kernel_map;
mod params;

pub use kernel_map::{KernelMap, Tap, MAX_KERNEL_SIZE};
pub use params::LayerDims;

use crate::config::{ConfigError, ConfigResult, NetworkSpec};
use serde::Serialize;

/// Instantiable LAMNet description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LamNetPlan {
    pub kernel_map: KernelMap,
    /// Channels per attention head group
    pub head_channels: u32,
    /// FFN hidden channels (`floor(dim * expansion_factor)`)
    pub hidden_channels: u32,
    pub upscale: u32,
    pub parameters: u64,
}

impl LamNetPlan {
    /// Check the hyperparameters and derive the plan.
    pub fn from_spec(spec: &NetworkSpec) -> ConfigResult<Self> {
        for (field, value) in [
            ("network_g.in_chans", spec.in_chans),
            ("network_g.num_blocks", spec.num_blocks),
            ("network_g.num_groups", spec.num_groups),
            ("network_g.num_head", spec.num_head),
            ("network_g.upscale", spec.upscale),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be positive"));
            }
        }

        if spec.dim == 0 || spec.dim % 4 != 0 {
            return Err(ConfigError::invalid(
                "network_g.dim",
                format!("{} must be a positive multiple of 4", spec.dim),
            ));
        }
        let head_split = spec.num_head.checked_mul(2).ok_or_else(|| {
            ConfigError::invalid("network_g.num_head", format!("{} is too large", spec.num_head))
        })?;
        if spec.dim % head_split != 0 {
            return Err(ConfigError::invalid(
                "network_g.dim",
                format!("{} is not divisible by 2 * num_head ({head_split})", spec.dim),
            ));
        }
        if !(spec.expansion_factor > 0.0) {
            return Err(ConfigError::invalid(
                "network_g.expansion_factor",
                format!("{} must be positive", spec.expansion_factor),
            ));
        }
        let hidden = (f64::from(spec.dim) * spec.expansion_factor).floor();
        if hidden < 1.0 || hidden > f64::from(u32::MAX) {
            return Err(ConfigError::invalid(
                "network_g.expansion_factor",
                format!("gives {hidden} hidden channels"),
            ));
        }
        let hidden_channels = hidden as u32;

        if !(spec.img_range > 0.0) {
            return Err(ConfigError::invalid(
                "network_g.img_range",
                format!("{} must be positive", spec.img_range),
            ));
        }

        let kernel_map = KernelMap::build(spec.kernel_size, &spec.kernel_loc, &spec.kernel_stride)?;

        let dims = LayerDims {
            in_chans: u64::from(spec.in_chans),
            dim: u64::from(spec.dim),
            num_blocks: u64::from(spec.num_blocks),
            num_groups: u64::from(spec.num_groups),
            num_head: u64::from(spec.num_head),
            kernel_size: u64::from(spec.kernel_size),
            patch_size: u64::from(kernel_map.patch_size()),
            hidden: u64::from(hidden_channels),
            upscale: u64::from(spec.upscale),
        };

        Ok(Self {
            head_channels: spec.dim / spec.num_head / 2,
            hidden_channels,
            upscale: spec.upscale,
            parameters: params::count(&dims).ok_or_else(|| {
                ConfigError::invalid("network_g.dim", "parameter count overflows a 64-bit integer")
            })?,
            kernel_map,
        })
    }
}
