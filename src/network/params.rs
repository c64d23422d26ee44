//! Learnable-parameter count of a configured LAMNet
//!
//! Counts weights and biases of every convolution plus the per-channel
//! norm and residual scales, following the layer layout of the model:
//! shallow conv → `num_groups` × (`num_blocks` × [LSA mixer, DGFN]) → tail
//! conv → one-step pixel-shuffle upsampler.

/// Layer dimensions needed for counting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerDims {
    pub in_chans: u64,
    pub dim: u64,
    pub num_blocks: u64,
    pub num_groups: u64,
    pub num_head: u64,
    pub kernel_size: u64,
    pub patch_size: u64,
    pub hidden: u64,
    pub upscale: u64,
}

fn conv(in_ch: u64, out_ch: u64, kernel_area: u64) -> Option<u64> {
    in_ch.checked_mul(out_ch)?.checked_mul(kernel_area)?.checked_add(out_ch)
}

fn depthwise(channels: u64, kernel_area: u64) -> Option<u64> {
    channels.checked_mul(kernel_area)?.checked_add(channels)
}

fn sum(parts: &[u64]) -> Option<u64> {
    parts.iter().try_fold(0u64, |acc, &part| acc.checked_add(part))
}

/// Parameters of one LSA mixer (projections, directional kernels, channel branch).
///
/// `None` when the count does not fit in a `u64`, as for every function here.
pub fn mixer_params(d: &LayerDims) -> Option<u64> {
    let half = d.dim / 2;
    let quarter = d.dim / 4;
    let kernel_out = d.num_head.checked_mul(d.kernel_size)?;
    let kernel_gen = sum(&[depthwise(half, d.patch_size)?, conv(half, kernel_out, 1)?])?;
    let channel_branch = sum(&[conv(half, quarter, 1)?, conv(quarter, half, 1)?])?;
    sum(&[
        conv(d.dim, d.dim, 1)?.checked_mul(2)?,
        kernel_gen.checked_mul(2)?,
        channel_branch,
    ])
}

/// Parameters of one dual-gate feed-forward network.
pub fn ffn_params(d: &LayerDims) -> Option<u64> {
    let gated = d.hidden.checked_mul(2)?;
    sum(&[conv(d.dim, gated, 1)?, depthwise(gated, 9)?, conv(gated, d.dim, 1)?])
}

/// Norm scale/shift plus residual scale wrapped around each sub-layer.
fn prenorm_params(d: &LayerDims) -> Option<u64> {
    d.dim.checked_mul(3)
}

/// Total learnable parameters.
pub fn count(d: &LayerDims) -> Option<u64> {
    let prenorm = prenorm_params(d)?;
    let block = sum(&[prenorm, mixer_params(d)?, prenorm, ffn_params(d)?])?;
    let group = d.num_blocks.checked_mul(block)?.checked_add(d.dim)?;
    let shuffle_out = d.upscale.checked_mul(d.upscale)?.checked_mul(d.in_chans)?;
    sum(&[
        conv(d.in_chans, d.dim, 9)?,
        d.num_groups.checked_mul(group)?,
        conv(d.dim, d.dim, 9)?,
        d.dim,
        conv(d.dim, shuffle_out, 9)?,
    ])
}
