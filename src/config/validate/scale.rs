//! Scale markers embedded in dataset paths and filename templates
//!
//! BasicSR layouts encode the upscaling factor in directory names
//! (`LR_bicubic/X4`, `Set5/x3`, `LRbicx2`, `DF2K_train_LR_bicubic_X4_sub.lmdb`)
//! and in filename templates (`{}x4`). A marker is an `x`/`X` followed by
//! digits at the end of a path component, optionally followed by `_sub` and
//! a `.lmdb` extension.

use regex::Regex;
use std::path::{Component, Path};
use std::sync::OnceLock;

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)x(\d+)(?:_sub)?(?:\.lmdb)?$").expect("scale marker pattern is valid")
    })
}

/// Scale factor encoded at the end of a single name, if any.
pub fn marker_in_name(name: &str) -> Option<u32> {
    marker_pattern()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Every scale factor encoded in the components of `path`, in order.
pub fn markers_in_path(path: &Path) -> Vec<u32> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => name.to_str().and_then(marker_in_name),
            _ => None,
        })
        .collect()
}

/// First marker in `path` that disagrees with `scale`.
pub fn conflicting_marker(path: &Path, scale: u32) -> Option<u32> {
    markers_in_path(path).into_iter().find(|&found| found != scale)
}
