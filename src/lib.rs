//! LAMNet experiment configuration toolkit
//!
//! LAMNet is trained and evaluated by an external BasicSR-style framework
//! driven by YAML option files. This crate loads those files, checks them
//! against the driver contract and derives what the run would build:
//!
//! - [`config`] - Schema, loader, overrides, registries and validation
//! - [`network`] - LAMNet hyperparameter checks, kernel map, parameter count
//! - [`schedule`] - Closed-form learning rate schedules
//! - [`cli`] - The `lamnet` command-line interface
//!
//! # Example
//!
//! ```
//! use lamnet::config::{parse_config, validate_config, Registries, ValidationContext};
//!
//! let yaml = r"
//! name: test_LAMNet_x4
//! model_type: SRModel
//! scale: 4
//! datasets:
//!   test_1:
//!     type: PairedImageDataset
//!     dataroot_gt: datasets/Benchmarks/Set5/HR
//!     dataroot_lq: datasets/Benchmarks/Set5/LR_bicubic/X4
//!     io_backend: {type: disk}
//! network_g:
//!   type: LAMNet
//!   kernel_loc: [4, 5, 6]
//! path:
//!   pretrain_network_g: experiments/pretrained_models/LAMNet_x4.pth
//! ";
//! let config = parse_config(yaml)?;
//! let ctx = ValidationContext::new(".").with_path_checks(false);
//! let plan = validate_config(&config, &ctx, &Registries::builtin())?;
//! assert_eq!(plan.network.upscale, 4);
//! # Ok::<(), lamnet::config::ConfigError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod network;
pub mod schedule;

pub use error::{Error, Result};
