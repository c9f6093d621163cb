#![forbid(unsafe_code)]

//! x87 floating-point coprocessor core for 386/486-class CPU emulation.
//!
//! The crate API is centered around [`state::X87`], the complete per-FPU
//! architectural state (register stack, tag word, control/status words and
//! the soft-float kernel's rounding/flag state). The host decoder drives it
//! through the eight ESC-group entry points (`X87::group_d8` ..
//! `X87::group_df`), supplying instruction fetch, effective addresses,
//! memory, flags and trap delivery through the [`host::Host`] trait.
//!
//! A small bypass surface for hosts with a trustworthy native FPU lives in
//! [`abi`].

pub mod abi;
pub mod bcd;
mod exec;
pub mod fx80;
pub mod host;
pub mod softfp;
pub mod state;

pub use fx80::Fx80;
pub use host::{Fault, Host, Result};
pub use state::{Tag, X87};
