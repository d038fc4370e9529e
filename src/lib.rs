//! Radial trust/traffic graph around a focus peer: fetching, layout and visual encoding.

pub mod trust;
pub mod util;
