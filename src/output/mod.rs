//! Output formatting module
//!
//! Human-readable report lines printed while the ramp runs.

mod formatter;

pub use formatter::{
    format_bottleneck, format_ceiling_reached, format_error, format_level, format_start,
};
