//! Library side of the `medsub` command: logging setup, dataset loading and
//! batch evaluation.

pub mod logging;
pub mod pipeline;
pub mod timing;
