//! Enhancement orchestration - system-message assembly, dispatch, filtering

pub mod engine;
pub mod output_filter;
pub mod templates;

pub use engine::EnhancementEngine;
pub use output_filter::filter_output;
