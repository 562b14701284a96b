pub mod config;
pub mod constants;
pub mod labels;
pub mod pipeline;
pub mod render;
pub mod roster;
pub mod shortcode;
