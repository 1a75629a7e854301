//! Superscope: an audio-reactive preset interpreter that turns short
//! arithmetic programs into a polyline every frame.

pub mod dsl;
pub mod engine;
pub mod environment;
pub mod preset;
pub mod source;
