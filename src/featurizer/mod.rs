//! The core of session featurization.
//! Turn pre-grouped capture sessions into the fixed-length numeric vector
//! consumed by the downstream traffic classifier.
pub mod containers;
pub mod core;
pub mod fields;
pub mod utils;
