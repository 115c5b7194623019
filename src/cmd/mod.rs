pub mod export;
pub mod fingers;
pub mod optimize;
pub mod patterns;
pub mod report;
pub mod simulate;
pub mod stats;
pub mod thumbs;
pub mod timing;
pub mod transitions;
