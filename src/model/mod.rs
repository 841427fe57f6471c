pub mod constants;
pub mod enricher;
pub mod identifier;
pub mod pipeline;
pub mod rating;
pub mod selector;
pub mod structures;
