mod pipeline;

pub use pipeline::ExtractionPipeline;
