//! Reranker implementations

mod cohere;

pub use cohere::CohereReranker;
