pub mod address;
pub mod rewriter;
