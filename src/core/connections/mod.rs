pub mod edge_validator;
pub mod tracer;

pub use edge_validator::EdgeValidator;
pub use tracer::{ConnectivityTracer, ReachSet, TraceReport};
