mod engine;
mod ordering;

pub use engine::{
    posterior, run_queries_parallel, variable_elimination, Distribution, Outcome, Query, VEError,
    VEResult,
};
pub use ordering::{fixed_ordering, min_fill_ordering};
