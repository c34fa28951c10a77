mod assignment;
mod factor;
mod network;
mod value;
mod variable;

pub use assignment::{generate_assignments, generate_index_assignments, Assignment};
pub use factor::{factor_name, Factor, FactorError, FactorResult};
pub use network::{BayesNet, BayesNetBuilder, NetworkError, NetworkResult};
pub use value::Value;
pub use variable::{DomainError, DomainResult, VarId, Variable};
