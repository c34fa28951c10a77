use log::debug;
use thiserror::Error;

use crate::core::{
    factor::Factor,
    variable::{VarId, Variable},
};

// ------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors that could appear while assembling a Bayes net
pub enum NetworkError {
    /// A factor's scope has a variable that is not declared in the network
    #[error("Factor {factor} has variable {variable} that does not appear in the list of variables")]
    UnknownScopeVariable { factor: String, variable: String },

    /// A variable is declared twice
    #[error("Variable {0} is declared more than once")]
    DuplicateVariable(String),

    /// A factor was created before the domain of one of its variables had been extended
    #[error("Factor {factor} holds variable {variable} with a domain of {factor_size} values, the network declares {network_size}")]
    DomainMismatch {
        factor: String,
        variable: String,
        factor_size: usize,
        network_size: usize,
    },
}

/// Bayes net's methods result type
pub type NetworkResult<T> = Result<T, NetworkError>;

// ------------------------------------------------------------------------------------------

/// A Bayes net: a set of variables and the factors over them
///
/// A network is immutable once built. Every variable of every factor's
/// scope is guaranteed to be one of the network's variables.
#[derive(Debug, Clone)]
pub struct BayesNet {
    name: String,
    variables: Vec<Variable>,
    factors: Vec<Factor>,
}

impl BayesNet {
    /// Creates a Bayes net from a finished list of variables and factors
    ///
    /// # Example
    ///
    /// ```
    /// use bnve::core::{BayesNet, Factor, Variable};
    ///
    /// let a = Variable::new("A", ["a", "-a"]).unwrap();
    /// let b = Variable::new("B", ["b", "-b"]).unwrap();
    /// let fa = Factor::new("P(A)", &[a.clone()]).unwrap();
    /// let fb = Factor::new("P(B|A)", &[b.clone(), a.clone()]).unwrap();
    ///
    /// let net = BayesNet::new("chain", [a.clone(), b], [fa, fb.clone()]).unwrap();
    /// assert_eq!(net.factors().len(), 2);
    ///
    /// // B is missing from the declared variables
    /// assert!(BayesNet::new("broken", [a], [fb]).is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        variables: impl IntoIterator<Item = Variable>,
        factors: impl IntoIterator<Item = Factor>,
    ) -> NetworkResult<Self> {
        let mut builder = BayesNetBuilder::new(name);
        for variable in variables {
            builder.add_variable(variable)?;
        }
        for factor in factors {
            builder.add_factor(factor)?;
        }
        Ok(builder.build())
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[inline(always)]
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Looks a variable up by its name. With several variables sharing
    /// a name, the first declared one is returned
    #[inline]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name() == name)
    }

    #[inline]
    pub fn variable_by_id(&self, id: VarId) -> Option<&Variable> {
        self.variables.iter().find(|v| v.id() == id)
    }

    #[inline]
    pub fn contains(&self, variable: &Variable) -> bool {
        self.variables.contains(variable)
    }

    #[inline]
    pub fn contains_id(&self, id: VarId) -> bool {
        self.variables.iter().any(|v| v.id() == id)
    }
}

// ------------------------------------------------------------------------------------------

/// An incremental Bayes net builder
///
/// Variables must be added before the factors that mention them.
#[derive(Debug)]
pub struct BayesNetBuilder {
    name: String,
    variables: Vec<Variable>,
    factors: Vec<Factor>,
}

impl BayesNetBuilder {
    /// Creates an empty builder
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        BayesNetBuilder {
            name: name.into(),
            variables: Vec::new(),
            factors: Vec::new(),
        }
    }

    /// Creates a builder with preallocated memory
    ///
    /// # Arguments
    ///
    /// * `name` - A name of the network
    /// * `variables_capacity` - A number of variables we need to preallocate memory for
    /// * `factors_capacity` - A number of factors we need to preallocate memory for
    #[inline]
    pub fn with_capacity(
        name: impl Into<String>,
        variables_capacity: usize,
        factors_capacity: usize,
    ) -> Self {
        BayesNetBuilder {
            name: name.into(),
            variables: Vec::with_capacity(variables_capacity),
            factors: Vec::with_capacity(factors_capacity),
        }
    }

    /// Declares a variable
    pub fn add_variable(&mut self, variable: Variable) -> NetworkResult<&mut Self> {
        if self.variables.contains(&variable) {
            return Err(NetworkError::DuplicateVariable(variable.name().to_owned()));
        }
        self.variables.push(variable);
        Ok(self)
    }

    /// Adds a factor
    ///
    /// # Notes
    ///
    /// Every variable of the factor's scope must already be declared, and
    /// its domain must be the one the factor was created with.
    ///
    /// # Example
    ///
    /// ```
    /// use bnve::core::{BayesNetBuilder, Factor, Variable};
    ///
    /// let a = Variable::new("A", ["a", "-a"]).unwrap();
    /// let fa = Factor::new("P(A)", &[a.clone()]).unwrap();
    ///
    /// let mut builder = BayesNetBuilder::with_capacity("single", 1, 1);
    /// assert!(builder.add_factor(fa.clone()).is_err());
    /// builder.add_variable(a).unwrap().add_factor(fa).unwrap();
    /// let net = builder.build();
    /// assert_eq!(net.variables().len(), 1);
    /// ```
    pub fn add_factor(&mut self, factor: Factor) -> NetworkResult<&mut Self> {
        for variable in factor.scope() {
            let declared = self
                .variables
                .iter()
                .find(|v| *v == variable)
                .ok_or_else(|| NetworkError::UnknownScopeVariable {
                    factor: factor.name().to_owned(),
                    variable: variable.name().to_owned(),
                })?;
            if declared.domain() != variable.domain() {
                return Err(NetworkError::DomainMismatch {
                    factor: factor.name().to_owned(),
                    variable: variable.name().to_owned(),
                    factor_size: variable.domain_size(),
                    network_size: declared.domain_size(),
                });
            }
        }
        self.factors.push(factor);
        Ok(self)
    }

    /// Finishes construction
    #[inline]
    pub fn build(self) -> BayesNet {
        debug!(
            "built network {} with {} variables and {} factors",
            self.name,
            self.variables.len(),
            self.factors.len(),
        );
        BayesNet {
            name: self.name,
            variables: self.variables,
            factors: self.factors,
        }
    }
}
