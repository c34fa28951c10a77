use std::fmt::Display;

use log::{debug, warn};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use thiserror::Error;

use crate::core::{
    Assignment, BayesNet, DomainError, Factor, FactorError, Value, VarId, Variable,
};

// ------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors that could appear while answering a query
pub enum VEError {
    /// The query variable is not a variable of the network
    #[error("Query variable {0} does not appear in the network")]
    UnknownQuery(String),

    /// An evidence variable is not a variable of the network
    #[error("Evidence variable {variable} ({id}) does not appear in the network")]
    UnknownEvidence { variable: String, id: VarId },

    /// The query variable's domain differs from the one the network was built with
    #[error("Query variable {query} has {query_size} values, the network declares {network_size}")]
    QueryDomainMismatch {
        query: String,
        query_size: usize,
        network_size: usize,
    },

    /// After elimination the remaining factor is not a factor over the query variable alone
    #[error("Final factor has scope {scope:?}, expected only the query variable {query}")]
    FinalFactor { query: String, scope: Vec<String> },

    /// The evidence is impossible under the network, so no posterior exists
    #[error("Evidence has zero probability")]
    ZeroProbabilityEvidence,

    #[error(transparent)]
    Factor(#[from] FactorError),
}

impl From<DomainError> for VEError {
    #[inline]
    fn from(error: DomainError) -> Self {
        VEError::Factor(error.into())
    }
}

/// Variable elimination result type
pub type VEResult<T> = Result<T, VEError>;

// ------------------------------------------------------------------------------------------

// Replaces factors mentioning evidence by their restrictions, constant factors are dropped
fn restrict_factors(
    factors: &[Factor],
    evidence_variables: &[Variable],
    evidence: &Assignment,
) -> VEResult<Vec<Factor>> {
    let mut restricted = Vec::with_capacity(factors.len());
    for factor in factors {
        if factor.scope().is_empty() {
            continue;
        }
        if factor.scope().iter().any(|v| evidence_variables.contains(v)) {
            restricted.push(factor.get_restricted_factor(evidence_variables, evidence)?);
        } else {
            restricted.push(factor.clone());
        }
    }
    Ok(restricted)
}

#[inline]
fn names(variables: &[Variable]) -> Vec<&str> {
    variables.iter().map(|v| v.name()).collect()
}

/// Computes the posterior distribution of a variable given evidence
///
/// # Arguments
///
/// * `network` - A Bayes net
/// * `query` - A variable whose distribution is computed
/// * `evidence` - Observed values of the evidence variables
/// * `ordering` - A function computing an elimination order of the variables
///     of given factors, the query variable excluded. [`min_fill_ordering`]
///     is one such function
///
/// # Notes
///
/// The returned probabilities follow the order of `query.domain()` and sum
/// to one. When the query variable is itself observed, the answer is the
/// point mass on its observed value, unless the evidence as a whole is
/// impossible.
///
/// [`min_fill_ordering`]: crate::elimination::min_fill_ordering
///
/// # Example
///
/// ```
/// use bnve::core::{Assignment, BayesNet, Factor, Value, Variable};
/// use bnve::elimination::{min_fill_ordering, variable_elimination};
///
/// let a = Variable::new("A", ["a", "-a"]).unwrap();
/// let b = Variable::new("B", ["b", "-b"]).unwrap();
/// let mut fa = Factor::new("P(A)", &[a.clone()]).unwrap();
/// fa.add_values([(vec![Value::from("a")], 0.3), (vec![Value::from("-a")], 0.7)]).unwrap();
/// let mut fb = Factor::new("P(B|A)", &[b.clone(), a.clone()]).unwrap();
/// fb.add_values([
///     (vec![Value::from("b"), Value::from("a")], 0.8),
///     (vec![Value::from("b"), Value::from("-a")], 0.1),
///     (vec![Value::from("-b"), Value::from("a")], 0.2),
///     (vec![Value::from("-b"), Value::from("-a")], 0.9),
/// ])
/// .unwrap();
/// let net = BayesNet::new("chain", [a.clone(), b.clone()], [fa, fb]).unwrap();
///
/// let prior = variable_elimination(&net, &b, &Assignment::new(), &min_fill_ordering).unwrap();
/// assert!((prior[0] - 0.31).abs() < 1e-12);
///
/// let evidence = Assignment::new().with(&a, "a").unwrap();
/// let posterior = variable_elimination(&net, &b, &evidence, &min_fill_ordering).unwrap();
/// assert_eq!(posterior, vec![0.8, 0.2]);
/// ```
pub fn variable_elimination(
    network: &BayesNet,
    query: &Variable,
    evidence: &Assignment,
    ordering: &impl Fn(&[Factor], &Variable) -> Vec<Variable>,
) -> VEResult<Vec<f64>> {
    let Some(declared) = network.variable_by_id(query.id()) else {
        return Err(VEError::UnknownQuery(query.name().to_owned()));
    };
    if declared.domain() != query.domain() {
        return Err(VEError::QueryDomainMismatch {
            query: query.name().to_owned(),
            query_size: query.domain_size(),
            network_size: declared.domain_size(),
        });
    }
    if let Some(id) = evidence.ids().find(|id| !network.contains_id(*id)) {
        return Err(VEError::UnknownEvidence {
            variable: evidence.name(id).unwrap_or_default().to_owned(),
            id,
        });
    }
    if let Some(index) = evidence.get_index(query) {
        return observed_query(network, query, index, evidence, ordering);
    }
    let evidence_variables: Vec<Variable> = network
        .variables()
        .iter()
        .filter(|v| evidence.contains(v))
        .cloned()
        .collect();
    let mut factors = restrict_factors(network.factors(), &evidence_variables, evidence)?;

    let order = ordering(&factors, query);
    debug!(
        "query {} on {}, elimination order {:?}",
        query.name(),
        network.name(),
        names(&order),
    );

    for variable in &order {
        let (bucket, rest): (Vec<Factor>, Vec<Factor>) =
            factors.into_iter().partition(|f| f.contains(variable));
        factors = rest;
        let Some(product) = Factor::multiply_all(&bucket)? else {
            continue;
        };
        let summed = product.sum_out(variable);
        debug!(
            "eliminated {}: {} factors joined, new factor {} of size {}",
            variable.name(),
            bucket.len(),
            summed.name(),
            summed.size(),
        );
        factors.push(summed);
    }

    let (bucket, rest): (Vec<Factor>, Vec<Factor>) =
        factors.into_iter().partition(|f| f.contains(query));
    // a vanishing constant means the evidence itself is impossible
    if rest.iter().any(|f| f.scope().is_empty() && f.total() == 0f64) {
        return Err(VEError::ZeroProbabilityEvidence);
    }
    let final_factor = Factor::multiply_all(&bucket)?;
    let mut final_factor = match final_factor {
        Some(f) if f.scope() == std::slice::from_ref(query) => f,
        other => {
            return Err(VEError::FinalFactor {
                query: query.name().to_owned(),
                scope: other
                    .map(|f| names(f.scope()).into_iter().map(String::from).collect::<Vec<_>>())
                    .unwrap_or_default(),
            })
        }
    };
    if final_factor.normalize() == 0f64 {
        return Err(VEError::ZeroProbabilityEvidence);
    }
    Ok(final_factor.values())
}

// The point mass on the observed value of the query, provided the evidence is possible
fn observed_query(
    network: &BayesNet,
    query: &Variable,
    index: usize,
    evidence: &Assignment,
    ordering: &impl Fn(&[Factor], &Variable) -> Vec<Variable>,
) -> VEResult<Vec<f64>> {
    query.check_index(index)?;
    let mut rest = evidence.clone();
    rest.remove(query);
    let marginal = variable_elimination(network, query, &rest, ordering)?;
    if marginal[index] == 0f64 {
        return Err(VEError::ZeroProbabilityEvidence);
    }
    warn!("query variable {} is observed, returning a point mass", query.name());
    let mut distribution = vec![0f64; query.domain_size()];
    distribution[index] = 1f64;
    Ok(distribution)
}

// ------------------------------------------------------------------------------------------

/// A domain value of a variable together with its probability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub value: Value,
    pub probability: f64,
}

/// A distribution over the domain of a variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    /// Name of the variable
    pub variable: String,

    /// One outcome per domain value, in domain order
    pub outcomes: Vec<Outcome>,
}

impl Distribution {
    /// Pairs domain values of a variable with probabilities
    pub fn new(variable: &Variable, probabilities: Vec<f64>) -> Self {
        let outcomes = variable
            .domain()
            .iter()
            .zip(probabilities)
            .map(|(value, probability)| Outcome {
                value: value.clone(),
                probability,
            })
            .collect();
        Distribution {
            variable: variable.name().to_owned(),
            outcomes,
        }
    }

    #[inline]
    pub fn probabilities(&self) -> Vec<f64> {
        self.outcomes.iter().map(|o| o.probability).collect()
    }

    /// Probability of a domain value
    #[inline]
    pub fn probability(&self, value: &Value) -> Option<f64> {
        self.outcomes
            .iter()
            .find(|o| &o.value == value)
            .map(|o| o.probability)
    }

    /// The most probable outcome, the first one on ties
    pub fn most_likely(&self) -> Option<&Outcome> {
        self.outcomes.iter().fold(None, |best: Option<&Outcome>, o| match best {
            Some(b) if b.probability >= o.probability => Some(b),
            _ => Some(o),
        })
    }
}

impl Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Distribution({}): [", self.variable)?;
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", outcome.value, outcome.probability)?;
        }
        write!(f, "]")
    }
}

/// Same as [`variable_elimination`], but pairs probabilities with the domain values
pub fn posterior(
    network: &BayesNet,
    query: &Variable,
    evidence: &Assignment,
    ordering: &impl Fn(&[Factor], &Variable) -> Vec<Variable>,
) -> VEResult<Distribution> {
    let probabilities = variable_elimination(network, query, evidence, ordering)?;
    Ok(Distribution::new(query, probabilities))
}

// ------------------------------------------------------------------------------------------

/// A query variable together with the evidence it is conditioned on
#[derive(Debug, Clone)]
pub struct Query {
    pub variable: Variable,
    pub evidence: Assignment,
}

impl Query {
    #[inline]
    pub fn new(variable: &Variable, evidence: Assignment) -> Self {
        Query {
            variable: variable.clone(),
            evidence,
        }
    }
}

/// Answers independent queries in parallel
///
/// # Notes
///
/// Results come in the order of `queries`. A failed query does not affect the others.
///
/// # Example
///
/// ```
/// use bnve::core::{Assignment, BayesNet, Factor, Value, Variable};
/// use bnve::elimination::{min_fill_ordering, run_queries_parallel, Query};
///
/// let a = Variable::new("A", [true, false]).unwrap();
/// let mut fa = Factor::new("P(A)", &[a.clone()]).unwrap();
/// fa.add_values([(vec![Value::from(true)], 0.25), (vec![Value::from(false)], 0.75)]).unwrap();
/// let net = BayesNet::new("single", [a.clone()], [fa]).unwrap();
///
/// let queries = vec![
///     Query::new(&a, Assignment::new()),
///     Query::new(&a, Assignment::new().with(&a, false).unwrap()),
/// ];
/// let answers = run_queries_parallel(&net, &queries, &min_fill_ordering);
/// assert_eq!(answers[0], Ok(vec![0.25, 0.75]));
/// assert_eq!(answers[1], Ok(vec![0., 1.]));
/// ```
pub fn run_queries_parallel<O>(
    network: &BayesNet,
    queries: &[Query],
    ordering: &O,
) -> Vec<VEResult<Vec<f64>>>
where
    O: Fn(&[Factor], &Variable) -> Vec<Variable> + Sync,
{
    queries
        .par_iter()
        .map(|query| variable_elimination(network, &query.variable, &query.evidence, ordering))
        .collect()
}
