use crate::core::{Factor, VarId, Variable};

// Variables of all scopes except `query`, in order of first appearance
fn scope_variables(factors: &[Factor], query: &Variable) -> Vec<Variable> {
    let mut variables: Vec<Variable> = Vec::new();
    for variable in factors.iter().flat_map(|f| f.scope()) {
        if variable != query && !variables.contains(variable) {
            variables.push(variable.clone());
        }
    }
    variables
}

// The scope of the factor that eliminating `var` would produce
fn compute_fill(scopes: &[Vec<VarId>], var: VarId) -> Vec<VarId> {
    let mut union = Vec::new();
    for scope in scopes.iter().filter(|s| s.contains(&var)) {
        for id in scope {
            if *id != var && !union.contains(id) {
                union.push(*id);
            }
        }
    }
    union
}

// Position of the candidate with the smallest fill, the first one wins ties
fn min_fill_variable(scopes: &[Vec<VarId>], candidates: &[Variable]) -> (usize, Vec<VarId>) {
    let mut best = 0;
    let mut best_fill = compute_fill(scopes, candidates[0].id());
    for (i, candidate) in candidates.iter().enumerate().skip(1) {
        let fill = compute_fill(scopes, candidate.id());
        if fill.len() < best_fill.len() {
            best = i;
            best_fill = fill;
        }
    }
    (best, best_fill)
}

/// Computes a min-fill elimination ordering
///
/// # Arguments
///
/// * `factors` - Factors whose variables are to be ordered
/// * `query` - A variable excluded from the ordering
///
/// # Notes
///
/// At every step the variable whose elimination produces the factor with
/// the smallest scope is taken, ties are broken by first appearance in the
/// factors' scopes. Eliminating a variable replaces all scopes that mention
/// it by the single scope of the produced factor. Every variable of every
/// scope except `query` appears in the result exactly once.
///
/// # Example
///
/// ```
/// use bnve::core::{Factor, Variable};
/// use bnve::elimination::min_fill_ordering;
///
/// let a = Variable::new("A", ["a", "-a"]).unwrap();
/// let b = Variable::new("B", ["b", "-b"]).unwrap();
/// let c = Variable::new("C", ["c", "-c"]).unwrap();
/// let factors = [
///     Factor::new("P(A)", &[a.clone()]).unwrap(),
///     Factor::new("P(B|A)", &[b.clone(), a.clone()]).unwrap(),
///     Factor::new("P(C|B)", &[c.clone(), b.clone()]).unwrap(),
/// ];
/// assert_eq!(min_fill_ordering(&factors, &c), vec![a, b]);
/// ```
pub fn min_fill_ordering(factors: &[Factor], query: &Variable) -> Vec<Variable> {
    let mut scopes: Vec<Vec<VarId>> = factors
        .iter()
        .map(|f| f.scope().iter().map(|v| v.id()).collect())
        .collect();
    let mut candidates = scope_variables(factors, query);
    let mut ordering = Vec::with_capacity(candidates.len());
    while !candidates.is_empty() {
        let (position, fill) = min_fill_variable(&scopes, &candidates);
        let variable = candidates.remove(position);
        scopes.retain(|s| !s.contains(&variable.id()));
        scopes.push(fill);
        ordering.push(variable);
    }
    ordering
}

/// Returns an ordering function that follows a given order
///
/// # Arguments
///
/// * `order` - Preferred elimination order
///
/// # Notes
///
/// Variables of `order` that do not occur in the factors (and the query
/// variable) are skipped. Variables of the factors missing from `order` are
/// eliminated last, in order of first appearance.
///
/// # Example
///
/// ```
/// use bnve::core::{Factor, Variable};
/// use bnve::elimination::fixed_ordering;
///
/// let a = Variable::new("A", [0, 1]).unwrap();
/// let b = Variable::new("B", [0, 1]).unwrap();
/// let c = Variable::new("C", [0, 1]).unwrap();
/// let factors = [Factor::new("f", &[a.clone(), b.clone(), c.clone()]).unwrap()];
///
/// let ordering = fixed_ordering(vec![c.clone(), a.clone()]);
/// assert_eq!(ordering(&factors, &a), vec![c, b]);
/// ```
pub fn fixed_ordering(
    order: Vec<Variable>,
) -> impl Fn(&[Factor], &Variable) -> Vec<Variable> + Send + Sync {
    move |factors, query| {
        let present = scope_variables(factors, query);
        let mut ordering: Vec<Variable> = Vec::with_capacity(present.len());
        for variable in order.iter().chain(&present) {
            if present.contains(variable) && !ordering.contains(variable) {
                ordering.push(variable.clone());
            }
        }
        ordering
    }
}
