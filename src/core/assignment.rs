use std::collections::HashMap;

use crate::core::{
    factor::{FactorError, FactorResult},
    value::Value,
    variable::{DomainResult, VarId, Variable},
};

// ------------------------------------------------------------------------------------------

/// A partial assignment of values to variables
///
/// It plays two roles. As evidence it carries the observed value of each
/// evidence variable into a query. As a lookup context it carries the
/// "current" value of variables into factor reads and writes. Values are
/// stored as positions in a variable's domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    indices: HashMap<VarId, usize>,
    names: HashMap<VarId, String>,
}

impl Assignment {
    #[inline]
    pub fn new() -> Self {
        Assignment {
            indices: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// Assigns a value to a variable, replacing a previous one
    ///
    /// # Example
    ///
    /// ```
    /// use bnve::core::{Assignment, Value, Variable};
    ///
    /// let blood = Variable::new("Blood", ["Optimal", "Imbalanced"]).unwrap();
    /// let mut evidence = Assignment::new();
    /// evidence.set(&blood, "Imbalanced").unwrap();
    /// assert_eq!(evidence.get(&blood), Some(&Value::from("Imbalanced")));
    /// assert_eq!(evidence.get_index(&blood), Some(1));
    /// assert!(evidence.set(&blood, "Unknown").is_err());
    /// ```
    pub fn set(&mut self, variable: &Variable, value: impl Into<Value>) -> DomainResult<()> {
        let index = variable.value_index(&value.into())?;
        self.insert(variable, index);
        Ok(())
    }

    /// Builder-style counterpart of [`Assignment::set`]
    pub fn with(mut self, variable: &Variable, value: impl Into<Value>) -> DomainResult<Self> {
        self.set(variable, value)?;
        Ok(self)
    }

    /// Returns the value assigned to a variable
    #[inline]
    pub fn get<'a>(&self, variable: &'a Variable) -> Option<&'a Value> {
        self.indices
            .get(&variable.id())
            .and_then(|index| variable.value(*index))
    }

    /// Assigns a value to a variable by its position in the domain
    pub fn set_index(&mut self, variable: &Variable, index: usize) -> DomainResult<()> {
        variable.check_index(index)?;
        self.insert(variable, index);
        Ok(())
    }

    #[inline]
    pub fn get_index(&self, variable: &Variable) -> Option<usize> {
        self.indices.get(&variable.id()).copied()
    }

    #[inline]
    pub fn contains(&self, variable: &Variable) -> bool {
        self.indices.contains_key(&variable.id())
    }

    #[inline]
    pub fn contains_id(&self, id: VarId) -> bool {
        self.indices.contains_key(&id)
    }

    /// Removes a variable from the assignment, returning its index if it was assigned
    #[inline]
    pub fn remove(&mut self, variable: &Variable) -> Option<usize> {
        self.names.remove(&variable.id());
        self.indices.remove(&variable.id())
    }

    #[inline]
    pub fn clear(&mut self) {
        self.indices.clear();
        self.names.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Name of an assigned variable
    #[inline]
    pub fn name(&self, id: VarId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Returns ids of all assigned variables (in no particular order)
    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = VarId> + '_ {
        self.indices.keys().copied()
    }

    fn insert(&mut self, variable: &Variable, index: usize) {
        self.indices.insert(variable.id(), index);
        if !self.names.contains_key(&variable.id()) {
            self.names.insert(variable.id(), variable.name().to_owned());
        }
    }

    // Index is trusted to be in range, the name is not recorded
    #[inline(always)]
    pub(crate) fn pin(&mut self, variable: &Variable, index: usize) {
        self.indices.insert(variable.id(), index);
    }
}

// ------------------------------------------------------------------------------------------

/// Enumerates assignments of a scope as tuples of domain positions
///
/// # Arguments
///
/// * `scope` - An ordered list of variables
/// * `restrictions` - Variables pinned to a single value. Those that are not in `scope` are ignored
/// * `source` - An assignment providing the pinned values
///
/// # Notes
///
/// Tuples are produced in row-major order: the last variable of the scope
/// varies fastest. An empty scope yields a single empty tuple. A pinned
/// variable without a value in `source` is an error.
pub fn generate_index_assignments(
    scope: &[Variable],
    restrictions: &[Variable],
    source: &Assignment,
) -> FactorResult<Vec<Vec<usize>>> {
    let mut assignments: Vec<Vec<usize>> = vec![Vec::with_capacity(scope.len())];
    for variable in scope {
        let choices: Vec<usize> = if restrictions.contains(variable) {
            let index = source
                .get_index(variable)
                .ok_or_else(|| FactorError::Unassigned(variable.name().to_owned()))?;
            variable.check_index(index)?;
            vec![index]
        } else {
            (0..variable.domain_size()).collect()
        };
        let mut extended = Vec::with_capacity(assignments.len() * choices.len());
        for prefix in &assignments {
            for index in &choices {
                let mut tuple = prefix.clone();
                tuple.push(*index);
                extended.push(tuple);
            }
        }
        assignments = extended;
    }
    Ok(assignments)
}

/// Enumerates assignments of a scope as tuples of domain values
///
/// Same as [`generate_index_assignments`] but positions are mapped to values.
///
/// # Example
///
/// ```
/// use bnve::core::{generate_assignments, Assignment, Value, Variable};
///
/// let a = Variable::new("A", ["a", "-a"]).unwrap();
/// let b = Variable::new("B", [1, 2, 3]).unwrap();
/// let evidence = Assignment::new().with(&a, "-a").unwrap();
///
/// let all = generate_assignments(&[a.clone(), b.clone()], &[], &evidence).unwrap();
/// assert_eq!(all.len(), 6);
/// assert_eq!(all[1], vec![Value::from("a"), Value::from(2)]);
///
/// let pinned = generate_assignments(&[a.clone(), b.clone()], &[a], &evidence).unwrap();
/// assert_eq!(pinned.len(), 3);
/// assert!(pinned.iter().all(|t| t[0] == Value::from("-a")));
/// ```
pub fn generate_assignments(
    scope: &[Variable],
    restrictions: &[Variable],
    source: &Assignment,
) -> FactorResult<Vec<Vec<Value>>> {
    let assignments = generate_index_assignments(scope, restrictions, source)?
        .into_iter()
        .map(|tuple| {
            scope
                .iter()
                .zip(tuple)
                .map(|(variable, index)| variable.domain()[index].clone())
                .collect()
        })
        .collect();
    Ok(assignments)
}
