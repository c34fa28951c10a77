use std::fmt::Display;

use log::trace;
use ndarray::{ArrayD, Axis, IxDyn};
use thiserror::Error;

use crate::core::{
    assignment::{generate_index_assignments, Assignment},
    value::Value,
    variable::{DomainError, Variable},
};

// ------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors that could appear in factor's methods
pub enum FactorError {
    /// A value does not belong to a variable's domain
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Length of an assignment does not match length of a factor's scope
    #[error("Assignment of length {found} does not match the scope of factor {factor} of length {expected}")]
    ScopeMismatch {
        factor: String,
        expected: usize,
        found: usize,
    },

    /// A variable appears in a scope more than once
    #[error("Variable {variable} appears more than once in the scope of factor {factor}")]
    DuplicateScopeVariable { factor: String, variable: String },

    /// A variable is expected to be assigned but it is not
    #[error("Variable {0} has no assigned value")]
    Unassigned(String),
}

/// Factor's methods result type
pub type FactorResult<T> = Result<T, FactorError>;

/// Canonical name of a factor over a scope, e.g. `f[A, B]`
pub fn factor_name(scope: &[Variable]) -> String {
    let names: Vec<&str> = scope.iter().map(|v| v.name()).collect();
    format!("f[{}]", names.join(", "))
}

// ------------------------------------------------------------------------------------------

/// A table mapping every assignment of an ordered scope of variables to a number
///
/// A conditional probability table Pr(A | B, C) is a factor over (A, B, C).
/// Factors produced during elimination are not probabilities anymore, but
/// they are still tables over their scope.
///
/// The table is a dense array whose axes follow the scope, so the entry of
/// (v1 = x1, ..., vk = xk) sits at the row-major position with the first
/// scope variable being the most significant digit. A factor with an empty
/// scope is a constant holding a single number.
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    name: String,
    scope: Vec<Variable>,
    table: ArrayD<f64>,
}

impl Factor {
    /// Creates a factor filled with zeros
    ///
    /// # Arguments
    ///
    /// * `name` - A label of the factor
    /// * `scope` - An ordered list of variables. It is fixed for the whole life of the factor
    ///
    /// # Example
    ///
    /// ```
    /// use bnve::core::{Factor, Variable};
    ///
    /// let a = Variable::new("A", [1, 2, 3]).unwrap();
    /// let b = Variable::new("B", ["a", "b"]).unwrap();
    /// let f = Factor::new("P(A|B)", &[a, b]).unwrap();
    /// assert_eq!(f.size(), 6);
    /// assert!(f.values().iter().all(|x| *x == 0.));
    /// ```
    pub fn new(name: impl Into<String>, scope: &[Variable]) -> FactorResult<Self> {
        let name = name.into();
        for (i, variable) in scope.iter().enumerate() {
            if scope[..i].contains(variable) {
                return Err(FactorError::DuplicateScopeVariable {
                    factor: name,
                    variable: variable.name().to_owned(),
                });
            }
        }
        let shape: Vec<usize> = scope.iter().map(|v| v.domain_size()).collect();
        Ok(Factor {
            name,
            scope: scope.to_vec(),
            table: ArrayD::zeros(IxDyn(&shape)),
        })
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn scope(&self) -> &[Variable] {
        &self.scope
    }

    #[inline(always)]
    pub fn contains(&self, variable: &Variable) -> bool {
        self.scope.contains(variable)
    }

    /// Number of entries of the table
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.table.len()
    }

    #[inline(always)]
    pub fn table(&self) -> &ArrayD<f64> {
        &self.table
    }

    /// Returns all entries of the table in row-major order
    #[inline]
    pub fn values(&self) -> Vec<f64> {
        self.table.iter().copied().collect()
    }

    /// Sum of all entries of the table
    #[inline]
    pub fn total(&self) -> f64 {
        self.table.sum()
    }

    #[inline(always)]
    fn position(&self, variable: &Variable) -> Option<usize> {
        self.scope.iter().position(|v| v == variable)
    }

    fn check_len(&self, len: usize) -> FactorResult<()> {
        if len == self.scope.len() {
            Ok(())
        } else {
            Err(FactorError::ScopeMismatch {
                factor: self.name.clone(),
                expected: self.scope.len(),
                found: len,
            })
        }
    }

    fn indices_of(&self, values: &[Value]) -> FactorResult<Vec<usize>> {
        self.check_len(values.len())?;
        let indices = self
            .scope
            .iter()
            .zip(values)
            .map(|(variable, value)| variable.value_index(value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(indices)
    }

    fn indices_at(&self, assignment: &Assignment) -> FactorResult<Vec<usize>> {
        self.scope
            .iter()
            .map(|variable| {
                let index = assignment
                    .get_index(variable)
                    .ok_or_else(|| FactorError::Unassigned(variable.name().to_owned()))?;
                variable.check_index(index)?;
                Ok(index)
            })
            .collect()
    }

    /// Sets entries of the table
    ///
    /// # Arguments
    ///
    /// * `rows` - Each row is an ordered list of values, one per scope variable,
    ///     followed by the number the factor takes on that assignment
    ///
    /// # Notes
    ///
    /// Rows may come in any order, a repeated assignment overwrites the previous one.
    /// Rows before the first invalid one are applied.
    ///
    /// # Example
    ///
    /// ```
    /// use bnve::core::{Factor, Value, Variable};
    ///
    /// let a = Variable::new("A", [1, 2]).unwrap();
    /// let c = Variable::new("C", ["heavy", "light"]).unwrap();
    /// let mut f = Factor::new("f", &[a, c]).unwrap();
    /// f.add_values([
    ///     (vec![Value::from(1), Value::from("heavy")], 0.25),
    ///     (vec![Value::from(2), Value::from("light")], 2.25),
    /// ])
    /// .unwrap();
    /// assert_eq!(f.get_value(&[Value::from(2), Value::from("light")]).unwrap(), 2.25);
    /// assert_eq!(f.values(), vec![0.25, 0., 0., 2.25]);
    /// ```
    pub fn add_values<R>(&mut self, rows: impl IntoIterator<Item = (R, f64)>) -> FactorResult<()>
    where
        R: AsRef<[Value]>,
    {
        for (values, number) in rows {
            let indices = self.indices_of(values.as_ref())?;
            self.table[&indices[..]] = number;
        }
        Ok(())
    }

    /// Sets the entry at the values that `assignment` gives to the scope variables
    pub fn add_value_at_current_assignment(
        &mut self,
        assignment: &Assignment,
        number: f64,
    ) -> FactorResult<()> {
        let indices = self.indices_at(assignment)?;
        self.table[&indices[..]] = number;
        Ok(())
    }

    /// Returns the entry at an ordered list of values, one per scope variable
    pub fn get_value(&self, values: &[Value]) -> FactorResult<f64> {
        let indices = self.indices_of(values)?;
        Ok(self.table[&indices[..]])
    }

    /// Returns the entry at the values that `assignment` gives to the scope variables
    pub fn get_value_at_current_assignments(&self, assignment: &Assignment) -> FactorResult<f64> {
        let indices = self.indices_at(assignment)?;
        Ok(self.table[&indices[..]])
    }

    /// Returns a new factor where `restrictions` are fixed to their evidence values
    ///
    /// # Arguments
    ///
    /// * `restrictions` - Variables to fix. Variables outside of the scope are ignored
    /// * `evidence` - Values of the restricted variables
    ///
    /// # Notes
    ///
    /// The new scope is the old one without the restricted variables, order preserved.
    /// When nothing is left, the result is a constant factor named after the
    /// restricted variables.
    ///
    /// # Example
    ///
    /// ```
    /// use bnve::core::{Assignment, Factor, Value, Variable};
    ///
    /// let x = Variable::new("X", ["x", "-x"]).unwrap();
    /// let y = Variable::new("Y", ["y", "-y"]).unwrap();
    /// let mut f = Factor::new("P(X|Y)", &[x.clone(), y.clone()]).unwrap();
    /// f.add_values([
    ///     (vec![Value::from("x"), Value::from("y")], 0.9),
    ///     (vec![Value::from("x"), Value::from("-y")], 0.2),
    ///     (vec![Value::from("-x"), Value::from("y")], 0.1),
    ///     (vec![Value::from("-x"), Value::from("-y")], 0.8),
    /// ])
    /// .unwrap();
    /// let evidence = Assignment::new().with(&y, "-y").unwrap();
    /// let r = f.get_restricted_factor(&[y], &evidence).unwrap();
    /// assert_eq!(r.scope(), &[x]);
    /// assert_eq!(r.values(), vec![0.2, 0.8]);
    /// ```
    pub fn get_restricted_factor(
        &self,
        restrictions: &[Variable],
        evidence: &Assignment,
    ) -> FactorResult<Factor> {
        let kept: Vec<usize> = (0..self.scope.len())
            .filter(|i| !restrictions.contains(&self.scope[*i]))
            .collect();
        let new_scope: Vec<Variable> = kept.iter().map(|i| self.scope[*i].clone()).collect();
        let name = if new_scope.is_empty() {
            let restricted: Vec<Variable> = self
                .scope
                .iter()
                .filter(|v| restrictions.contains(v))
                .cloned()
                .collect();
            factor_name(&restricted)
        } else {
            factor_name(&new_scope)
        };
        let mut restricted = Factor::new(name, &new_scope)?;
        for assignment in generate_index_assignments(&self.scope, restrictions, evidence)? {
            let reduced: Vec<usize> = kept.iter().map(|i| assignment[*i]).collect();
            restricted.table[&reduced[..]] = self.table[&assignment[..]];
        }
        trace!("restricted {} to {}", self.name, restricted.name);
        Ok(restricted)
    }

    /// Pointwise product of two factors
    ///
    /// # Notes
    ///
    /// The scope of the product is the scope of `self` followed by the
    /// variables of `other` that `self` does not have. Entries are computed
    /// block by block, one block per joint value of the shared variables.
    ///
    /// # Example
    ///
    /// ```
    /// use bnve::core::{Factor, Value, Variable};
    ///
    /// let x = Variable::new("X", [0, 1]).unwrap();
    /// let y = Variable::new("Y", [0, 1, 2]).unwrap();
    /// let mut fx = Factor::new("fx", &[x.clone()]).unwrap();
    /// fx.add_values([(vec![Value::from(0)], 0.5), (vec![Value::from(1)], 2.)]).unwrap();
    /// let mut fy = Factor::new("fy", &[y.clone()]).unwrap();
    /// fy.add_values([
    ///     (vec![Value::from(0)], 1.),
    ///     (vec![Value::from(1)], 3.),
    ///     (vec![Value::from(2)], 5.),
    /// ])
    /// .unwrap();
    /// let p = fx.product(&fy).unwrap();
    /// assert_eq!(p.scope(), &[x, y]);
    /// assert_eq!(p.values(), vec![0.5, 1.5, 2.5, 2., 6., 10.]);
    /// ```
    pub fn product(&self, other: &Factor) -> FactorResult<Factor> {
        let mut new_scope = self.scope.clone();
        let fresh: Vec<usize> = (0..other.scope.len())
            .filter(|i| !self.scope.contains(&other.scope[*i]))
            .collect();
        new_scope.extend(fresh.iter().map(|i| other.scope[*i].clone()));
        let common: Vec<Variable> = self
            .scope
            .iter()
            .filter(|v| other.scope.contains(v))
            .cloned()
            .collect();
        let mut product = Factor::new(format!("{}_x_{}", self.name, other.name), &new_scope)?;
        let mut context = Assignment::new();
        let mut index = Vec::with_capacity(new_scope.len());
        for shared in generate_index_assignments(&common, &[], &context)? {
            for (variable, i) in common.iter().zip(&shared) {
                context.pin(variable, *i);
            }
            let lhs_block = generate_index_assignments(&self.scope, &common, &context)?;
            let rhs_block = generate_index_assignments(&other.scope, &common, &context)?;
            for lhs in &lhs_block {
                let lhs_value = self.table[&lhs[..]];
                for rhs in &rhs_block {
                    index.clear();
                    index.extend_from_slice(lhs);
                    index.extend(fresh.iter().map(|i| rhs[*i]));
                    product.table[&index[..]] = lhs_value * other.table[&rhs[..]];
                }
            }
        }
        trace!("{} has {} entries", product.name, product.size());
        Ok(product)
    }

    /// Product of a list of factors computed pairwise from left to right.
    /// Returns `None` for an empty list
    pub fn multiply_all(factors: &[Factor]) -> FactorResult<Option<Factor>> {
        let mut iter = factors.iter();
        let Some(first) = iter.next() else {
            return Ok(None);
        };
        let mut product = first.clone();
        for factor in iter {
            product = product.product(factor)?;
        }
        Ok(Some(product))
    }

    /// Sums a variable out of the factor
    ///
    /// # Notes
    ///
    /// If the variable is not in the scope, the result is a copy of the factor.
    /// Summing the last variable out produces a constant factor.
    pub fn sum_out(&self, variable: &Variable) -> Factor {
        let Some(axis) = self.position(variable) else {
            return self.clone();
        };
        let mut scope = self.scope.clone();
        scope.remove(axis);
        Factor {
            name: factor_name(&scope),
            scope,
            table: self.table.sum_axis(Axis(axis)),
        }
    }

    /// Rescales the table so that its entries sum to one. Returns the sum before rescaling
    ///
    /// # Notes
    ///
    /// A table that already sums to one or sums to zero is left untouched.
    pub fn normalize(&mut self) -> f64 {
        let total = self.total();
        if total != 1f64 && total != 0f64 {
            self.table.mapv_inplace(|x| x / total);
        }
        total
    }
}

impl Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        let assignments =
            generate_index_assignments(&self.scope, &[], &Assignment::new()).unwrap_or_default();
        for assignment in assignments {
            write!(f, "[")?;
            for (variable, index) in self.scope.iter().zip(&assignment) {
                write!(f, "{} = {}, ", variable.name(), variable.domain()[*index])?;
            }
            writeln!(f, "] = {}", self.table[&assignment[..]])?;
        }
        Ok(())
    }
}
