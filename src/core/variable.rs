use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    sync::atomic::{AtomicUsize, Ordering},
};

use serde::Serialize;
use thiserror::Error;

use crate::core::value::Value;

// ------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors that could appear while working with a variable's domain
pub enum DomainError {
    /// A value is not a member of a variable's domain
    #[error("Value {value} is not in the domain of variable {variable}")]
    UnknownValue { variable: String, value: Value },

    /// A value is already a member of a variable's domain
    #[error("Value {value} appears more than once in the domain of variable {variable}")]
    DuplicateValue { variable: String, value: Value },

    /// An index does not point into a variable's domain
    #[error("Index {index} is out of range of [0..{size}] values of variable {variable}")]
    IndexOutOfRange {
        variable: String,
        index: usize,
        size: usize,
    },
}

/// Domain methods result type
pub type DomainResult<T> = Result<T, DomainError>;

// ------------------------------------------------------------------------------------------

static NEXT_VAR_ID: AtomicUsize = AtomicUsize::new(0);

/// A stable handle identifying a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VarId(usize);

impl VarId {
    #[inline(always)]
    fn fresh() -> Self {
        VarId(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw handle
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ------------------------------------------------------------------------------------------

/// A discrete random variable
///
/// Every call of [`Variable::new`] issues a fresh [`VarId`], and equality
/// of variables is equality of ids. A name is only a label, two distinct
/// variables may share it. A clone denotes the same variable.
#[derive(Debug, Clone, Serialize)]
pub struct Variable {
    id: VarId,
    name: String,
    domain: Vec<Value>,
}

impl PartialEq for Variable {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Variable {
    /// Creates a new variable
    ///
    /// # Arguments
    ///
    /// * `name` - A label of the variable
    /// * `domain` - An ordered list of values the variable may take
    ///
    /// # Notes
    ///
    /// A domain with repeated values is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use bnve::core::{Value, Variable};
    ///
    /// let a = Variable::new("A", ["a", "-a"]).unwrap();
    /// assert_eq!(a.domain_size(), 2);
    /// assert_eq!(a.value_index(&Value::from("-a")).unwrap(), 1);
    /// ```
    pub fn new<V>(
        name: impl Into<String>,
        domain: impl IntoIterator<Item = V>,
    ) -> DomainResult<Self>
    where
        V: Into<Value>,
    {
        let mut variable = Variable {
            id: VarId::fresh(),
            name: name.into(),
            domain: Vec::new(),
        };
        variable.add_domain_values(domain)?;
        Ok(variable)
    }

    /// Appends values to the domain. On failure the domain is left unchanged
    pub fn add_domain_values<V>(&mut self, values: impl IntoIterator<Item = V>) -> DomainResult<()>
    where
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        for (i, value) in values.iter().enumerate() {
            if self.domain.contains(value) || values[..i].contains(value) {
                return Err(DomainError::DuplicateValue {
                    variable: self.name.clone(),
                    value: value.clone(),
                });
            }
        }
        self.domain.extend(values);
        Ok(())
    }

    #[inline(always)]
    pub fn id(&self) -> VarId {
        self.id
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    #[inline(always)]
    pub fn domain_size(&self) -> usize {
        self.domain.len()
    }

    /// Returns a value by its position in the domain
    #[inline(always)]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.domain.get(index)
    }

    /// Returns a position of a value in the domain
    pub fn value_index(&self, value: &Value) -> DomainResult<usize> {
        self.domain
            .iter()
            .position(|x| x == value)
            .ok_or_else(|| DomainError::UnknownValue {
                variable: self.name.clone(),
                value: value.clone(),
            })
    }

    pub(crate) fn check_index(&self, index: usize) -> DomainResult<()> {
        if index < self.domain.len() {
            Ok(())
        } else {
            Err(DomainError::IndexOutOfRange {
                variable: self.name.clone(),
                index,
                size: self.domain.len(),
            })
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, Dom = [", self.name)?;
        for (i, value) in self.domain.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
