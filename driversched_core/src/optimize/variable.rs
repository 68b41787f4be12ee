//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};

use derive_builder::Builder;

/// Position of a variable within a [`Problem`](crate::optimize::problem::Problem)
///
/// Variables are numbered densely in the order they were added, and every solver backend
/// numbers its columns the same way, so the id doubles as an index into solution vectors.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VariableId(pub(crate) usize);

impl VariableId {
    /// Index of the variable in the problem's variable list
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A decision variable of an optimization problem
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(setter(into))]
pub struct Variable {
    /// Used to identify the variable, must be unique within a problem
    pub id: String,
    /// Type of the variable, see [`VariableType`]
    #[builder(default = "VariableType::Continuous")]
    pub variable_type: VariableType,
    /// Lowest value the variable can take
    #[builder(default = "0.")]
    pub lower_bound: f64,
    /// Highest value the variable can take
    #[builder(default = "f64::INFINITY")]
    pub upper_bound: f64,
}

impl Variable {
    /// Check whether the variable is restricted to integer values
    pub fn is_integer(&self) -> bool {
self.variable_type == VariableType::Integer
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.id, self.variable_type)
    }
}

/// Represents the type of variable in an optimization problem
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq)]
pub enum VariableType {
    /// Continuous variable
    Continuous,
    /// Integer variable
    Integer,
}

impl Display for VariableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableType::Continuous => write!(f, "CONTINUOUS"),
            VariableType::Integer => write!(f, "INTEGER"),
        }
    }
}
