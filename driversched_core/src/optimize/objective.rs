//! Provides struct for representing an optimization problem's objective
use serde::{Deserialize, Serialize};

use crate::optimize::variable::VariableId;

/// Represents the linear Objective of an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Terms included in the objective (See [`ObjectiveTerm`])
    pub(crate) terms: Vec<ObjectiveTerm>,
    /// Sense of the objective (maximize, or minimize), see [`ObjectiveSense`]
    pub(crate) sense: ObjectiveSense,
}

impl Objective {
    /// Create a new empty objective, with a given sense
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            terms: Vec::new(),
            sense,
        }
    }

    /// Create a new empty minimization objective
    pub fn new_minimize() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }

    /// Change the sense of the objective
    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    /// Sense of the objective
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Terms of the objective
    pub fn terms(&self) -> &[ObjectiveTerm] {
        &self.terms
    }

    /// Add a new linear term to the objective
    pub fn add_linear_term(&mut self, variable: VariableId, coefficient: f64) {
        self.terms.push(ObjectiveTerm {
            variable,
            coefficient,
        });
    }

    /// Evaluate the objective for a vector of variable values
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coefficient * values[t.variable.index()])
            .sum()
    }
}

/// Represents the sense of the objective, whether it should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    Maximize,
}

/// A linear term in the objective
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveTerm {
    /// Variable in objective term
    pub variable: VariableId,
    /// Coefficient for linear term
    pub coefficient: f64,
}
