//! Provides struct for representing a constraint in an optimization problem
use std::fmt::{Display, Formatter};

use crate::optimize::variable::VariableId;

/// Represents a linear constraint in an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Represents an equality constraint, where `terms` = `equals`
    Equality {
        /// Used to identify the constraint
        id: String,
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The right hand side of the equality constraint
        equals: f64,
    },
    /// Represents an inequality constraint, `lower_bound` <= `terms` <= `upper_bound`
    ///
    /// Either bound may be infinite to express a one sided constraint
    Inequality {
        /// Used to identify the constraint
        id: String,
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The lowest value the sum of the terms can take
        lower_bound: f64,
        /// The highest value the sum of the terms can take
        upper_bound: f64,
    },
}

impl Constraint {
    /// Create a new equality constraint
    ///
    /// # Parameters
    /// - `id`: Identifier of the constraint
    /// - `terms`: Pairs of variable and coefficient
    /// - `equals`: The right hand side of the equality
    ///
    /// # Examples
    /// ```rust
    /// use driversched_core::optimize::constraint::Constraint;
    /// use driversched_core::optimize::problem::Problem;
    /// use driversched_core::optimize::variable::VariableType;
    /// let mut problem = Problem::new_minimization();
    /// let x = problem.add_new_variable("x", VariableType::Integer, 0., 10.).unwrap();
    /// // Represents x = 0
    /// let constraint = Constraint::new_equality("x_off", &[(x, 1.0)], 0.);
    /// ```
    pub fn new_equality(id: &str, terms: &[(VariableId, f64)], equals: f64) -> Self {
        Constraint::Equality {
            id: id.to_string(),
            terms: Constraint::into_terms(terms),
            equals,
        }
    }

    /// Create a new inequality constraint
    ///
    /// # Parameters
    /// - `id`: Identifier of the constraint
    /// - `terms`: Pairs of variable and coefficient
    /// - `lower_bound`: The lowest value the constraint can take
    /// - `upper_bound`: The highest value the constraint can take
    pub fn new_inequality(
        id: &str,
        terms: &[(VariableId, f64)],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Constraint::Inequality {
            id: id.to_string(),
            terms: Constraint::into_terms(terms),
            lower_bound,
            upper_bound,
        }
    }

    /// Id of the constraint
    pub fn get_id(&self) -> &str {
        match self {
            Constraint::Equality { id, .. } | Constraint::Inequality { id, .. } => id,
        }
    }

    /// Terms of the constraint
    pub fn get_terms(&self) -> &[ConstraintTerm] {
        match self {
            Constraint::Equality { terms, .. } | Constraint::Inequality { terms, .. } => terms,
        }
    }

    /// Evaluate the left hand side of the constraint for a vector of variable values
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.get_terms()
            .iter()
            .map(|t| t.coefficient * values[t.variable.index()])
            .sum()
    }

    fn into_terms(terms: &[(VariableId, f64)]) -> Vec<ConstraintTerm> {
        terms
            .iter()
            .map(|(variable, coefficient)| ConstraintTerm {
                variable: *variable,
                coefficient: *coefficient,
            })
            .collect()
    }

    /// Convert a slice of terms into a String representation
    fn terms_to_string(terms: &[ConstraintTerm]) -> String {
        terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Equality { id, terms, equals } => {
                write!(f, "{}: {} = {}", id, Self::terms_to_string(terms), equals)
            }
            Constraint::Inequality {
                id,
                terms,
                lower_bound,
                upper_bound,
            } => write!(
                f,
                "{}: {} <= {} <= {}",
                id,
                lower_bound,
                Self::terms_to_string(terms),
                upper_bound
            ),
        }
    }
}

/// Represents a single term in a constraint, specifically
/// represents the multiplication of the `variable` by the `coefficient`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintTerm {
    /// The variable of the term
    pub variable: VariableId,
    /// The coefficient for the variable
    pub coefficient: f64,
}

impl Display for ConstraintTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*{}", self.coefficient, self.variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_and_display() {
        let cons = Constraint::new_inequality(
            "coverage",
            &[(VariableId(0), 2.), (VariableId(1), 2.)],
            5.,
            f64::INFINITY,
        );
        assert_eq!(cons.get_id(), "coverage");
        assert_eq!(cons.evaluate(&[1., 2.]), 6.);
        assert_eq!(cons.to_string(), "coverage: 5 <= 2*#0 + 2*#1 <= inf");

        let eq = Constraint::new_equality("off", &[(VariableId(1), 1.)], 0.);
        assert_eq!(eq.to_string(), "off: 1*#1 = 0");
    }
}
