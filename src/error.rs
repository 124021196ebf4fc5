//! Error types of the allocation process.

use thiserror::Error;

/// Reasons why no valid allocation exists for a (well-formed) problem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Infeasibility {
    #[error("Minimum class sizes add up to {total_min}, but there are only {students} students")]
    MinimumExceedsStudents { total_min: usize, students: usize },

    #[error("Maximum class sizes add up to {total_max}, which is not enough for {students} students")]
    CapacityBelowStudents { total_max: usize, students: usize },

    #[error("Minimum satisfaction of {minimum_satisfaction} is higher than the number of students ({students})")]
    SatisfactionExceedsStudents {
        minimum_satisfaction: usize,
        students: usize,
    },

    #[error("No classes to allocate {students} students to")]
    NoClasses { students: usize },

    #[error("Only {flow} of {students} students can be allocated within the constraints")]
    FlowDeficit { flow: usize, students: usize },
}

#[derive(Debug, Error)]
pub enum AllocationError {
    /// There is no allocation satisfying all constraints
    #[error("No feasible allocation: {0}")]
    Infeasible(#[from] Infeasibility),

    /// The input data violates the preconditions of the solver
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// The solved flow network is inconsistent. This is a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AllocationError {
    /// True if the error means that the problem has no solution (in contrast to invalid input or
    /// an internal error)
    pub fn is_infeasible(&self) -> bool {
        matches!(self, AllocationError::Infeasible(_))
    }
}
