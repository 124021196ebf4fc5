//! Allocation of students to classes by maximum flow.
//!
//! Every student has to be placed in exactly one class. Each class is held at a fixed time slot
//! and has a minimum and maximum number of students, and a given number of students must get a
//! class at one of their five most preferred time slots. The problem is reduced to a single
//! maximum flow computation on a layered network (see `network`), which is solved by the
//! Edmonds–Karp algorithm (see `maxflow`). The assignment is then read back from the flow
//! (see `extract`).

pub mod error;
pub mod extract;
pub mod flow;
pub mod io;
pub mod maxflow;
pub mod network;
pub mod report;

use log::{debug, info};
use serde::{Deserialize, Serialize};

pub use error::{AllocationError, Infeasibility};

/// Number of distinct time slots a class can be held at
pub const NUM_SLOTS: usize = 20;
/// Number of leading entries in a student's preference list, that count as satisfied preferences
pub const TOP_PREFERENCES: usize = 5;

/// Representation of a student's data
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Student {
    /// id/index of the Student in the list of students
    #[serde(skip)]
    pub index: usize,
    /// Student's name. Mainly used for info/debug output
    #[serde(default)]
    pub name: String,
    /// Preferred time slots of the student in descending order of preference
    pub preferences: Vec<usize>,
}

impl Student {
    /// The preferred time slots, that count towards the minimum satisfaction
    pub fn top_preferences(&self) -> &[usize] {
        &self.preferences[..self.preferences.len().min(TOP_PREFERENCES)]
    }
}

/// Representation of a proposed class
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Class {
    /// id/index of the Class in the list of classes
    #[serde(skip)]
    pub index: usize,
    /// Class's name. Mainly used for info/debug output
    #[serde(default)]
    pub name: String,
    /// Time slot the class is held at
    pub slot: usize,
    /// Minimum number of students
    pub num_min: usize,
    /// Maximum number of students
    pub num_max: usize,
}

/// Result of the allocation: The class index for each student (in the order of the student list)
pub type Assignment = Vec<usize>;

/// Main entry point: calculate an assignment of all students to the classes, such that every
/// class's size is within its bounds and at least `minimum_satisfaction` students are placed in
/// a class at one of their top preferences.
///
/// Any assignment satisfying the constraints may be returned; for a given input, the result is
/// deterministic.
///
/// # Errors
///
/// * `AllocationError::Infeasible` if no such assignment exists
/// * `AllocationError::Malformed` if a class has `num_min > num_max`
/// * `AllocationError::Internal` if the solved flow network could not be translated into an
///   assignment. This is a bug, not a property of the input.
pub fn solve(
    students: &[Student],
    classes: &[Class],
    minimum_satisfaction: usize,
) -> Result<Assignment, AllocationError> {
    if students.is_empty() {
        debug!("No students given, returning empty assignment.");
        return Ok(Assignment::new());
    }
    if classes.is_empty() {
        return Err(Infeasibility::NoClasses {
            students: students.len(),
        }
        .into());
    }

    let mut network = network::AllocationNetwork::build(students, classes, minimum_satisfaction)?;
    let (source, sink) = (network.source(), network.super_sink());
    let flow = maxflow::EdmondsKarp::new(network.graph().num_nodes()).run(
        network.graph_mut(),
        source,
        sink,
    );

    let n = students.len();
    if flow != n as flow::Flow {
        info!(
            "Maximum flow of {} is less than the number of students ({}). No allocation possible.",
            flow, n
        );
        return Err(Infeasibility::FlowDeficit {
            flow: flow as usize,
            students: n,
        }
        .into());
    }

    let assignment = extract::extract_assignment(&network)?;
    info!(
        "Found allocation of {} students to {} classes.",
        students.len(),
        classes.len()
    );
    Ok(assignment)
}

/// Entry point working on plain tuples: `preferences[i]` is the preference list of student `i`,
/// `pools[j]` is the `(slot, minimum, maximum)` triple of class `j`.
///
/// Students and classes are named by their index. See `solve()` for the semantics and errors.
/// Additionally, fails with `AllocationError::Malformed` if the lists' lengths don't match the
/// given counts.
pub fn solve_allocation(
    n: usize,
    m: usize,
    preferences: &[Vec<usize>],
    pools: &[(usize, usize, usize)],
    minimum_satisfaction: usize,
) -> Result<Assignment, AllocationError> {
    if preferences.len() != n {
        return Err(AllocationError::Malformed(format!(
            "Expected preferences of {} students, got {}",
            n,
            preferences.len()
        )));
    }
    if pools.len() != m {
        return Err(AllocationError::Malformed(format!(
            "Expected {} classes, got {}",
            m,
            pools.len()
        )));
    }

    let students: Vec<Student> = preferences
        .iter()
        .enumerate()
        .map(|(index, p)| Student {
            index,
            name: format!("Student {}", index),
            preferences: p.clone(),
        })
        .collect();
    let classes: Vec<Class> = pools
        .iter()
        .enumerate()
        .map(|(index, (slot, num_min, num_max))| Class {
            index,
            name: format!("Class {}", index),
            slot: *slot,
            num_min: *num_min,
            num_max: *num_max,
        })
        .collect();

    solve(&students, &classes, minimum_satisfaction)
}

/// Check consistency of the indexes of students and classes. Panics if they don't match their
/// position in the lists.
pub fn assert_data_consistency(students: &[Student], classes: &[Class]) {
    for (i, s) in students.iter().enumerate() {
        assert_eq!(i, s.index, "Index of student {} is {}", i, s.index);
    }
    for (i, c) in classes.iter().enumerate() {
        assert_eq!(i, c.index, "Index of class {} is {}", i, c.index);
        assert!(
            c.num_min <= c.num_max,
            "Class {} has min size {} > max size {}",
            i,
            c.num_min,
            c.num_max
        );
    }
}
