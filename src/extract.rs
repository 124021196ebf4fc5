//! Translation of a solved allocation network into an assignment of students to classes.
//!
//! Every student with one unit of flow is followed along their flow: Either via a preferred slot
//! node or via the overflow nodes to a class. As multiple students' flow may be merged in a slot
//! node (and in the overflow nodes), we can't tell which unit belongs to which student. Instead,
//! each student takes the first edge (in order of insertion) towards a class, that still carries
//! unconsumed flow, and consumes one unit from it. By flow conservation, there are exactly enough
//! units for all students, so the result satisfies all class size bounds.
//!
//! The flow values in the network itself are not changed; consumed units are tracked separately.

use crate::error::AllocationError;
use crate::flow::Flow;
use crate::network::{AllocationNetwork, EdgeKind, NodeRole, OverflowHop};
use crate::Assignment;
use log::debug;

/// Extract the assignment from a network, whose flow has a value equal to the number of students.
///
/// # Errors
///
/// Fails with `AllocationError::Internal` if any student's flow can't be traced to a class, which
/// means that the flow is not a valid maximum flow.
pub fn extract_assignment(network: &AllocationNetwork) -> Result<Assignment, AllocationError> {
    let graph = network.graph();
    // Unconsumed flow of each edge, indexed by the edge's index
    let mut remaining: Vec<Flow> = graph.edges().map(|(_, edge)| edge.flow()).collect();

    let num_students = network.layout().num_students();
    let mut assignment = Assignment::with_capacity(num_students);
    let mut num_satisfied = 0usize;
    for i in 0..num_students {
        let (_, kind) = network
            .edges_from(NodeRole::Student(i))
            .find(|(e, _)| remaining[e.index()] > 0)
            .ok_or_else(|| {
                AllocationError::Internal(format!("Student {} has no outgoing flow", i))
            })?;

        let class = match kind {
            EdgeKind::Preference { slot, .. } => {
                num_satisfied += 1;
                take_class_edge(network, NodeRole::Slot(slot), &mut remaining)
            }
            EdgeKind::Overflow(OverflowHop::Enter { .. }) => {
                take_class_edge(network, NodeRole::OverflowOut, &mut remaining)
            }
            k => {
                return Err(AllocationError::Internal(format!(
                    "Student {} has flow on unexpected edge {:?}",
                    i, k
                )))
            }
        };
        match class {
            Some(c) => assignment.push(c),
            None => {
                return Err(AllocationError::Internal(format!(
                    "Flow of student {} does not reach any class via {:?}",
                    i, kind
                )))
            }
        }
    }

    debug!(
        "Extracted assignment with {} of {} students in preferred slots.",
        num_satisfied, num_students
    );
    Ok(assignment)
}

/// Consume one unit of flow from the first edge leaving the node of `role` towards a class, which
/// still has flow left. Returns the class's index.
fn take_class_edge(
    network: &AllocationNetwork,
    role: NodeRole,
    remaining: &mut [Flow],
) -> Option<usize> {
    let (e, class) = network.edges_from(role).find_map(|(e, kind)| {
        let class = match kind {
            EdgeKind::Slot { class, .. } => class,
            EdgeKind::Overflow(OverflowHop::Exit { class }) => class,
            _ => return None,
        };
        if remaining[e.index()] > 0 {
            Some((e, class))
        } else {
            None
        }
    })?;
    remaining[e.index()] -= 1;
    Some(class)
}

#[cfg(test)]
mod tests {
    use super::extract_assignment;
    use crate::error::AllocationError;
    use crate::maxflow::EdmondsKarp;
    use crate::network::{AllocationNetwork, NodeRole};
    use crate::{Class, Student};

    fn student(index: usize, preferences: Vec<usize>) -> Student {
        Student {
            index,
            name: format!("Student {}", index),
            preferences,
        }
    }

    fn class(index: usize, slot: usize, num_min: usize, num_max: usize) -> Class {
        Class {
            index,
            name: format!("Class {}", index),
            slot,
            num_min,
            num_max,
        }
    }

    fn solved_network(
        students: &[Student],
        classes: &[Class],
        minimum_satisfaction: usize,
    ) -> AllocationNetwork {
        let mut network =
            AllocationNetwork::build(students, classes, minimum_satisfaction).unwrap();
        let (source, sink) = (network.source(), network.super_sink());
        let flow = EdmondsKarp::new(network.graph().num_nodes()).run(
            network.graph_mut(),
            source,
            sink,
        );
        assert_eq!(flow, students.len() as i64);
        network
    }

    #[test]
    fn test_shared_slot() {
        // Both classes are held at slot 3; everyone wants slot 3. Class 0 must take two students
        let students: Vec<Student> = (0..4).map(|i| student(i, vec![3])).collect();
        let classes = vec![class(0, 3, 2, 2), class(1, 3, 1, 4)];
        let network = solved_network(&students, &classes, 4);

        let assignment = extract_assignment(&network).unwrap();
        assert_eq!(assignment.len(), 4);
        assert_eq!(assignment.iter().filter(|c| **c == 0).count(), 2);
        assert_eq!(assignment.iter().filter(|c| **c == 1).count(), 2);
    }

    #[test]
    fn test_overflow_students() {
        // Student 2 only wants slot 7, which is not offered. Class 1 must be filled via overflow
        let students = vec![student(0, vec![1]), student(1, vec![1]), student(2, vec![7])];
        let classes = vec![class(0, 1, 1, 2), class(1, 2, 1, 1)];
        let network = solved_network(&students, &classes, 1);

        let assignment = extract_assignment(&network).unwrap();
        assert_eq!(assignment.len(), 3);
        assert_eq!(assignment.iter().filter(|c| **c == 0).count(), 2);
        assert_eq!(assignment.iter().filter(|c| **c == 1).count(), 1);
    }

    #[test]
    fn test_network_is_not_modified() {
        let students = vec![student(0, vec![0]), student(1, vec![0])];
        let classes = vec![class(0, 0, 0, 2)];
        let network = solved_network(&students, &classes, 2);
        let flows_before: Vec<i64> = network
            .graph()
            .forward_edges()
            .map(|e| network.graph().flow(e))
            .collect();

        assert_eq!(extract_assignment(&network).unwrap(), vec![0, 0]);
        let flows_after: Vec<i64> = network
            .graph()
            .forward_edges()
            .map(|e| network.graph().flow(e))
            .collect();
        assert_eq!(flows_before, flows_after);
    }

    #[test]
    fn test_missing_flow() {
        // Unsolved network: No student has any flow
        let students = vec![student(0, vec![0])];
        let classes = vec![class(0, 0, 0, 1)];
        let network = AllocationNetwork::build(&students, &classes, 0).unwrap();
        assert!(network.edges_from(NodeRole::Student(0)).count() > 0);

        let result = extract_assignment(&network);
        assert!(matches!(result, Err(AllocationError::Internal(_))));
    }
}
