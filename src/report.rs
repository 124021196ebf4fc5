//! Evaluation of (not necessarily flow-generated) assignments: class sizes, satisfaction and
//! validity with respect to the allocation constraints.

use crate::{Assignment, Class, Student};

/// Number of students assigned to each class. Entries of `assignment` beyond the class list are
/// ignored.
pub fn class_sizes(classes: &[Class], assignment: &Assignment) -> Vec<usize> {
    let mut sizes = vec![0usize; classes.len()];
    for c in assignment.iter() {
        if let Some(size) = sizes.get_mut(*c) {
            *size += 1;
        }
    }
    sizes
}

/// True if the class is held at one of the student's top preferences
pub fn is_satisfied(student: &Student, class: &Class) -> bool {
    student.top_preferences().contains(&class.slot)
}

/// Number of students assigned to a class at one of their top preferences
pub fn satisfied_count(students: &[Student], classes: &[Class], assignment: &Assignment) -> usize {
    students
        .iter()
        .zip(assignment.iter())
        .filter(|(s, c)| classes.get(**c).map_or(false, |class| is_satisfied(s, class)))
        .count()
}

/// Check that the assignment is a valid solution: it covers every student with a valid class
/// index, all class sizes are within their bounds and at least `minimum_satisfaction` students
/// are satisfied.
///
/// Returns a human readable description of the first violation found.
pub fn check_assignment(
    students: &[Student],
    classes: &[Class],
    assignment: &Assignment,
    minimum_satisfaction: usize,
) -> Result<(), String> {
    if assignment.len() != students.len() {
        return Err(format!(
            "Assignment has {} entries for {} students",
            assignment.len(),
            students.len()
        ));
    }
    if let Some((s, c)) = assignment
        .iter()
        .enumerate()
        .find(|(_, c)| **c >= classes.len())
    {
        return Err(format!("Student {} is assigned to unknown class {}", s, c));
    }

    for (class, size) in classes.iter().zip(class_sizes(classes, assignment)) {
        if size < class.num_min || size > class.num_max {
            return Err(format!(
                "Class {} ({}) has {} students, allowed are {} to {}",
                class.index, class.name, size, class.num_min, class.num_max
            ));
        }
    }

    let satisfied = satisfied_count(students, classes, assignment);
    if satisfied < minimum_satisfaction {
        return Err(format!(
            "Only {} students got a preferred slot, {} required",
            satisfied, minimum_satisfaction
        ));
    }
    Ok(())
}
