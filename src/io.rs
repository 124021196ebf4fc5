pub mod simple;

use super::{report, Assignment, Class, Student};
use std::fmt::Write;

/// Format the calculated class allocation into a human readable String (e.g. to print it to
/// stdout).
///
/// The output format will look like
/// ```text
/// ===== Class name (slot 3) =====
/// Anton Administrator *
/// Bertalotta Beispiel
///
/// ===== Another class name (slot 7) =====
///
/// ===== A third class name (slot 0) =====
/// …
/// ```
/// where `*` marks students, who got one of their top preferences.
pub fn format_assignment(
    assignment: &Assignment,
    classes: &[Class],
    students: &[Student],
) -> String {
    let mut result = String::new();
    for c in classes.iter() {
        write!(result, "\n===== {} (slot {}) =====\n", c.name, c.slot).unwrap();
        for (s, ac) in assignment.iter().enumerate() {
            if *ac == c.index {
                let student = &students[s];
                write!(
                    result,
                    "{}{}\n",
                    student.name,
                    if report::is_satisfied(student, c) {
                        " *"
                    } else {
                        ""
                    }
                )
                .unwrap();
            }
        }
    }
    result
}
