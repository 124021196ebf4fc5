//! IO functionality for the simple JSON file formats of this program.
//!
//! The input file contains the students and classes (canonical serde_json serialization of
//! `Student` and `Class` objects) and optionally the minimum satisfaction. The output file
//! contains the assignment as list of class indexes.

use crate::{Assignment, Class, Student};
use log::warn;
use serde_json::json;

const INPUT_FORMAT: &str = "X-campusdata-simple";
const OUTPUT_FORMAT: &str = "X-campusassignment-simple";
const VERSION: &str = "1.0";

/// Problem data read from an input file
#[derive(Debug)]
pub struct InputData {
    pub students: Vec<Student>,
    pub classes: Vec<Class>,
    /// Minimum number of students to be satisfied, if given in the file
    pub minimum_satisfaction: Option<usize>,
}

/// Read the list of students and classes from the simple JSON representation.
///
/// Indexes of students and classes are assigned by their position in the file.
///
/// # Errors
///
/// Fails with a string error message to be displayed to the user, if
/// * the file has invalid JSON syntax or any field has an invalid type
/// * the file is marked with a different format
/// * any class has a minimum size larger than its maximum size
pub fn read<R: std::io::Read>(reader: R) -> Result<InputData, String> {
    let mut data: serde_json::Value =
        serde_json::from_reader(reader).map_err(|err| err.to_string())?;
    if !data.is_object() {
        return Err("Input data is not a JSON object.".to_owned());
    }

    match data.get("format").and_then(|v| v.as_str()) {
        Some(INPUT_FORMAT) | None => (),
        Some(f) => return Err(format!("Unexpected file format '{}'", f)),
    }
    if let Some(v) = data.get("version").and_then(|v| v.as_str()) {
        if v != VERSION {
            warn!("Input file has version {}, expected {}.", v, VERSION);
        }
    }

    let mut students: Vec<Student> =
        serde_json::from_value(data["students"].take()).map_err(|e| format!("{}", e))?;
    for (i, s) in students.iter_mut().enumerate() {
        s.index = i;
    }
    let mut classes: Vec<Class> =
        serde_json::from_value(data["classes"].take()).map_err(|e| format!("{}", e))?;
    for (i, c) in classes.iter_mut().enumerate() {
        c.index = i;
        if c.num_min > c.num_max {
            return Err(format!(
                "Class {} ({}) has minimum size {} larger than maximum size {}",
                i, c.name, c.num_min, c.num_max
            ));
        }
    }
    let minimum_satisfaction = match data.get("minimum_satisfaction") {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => Some(
            v.as_u64()
                .ok_or("'minimum_satisfaction' is not a non-negative integer")? as usize,
        ),
    };

    Ok(InputData {
        students,
        classes,
        minimum_satisfaction,
    })
}

/// Write the calculated assignment as simple JSON representation to a Writer (e.g. an output
/// file). `None` is written as `null` assignment, for problems without a feasible solution.
pub fn write<W: std::io::Write>(
    writer: W,
    assignment: Option<&Assignment>,
    satisfied: usize,
) -> Result<(), String> {
    let a: serde_json::Value = serde_json::to_value(assignment).map_err(|e| format!("{}", e))?;
    let data = json!({
        "format": OUTPUT_FORMAT,
        "version": VERSION,
        "assignment": a,
        "satisfied": satisfied,
    });
    serde_json::to_writer(writer, &data).map_err(|e| format!("{}", e))?;

    Ok(())
}

/// Write the list of students and classes to the simple JSON representation.
pub fn write_input_data<W: std::io::Write>(
    writer: W,
    students: &[Student],
    classes: &[Class],
    minimum_satisfaction: usize,
) -> Result<(), String> {
    let s: serde_json::Value = serde_json::to_value(students).map_err(|e| format!("{}", e))?;
    let c: serde_json::Value = serde_json::to_value(classes).map_err(|e| format!("{}", e))?;
    let data = json!({
        "format": INPUT_FORMAT,
        "version": VERSION,
        "minimum_satisfaction": minimum_satisfaction,
        "students": s,
        "classes": c,
    });
    serde_json::to_writer(writer, &data).map_err(|e| format!("{}", e))?;

    Ok(())
}
