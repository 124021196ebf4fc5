use campusflow::io::simple;
use campusflow::{report, AllocationError};

use clap::{command, value_parser, Arg, ArgAction, ArgMatches};
use log::{error, info, warn};

/// Exit status for problems without a feasible allocation
const EXIT_INFEASIBLE: exitcode::ExitCode = 1;

fn main() {
    env_logger::init();
    let args = command!()
        .arg(
            Arg::new("INPUT")
                .help("Input JSON file with students and classes")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("OUTPUT")
                .short('o')
                .long("output")
                .help("Write the assignment as JSON to this file"),
        )
        .arg(
            Arg::new("min_satisfaction")
                .short('s')
                .long("min-satisfaction")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help(
                    "Minimum number of students to be placed at one of their top preferences. \
                    Overrides the value from the input file.",
                ),
        )
        .arg(
            Arg::new("print")
                .short('p')
                .long("print")
                .action(ArgAction::SetTrue)
                .help("Print the assignment to stdout"),
        )
        .get_matches();

    std::process::exit(run(&args));
}

fn run(args: &ArgMatches) -> exitcode::ExitCode {
    let input_path = match args.get_one::<String>("INPUT") {
        Some(p) => p,
        None => return exitcode::USAGE,
    };
    let file = match std::fs::File::open(input_path) {
        Ok(f) => f,
        Err(e) => {
            error!("Could not open input file {}: {}", input_path, e);
            return exitcode::NOINPUT;
        }
    };
    let input = match simple::read(std::io::BufReader::new(file)) {
        Ok(d) => d,
        Err(e) => {
            error!("Could not read input file: {}", e);
            return exitcode::DATAERR;
        }
    };
    info!(
        "Read {} students and {} classes.",
        input.students.len(),
        input.classes.len()
    );

    let minimum_satisfaction = match args.get_one::<usize>("min_satisfaction") {
        Some(s) => *s,
        None => input.minimum_satisfaction.unwrap_or_else(|| {
            warn!("No minimum satisfaction given. Assuming 0.");
            0
        }),
    };

    let (result, status) =
        match campusflow::solve(&input.students, &input.classes, minimum_satisfaction) {
            Ok(assignment) => (Some(assignment), exitcode::OK),
            Err(AllocationError::Infeasible(reason)) => {
                error!("No feasible allocation: {}", reason);
                (None, EXIT_INFEASIBLE)
            }
            Err(e @ AllocationError::Malformed(_)) => {
                error!("{}", e);
                return exitcode::DATAERR;
            }
            Err(e @ AllocationError::Internal(_)) => {
                error!("{}", e);
                return exitcode::SOFTWARE;
            }
        };

    let mut satisfied = 0;
    if let Some(assignment) = result.as_ref() {
        if let Err(e) = report::check_assignment(
            &input.students,
            &input.classes,
            assignment,
            minimum_satisfaction,
        ) {
            error!("Calculated assignment is invalid: {}", e);
            return exitcode::SOFTWARE;
        }
        satisfied = report::satisfied_count(&input.students, &input.classes, assignment);
        info!(
            "{} of {} students got one of their top preferences.",
            satisfied,
            input.students.len()
        );
        if args.get_flag("print") {
            print!(
                "{}",
                campusflow::io::format_assignment(assignment, &input.classes, &input.students)
            );
        }
    }

    if let Some(output_path) = args.get_one::<String>("OUTPUT") {
        let file = match std::fs::File::create(output_path) {
            Ok(f) => f,
            Err(e) => {
                error!("Could not create output file {}: {}", output_path, e);
                return exitcode::CANTCREAT;
            }
        };
        if let Err(e) = simple::write(std::io::BufWriter::new(file), result.as_ref(), satisfied) {
            error!("Could not write output file: {}", e);
            return exitcode::IOERR;
        }
        info!("Assignment written to {}.", output_path);
    }

    status
}
