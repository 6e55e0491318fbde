//! Direction command implementation

use std::process::ExitCode;

use crate::direction::Direction;
use crate::duration::format_number;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the direction command
pub fn run_direction(angle: f64, json: bool) -> ExitCode {
    let direction = Direction::from_degrees(angle);

    if json {
        match serde_json::to_string(&direction) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: failed to serialize direction: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("x:          {}", format_number(direction.x));
        println!("y:          {}", format_number(direction.y));
        println!("iterations: {}", direction.iterations);
    }

    ExitCode::from(EXIT_SUCCESS)
}
