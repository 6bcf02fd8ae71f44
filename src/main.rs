use std::process::ExitCode;

fn main() -> ExitCode {
    match yolo_curate::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
