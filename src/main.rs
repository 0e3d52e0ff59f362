//! recipegen's command-line entry point.

use recipegen::{cli::get_args, cli::run, error::default_error_handler, logger::init_logger};

fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}
