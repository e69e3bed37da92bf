use risk_dashboard::cli::cli_main;
use risk_dashboard::print_err;

fn main() {
    if let Err(e) = cli_main() {
        print_err!("{e:#}");
        std::process::exit(1);
    }
}
