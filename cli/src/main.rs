//! Binary entrypoint for fontreg (made by FontLab https://www.fontlab.com/)

fn main() {
    if let Err(err) = fontreg_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
