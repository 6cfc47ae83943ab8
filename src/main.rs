use synclog::ui::output;

fn main() {
    if let Err(err) = synclog::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
