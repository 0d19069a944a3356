use spot_drill::cli;

fn main() {
    cli::run();
}
