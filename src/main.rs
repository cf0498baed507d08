use clap::Parser;

use fire_freedom::cli::{self, Cli};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli::run(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
