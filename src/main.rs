use clap::Parser;

mod args;
mod cef;

fn main() {
    let args = args::Args::parse();
    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    match cef::run_parse(args.input, args.out) {
        Ok(0) => {}
        Ok(num_rejected) => {
            eprintln!("{} line(s) could not be parsed", num_rejected);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("An error occured {}", e);
            std::process::exit(2);
        }
    }
}
