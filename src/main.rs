use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use caprename::processor::{process_file, Options};
use caprename::Error;

/// Show the BIOS info of an ASUS capsule and save it under its expected name
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// .CAP capsule or the .ZIP it was downloaded in
    input_file: PathBuf,
    /// Save the capsule into this directory under its expected name
    #[clap(long, short)]
    output_dir: Option<PathBuf>,
    /// Declared media type of the input, e.g. application/zip
    #[clap(long)]
    media_type: Option<String>,
    /// Print the BIOS info as JSON
    #[clap(long, action)]
    json: bool,
    /// Hexdump the raw BIOS info record
    #[clap(long, action)]
    dump: bool,
    #[clap(long, short, action)]
    verbose: bool,
}

fn run(args: Args) -> Result<(), Error> {
    let data = fs::read(&args.input_file)?;
    let input_filename = args.input_file.file_name().and_then(|s| s.to_str());

    let options = Options {
        output_dir: args.output_dir,
        media_type: args.media_type,
        json: args.json,
        dump: args.dump,
    };

    process_file(&data, input_filename, &options)?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env).init();
    debug!("{:?}", args);

    let input = args.input_file.display().to_string();
    if let Err(e) = run(args) {
        eprintln!("{}: {}", input, e);
        std::process::exit(1);
    }
}
