use std::env;
use std::fs;

use anyhow::{anyhow, bail, Context};
use tracing::{info, Level};

use carbonize::config::{Command, Config, Output, USAGE};
use carbonize::errors::pretty::format_translate_error;
use carbonize::ir::printer::render_function;
use carbonize::pipeline::Translator;

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    match Config::from_args(args, |key| env::var(key).ok())? {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Repl(config) => {
            init_logging(config.log_level);
            carbonize::repl::run(config.translate_options())
                .map_err(|err| anyhow!("repl error: {}", err))
        }
        Command::Translate(config) => {
            init_logging(config.log_level);
            translate_file(&config)
        }
    }
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn translate_file(config: &Config) -> anyhow::Result<()> {
    let input = config
        .input
        .as_ref()
        .context("no input file configured")?;
    let label = input.display().to_string();
    let source =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;

    let translator = Translator::new(config.translate_options());
    let translation = translator
        .translate_source(&source)
        .map_err(|err| anyhow!(format_translate_error(&label, &source, &err)))?;

    for failure in &translation.failures {
        eprintln!("{}", format_translate_error(&label, &source, failure));
    }
    if config.dump_ir {
        for function in &translation.functions {
            eprintln!("{}", render_function(&function.ir));
        }
    }

    let output = translation.output();
    match &config.output {
        Output::Stdout => println!("{}", output),
        Output::File(path) => {
            fs::write(path, format!("{}\n", output))
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Carbon code written to: {}", path.display());
        }
    }
    info!(
        functions = translation.functions.len(),
        failures = translation.failures.len(),
        "translation finished"
    );

    if !translation.is_clean() {
        bail!(
            "{} function(s) failed to translate",
            translation.failures.len()
        );
    }
    Ok(())
}
