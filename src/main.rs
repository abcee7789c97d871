use std::{fs, path::PathBuf, process::exit, time::Instant};

use anyhow::{anyhow, bail, Context as _, Result};
use clap::Parser;
use inkwell::context::Context;
use letc::{
    ast::printer::dump, compile_source, compiler::compiler::run_function, display_error,
    CompileOptions,
};
use log::info;

/// Compiles a source file to LLVM IR
#[derive(Parser, Debug)]
#[command(name = "letc", version)]
struct Cli {
    /// Input source file
    input: PathBuf,
    /// Output path for the textual IR (defaults to the input with `.ll`)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Target triple recorded in the module
    #[arg(long)]
    target: Option<String>,
    /// Print the typed tree before lowering
    #[arg(long)]
    dump_ast: bool,
    /// JIT-run `main` after compiling
    #[arg(long)]
    run: bool,
}

fn run(cli: Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input file {:?}", cli.input))?;
    let file_name = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("shell"));
    let module_name = cli
        .input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("main"));

    let options = CompileOptions {
        module_name,
        target_triple: cli.target.clone(),
    };

    let context = Context::create();
    let start = Instant::now();
    let (ast, module) = match compile_source(&context, &source, &file_name, &options) {
        Ok(compiled) => compiled,
        Err(error) => {
            display_error(&error, cli.input.clone());
            bail!("compilation of {:?} failed", cli.input);
        }
    };
    info!("compiled in {:?}", start.elapsed());

    if cli.dump_ast {
        println!("{}", dump(&ast, ast.root()));
    }

    let output = cli.output.clone().unwrap_or_else(|| cli.input.with_extension("ll"));
    module
        .print_to_file(&output)
        .map_err(|error| anyhow!("failed to write IR to {:?}: {}", output, error))?;
    info!("wrote IR to {:?}", output);

    if cli.run {
        run_function(&module, "main").map_err(|error| anyhow!("{}", error))?;
    }

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(error) = run(Cli::parse()) {
        eprintln!("error: {:#}", error);
        exit(1);
    }
}
