//! `langton`: compile expressions and print their bytecode

use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::info;

use langton::{parser::DEFAULT_MAX_DEPTH, Transpiler};

/// Compiled when no expression is given
const DEMO_EXPR: &str = "1 + 2 + (40 + -3)";

#[derive(Debug, Parser)]
#[command(
    name = "langton",
    version,
    about = "Compile arithmetic expressions into stack machine bytecode"
)]
struct Opt {
    /// Expressions to compile, each printed in turn
    #[arg(conflicts_with = "file")]
    exprs: Vec<String>,

    /// Read one expression from a file (- for stdin)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print `;; expr: <source>` before each bytecode
    #[arg(long)]
    header: bool,

    /// Reject `true`/`false` literals
    #[arg(long = "no-bool")]
    no_bool: bool,

    /// Nesting limit of an expression
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .try_init();
}

fn read_source(path: &Path, stdin: impl Read) -> Result<String> {
    let source = if path == Path::new("-") {
        io::read_to_string(stdin).context("failed to read stdin")?
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    Ok(source)
}

fn run(opt: Opt, stdin: impl Read, out: &mut impl Write) -> Result<()> {
    let transpiler = Transpiler::new()
        .with_boolean_literals(!opt.no_bool)
        .with_max_depth(opt.max_depth);

    let sources = match (&opt.file, opt.exprs.is_empty()) {
        (Some(path), _) => vec![read_source(path, stdin)?],
        (None, true) => {
            info!("no expression given, compiling the demo expression");
            vec![DEMO_EXPR.to_string()]
        }
        (None, false) => opt.exprs,
    };

    for source in &sources {
        let code = transpiler
            .compile(source)
            .with_context(|| format!("failed to compile `{}`", source.trim()))?;
        if opt.header {
            writeln!(out, ";; expr: {}", source.trim())?;
        }
        write!(out, "{}", code.encode())?;
    }

    Ok(())
}

/// Run and report a failure on `err_out`. Returns the process exit code.
fn execute(opt: Opt, stdin: impl Read, out: &mut impl Write, err_out: &mut impl Write) -> u8 {
    match run(opt, stdin, out) {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(err_out, "error: {:#}", err);
            1
        }
    }
}

fn main() -> ExitCode {
    let opt = Opt::parse();
    init_logger(opt.verbose);

    let code = execute(
        opt,
        io::stdin(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    ExitCode::from(code)
}
