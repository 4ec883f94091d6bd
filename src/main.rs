use clap::{Args, Parser as ClapParser, Subcommand};
use json_proc::{
    NumberPolicy,
    cli::{self, CliError, EMPTY_MARKER, LoadOptions, QueryOptions, ShowOptions},
};
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

#[derive(ClapParser)]
#[command(name = "json-proc")]
#[command(about = "Parse a JSON document and query it with select/filter/count/sum/get chains")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags that control how the JSON text becomes a document
#[derive(Args)]
struct ParseArgs {
    /// Reject malformed JSON instead of parsing leniently
    #[arg(long)]
    strict: bool,

    /// Treat only literals with '.', 'e' or 'E' as floats
    #[arg(long)]
    lexical_numbers: bool,
}

impl ParseArgs {
    fn options(&self) -> LoadOptions {
        let policy = if self.lexical_numbers {
            NumberPolicy::Lexical
        } else {
            NumberPolicy::Truncation
        };
        LoadOptions {
            policy,
            strict: self.strict,
        }
    }
}

#[derive(Args)]
struct LoadArgs {
    /// JSON file (reads from stdin if not provided)
    #[arg(short, long)]
    input: Option<PathBuf>,

    #[command(flatten)]
    parse: ParseArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more query lines, e.g. "select('students').count()"
    Query {
        /// Query lines to run, each on a fresh query
        #[arg(required = true)]
        queries: Vec<String>,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Print the document, or the part of it at PATH
    Show {
        /// Path such as 'students'.0
        #[arg(default_value = "")]
        path: String,

        /// Indent the output
        #[arg(short, long)]
        pretty: bool,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Run a query script and report lines whose output does not match
    Run {
        /// Script file: a JSON file name, then `<query> // <expected>` lines
        script: PathBuf,

        /// Directory holding the JSON file named by the script
        #[arg(short, long, default_value = ".")]
        resources: PathBuf,

        #[command(flatten)]
        parse: ParseArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query { queries, load } => run_query(queries, &load),
        Commands::Show { path, pretty, load } => run_show(path, pretty, &load),
        Commands::Run {
            script,
            resources,
            parse,
        } => run_script(script, resources, &parse.options()),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<Option<String>, CliError> {
    match path {
        Some(path) => Ok(Some(fs::read_to_string(path)?)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_query(queries: Vec<String>, load: &LoadArgs) -> Result<(), CliError> {
    let options = QueryOptions {
        queries,
        input: read_input(load.input.as_ref())?,
        load: load.parse.options(),
    };

    for output in cli::execute_queries(&options)? {
        println!("{}", output.as_deref().unwrap_or(EMPTY_MARKER));
    }
    Ok(())
}

fn run_show(path: String, pretty: bool, load: &LoadArgs) -> Result<(), CliError> {
    let options = ShowOptions {
        path,
        input: read_input(load.input.as_ref())?,
        load: load.parse.options(),
        pretty,
    };

    println!("{}", cli::execute_show(&options)?);
    Ok(())
}

fn run_script(script: PathBuf, resources: PathBuf, load: &LoadOptions) -> Result<(), CliError> {
    let report = cli::run_script_file(&script, &resources, load)?;

    for outcome in report.failures() {
        println!(
            "line {}: '{}'\n  expected: {}\n  got:      {}",
            outcome.line.number,
            outcome.line.query,
            outcome.line.expected.as_deref().unwrap_or("(no expectation)"),
            outcome.actual.as_deref().unwrap_or(EMPTY_MARKER),
        );
    }

    let report = report.into_result()?;
    println!("{} line(s) passed", report.outcomes.len());
    Ok(())
}
