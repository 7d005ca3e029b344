use std::io::{self, Read};
use std::path::PathBuf;

use attrql::cli::{self, CheckOptions, CheckResult, CliError, FacetOptions};
use attrql::output;
use clap::{Parser as ClapParser, Subcommand};

#[derive(ClapParser)]
#[command(name = "attrql")]
#[command(about = "attrql - compile attribute search expressions into filter predicates")]
#[command(version)]
struct Cli {
    /// TOML file declaring the attribute table (defaults to the built-in table)
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `attrql=trace` (overrides ATTRQL_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query; filter records when they are given
    Check {
        /// The search query
        query: String,

        /// JSON records (reads from stdin if piped)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print the token stream of a query
    Tokens {
        /// The search query
        query: String,
    },

    /// Count records per value of a facet column
    Facet {
        /// Attribute, optionally written as a rule (`electrodes >= 32`)
        column: String,

        /// Only count records matching this query
        #[arg(short, long)]
        query: Option<String>,

        /// JSON records (reads from stdin if piped)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List the attribute table
    Attributes,

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'attrql docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.log_level.as_deref());

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Check {
            query,
            input,
            pretty,
            syntax_only,
        } => {
            let compiler = cli::load_compiler(cli.schema.as_deref())?;
            let options = CheckOptions {
                query,
                input: read_input(input)?,
                syntax_only,
            };

            match cli::execute_check(&compiler, &options)? {
                CheckResult::SyntaxValid => println!("Syntax is valid"),
                CheckResult::Compiled(predicate) => {
                    println!("{}", output::render(&predicate, pretty)?)
                }
                CheckResult::Matches(records) => println!("{}", output::render(&records, pretty)?),
            }
        }
        Commands::Tokens { query } => {
            let compiler = cli::load_compiler(cli.schema.as_deref())?;
            for token in cli::execute_tokens(&compiler, &query)? {
                println!("{}", token);
            }
        }
        Commands::Facet {
            column,
            query,
            input,
            pretty,
        } => {
            let compiler = cli::load_compiler(cli.schema.as_deref())?;
            let options = FacetOptions {
                column,
                query,
                input: read_input(input)?,
            };
            let counts = cli::execute_facet(&compiler, &options)?;
            println!("{}", output::render(&counts, pretty)?);
        }
        Commands::Attributes => {
            let compiler = cli::load_compiler(cli.schema.as_deref())?;
            for attribute in compiler.table().entries() {
                println!("{:<16}{}", attribute.name, attribute.path);
            }
        }
        Commands::Docs => print!("{}", cli::get_docs_overview()),
        Commands::Doc { category } => print!("{}", cli::get_doc_category(&category)?),
    }
    Ok(())
}

/// Use `--input` when given, else piped stdin, else nothing.
fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer).filter(|s| !s.trim().is_empty()))
        }
        None => Ok(None),
    }
}
