use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use powerset::automaton::{
    Automaton, AutomatonError, Dfa, ExecutionCursor, Nfa, Step, split_symbols,
};
use powerset::loader::{self, AutomatonKind, LoadedAutomaton};
use powerset::render::DfaSnapshot;
use powerset::table::TransitionTable;

/// Simulate finite automata and convert NFAs to DFAs
#[derive(Parser, Debug)]
#[command(name = "powerset", version, about, long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an NFA document into a DFA and print its transition table
    Convert {
        #[command(flatten)]
        source: Source,

        /// Write the DFA as Graphviz DOT
        #[arg(long, value_name = "FILE")]
        dot: Option<PathBuf>,

        /// Write the DFA as a JSON document
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Test inputs for acceptance, or read them interactively when none are given
    Run {
        #[command(flatten)]
        source: Source,

        /// Convert an NFA to a DFA before testing
        #[arg(long)]
        convert: bool,

        /// Inputs to test, one symbol per character
        inputs: Vec<String>,
    },
    /// Run a DFA over one input a symbol at a time
    Step {
        #[command(flatten)]
        source: Source,

        /// Input to run, one symbol per character
        input: String,

        /// Write the final snapshot, last move highlighted, as Graphviz DOT
        #[arg(long, value_name = "FILE")]
        dot: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct Source {
    /// Automaton document (JSON)
    file: PathBuf,

    /// Kind of automaton, for documents that do not declare one
    #[arg(long, value_enum)]
    kind: Option<AutomatonKind>,
}

impl Source {
    fn load(&self) -> Result<LoadedAutomaton> {
        let automaton = loader::load_path(&self.file, self.kind)
            .with_context(|| format!("failed to load {}", self.file.display()))?;
        info!(file = %self.file.display(), kind = %automaton.kind(), "automaton loaded");
        Ok(automaton)
    }
}

enum Machine {
    Nfa(Nfa),
    Dfa(Dfa),
}

impl Machine {
    fn accepts(&self, input: &str) -> Result<bool, AutomatonError> {
        match self {
            Machine::Nfa(nfa) => nfa.accepts_str(input),
            Machine::Dfa(dfa) => dfa.accepts_str(input),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Convert { source, dot, json } => convert(&source, dot.as_deref(), json.as_deref()),
        Command::Run {
            source,
            convert,
            inputs,
        } => run(&source, convert, &inputs),
        Command::Step { source, input, dot } => step(&source, &input, dot.as_deref()),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn to_dfa(automaton: LoadedAutomaton) -> Dfa {
    match automaton {
        LoadedAutomaton::Dfa(dfa) => dfa,
        LoadedAutomaton::Nfa(nfa) => {
            let dfa = nfa.to_dfa();
            info!(
                nfa_states = nfa.states().len(),
                dfa_states = dfa.states().len(),
                dead_state = dfa.dead_state().is_some(),
                "converted NFA to DFA"
            );
            dfa
        }
    }
}

fn convert(source: &Source, dot: Option<&Path>, json: Option<&Path>) -> Result<()> {
    let nfa = match source.load()? {
        LoadedAutomaton::Nfa(nfa) => nfa,
        LoadedAutomaton::Dfa(_) => bail!(
            "{} describes a DFA; use `run` or pass --kind nfa",
            source.file.display()
        ),
    };
    let dfa = to_dfa(LoadedAutomaton::Nfa(nfa));
    println!("{}", TransitionTable::new(&dfa));

    if let Some(path) = dot {
        fs::write(path, DfaSnapshot::new(&dfa).to_dot())
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote DOT graph");
    }
    if let Some(path) = json {
        fs::write(path, loader::to_json(&dfa)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote DFA document");
    }
    Ok(())
}

fn run(source: &Source, convert: bool, inputs: &[String]) -> Result<()> {
    let machine = match source.load()? {
        LoadedAutomaton::Nfa(nfa) if !convert => Machine::Nfa(nfa),
        loaded => Machine::Dfa(to_dfa(loaded)),
    };

    if let Machine::Dfa(dfa) = &machine {
        println!("{}\n", TransitionTable::new(dfa));
    }

    if !inputs.is_empty() {
        for input in inputs {
            report(&machine, input);
        }
        return Ok(());
    }

    let mut editor = DefaultEditor::new()?;
    println!("Enter strings to test. Type 'exit' to quit.");
    loop {
        match editor.readline("input> ") {
            Ok(line) => {
                let input = line.trim();
                if input.eq_ignore_ascii_case("exit") {
                    break;
                }
                editor.add_history_entry(input)?;
                report(&machine, input);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn report(machine: &Machine, input: &str) {
    match machine.accepts(input) {
        Ok(true) => println!("{input:?}: accepted"),
        Ok(false) => println!("{input:?}: rejected"),
        Err(err) => {
            warn!(%err, "input rejected");
            println!("{input:?}: error: {err}");
        }
    }
}

fn step(source: &Source, input: &str, dot: Option<&Path>) -> Result<()> {
    let dfa = to_dfa(source.load()?);
    let mut cursor = ExecutionCursor::new(&dfa, split_symbols(input));
    let mut last_edge = None;

    println!("start: {}", dfa.state_name(cursor.current_state()));
    let accepted = loop {
        match cursor.step(&dfa)? {
            Step::Moved { from, symbol, to } => {
                println!(
                    "step {}: {} --{}--> {}",
                    cursor.steps(),
                    dfa.state_name(from),
                    dfa.symbol_name(symbol),
                    dfa.state_name(to)
                );
                last_edge = Some((from, symbol));
            }
            Step::Stuck { from, symbol } => {
                println!(
                    "step {}: {} --{}--> (no move)",
                    cursor.steps(),
                    dfa.state_name(from),
                    dfa.symbol_name(symbol)
                );
                break false;
            }
            Step::Finished { accepted } => break accepted,
        }
    };
    println!("{}", if accepted { "accepted" } else { "rejected" });

    if let Some(path) = dot {
        let snapshot = DfaSnapshot::new(&dfa)
            .highlight_edges(last_edge)
            .highlight_states([cursor.current_state()]);
        fs::write(path, snapshot.to_dot())
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote DOT snapshot");
    }
    Ok(())
}
