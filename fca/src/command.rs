// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! The fca binary's command-line interface.

use std::{fs, process};

use clap::Args;
use codespan_reporting::{
    files::SimpleFile,
    term::{
        self as terminal,
        termcolor::{ColorChoice, StandardStream},
    },
};

use basis::config::{compute_basis, BasisAlgorithm, BasisConfig};
use contexts::context::FormalContext;
use lattice::Lattice;

use crate::dot::{lattice_to_dot, Labels};
use crate::relation::parse_relation;

#[derive(clap::ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ColorOutput {
    Never,
    Auto,
    Always,
}

#[derive(clap::ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum Algorithm {
    Ganter,
    Incremental,
    Horn1,
    Pac,
}

#[derive(Args, Clone, Debug, PartialEq, Eq)]
struct LatticeArgs {
    #[arg(long)]
    /// Only build concepts with at least this many objects
    min_extent: Option<usize>,

    #[arg(long)]
    /// Prune concepts with fewer objects after building the lattice
    prune_smaller: Option<usize>,

    #[arg(long)]
    /// Prune concepts that introduce neither objects nor attributes
    prune_no_introduced: bool,

    #[arg(long)]
    /// Print the lattice in Graphviz dot format
    dot: bool,

    #[arg(value_enum, long, default_value_t = Labels::All)]
    /// Objects shown in dot nodes
    show_objects: Labels,

    #[arg(value_enum, long, default_value_t = Labels::All)]
    /// Attributes shown in dot nodes
    show_attributes: Labels,

    #[arg(long, value_delimiter = ',', default_value = "black")]
    /// Comma-separated colors cycled through by dot nodes
    colors: Vec<String>,

    /// File name for a relation file
    file: String,
}

#[derive(Args, Clone, Debug, PartialEq)]
struct BasisArgs {
    #[arg(value_enum, long, default_value_t = Algorithm::Ganter)]
    /// Basis algorithm to use
    algorithm: Algorithm,

    #[arg(long, default_value_t = 0.1)]
    /// Error bound for PAC learning
    epsilon: f64,

    #[arg(long, default_value_t = 0.1)]
    /// Confidence bound for PAC learning
    delta: f64,

    #[arg(long)]
    /// Random seed for PAC learning
    seed: Option<u64>,

    #[arg(long)]
    /// Give up after this many equivalence queries (horn1 and pac)
    max_queries: Option<usize>,

    /// File name for a relation file
    file: String,
}

impl BasisArgs {
    fn get_basis_conf(&self) -> BasisConfig {
        let algorithm = match self.algorithm {
            Algorithm::Ganter => BasisAlgorithm::Ganter,
            Algorithm::Incremental => BasisAlgorithm::Incremental,
            Algorithm::Horn1 => BasisAlgorithm::Horn1,
            Algorithm::Pac => BasisAlgorithm::Pac,
        };
        BasisConfig {
            algorithm,
            epsilon: self.epsilon,
            delta: self.delta,
            seed: self.seed,
            max_queries: self.max_queries,
        }
    }
}

#[derive(clap::Subcommand, Clone, Debug, PartialEq)]
enum Command {
    /// Compute and print the concept lattice
    Lattice(LatticeArgs),
    /// Compute and print an implication basis
    Basis(BasisArgs),
}

impl Command {
    fn file(&self) -> &str {
        match self {
            Command::Lattice(LatticeArgs { file, .. }) => file,
            Command::Basis(BasisArgs { file, .. }) => file,
        }
    }
}

#[derive(clap::Parser, Debug)]
#[command(about, long_about=None)]
/// Entrypoint for the fca binary, including all commands.
pub struct App {
    #[arg(value_enum, long, default_value_t = ColorOutput::Auto)]
    /// Control color output. Auto disables colors with TERM=dumb or
    /// NO_COLOR=true.
    color: ColorOutput,

    #[command(subcommand)]
    /// Command to run
    command: Command,
}

fn print_lattice(args: &LatticeArgs, context: FormalContext<String, String>) {
    let mut lattice = Lattice::new(context);
    match args.min_extent {
        Some(min) => lattice.compute_min_extent_lattice(min),
        None => lattice.compute_lattice(),
    }
    if let Some(min) = args.prune_smaller {
        lattice.prune_smaller_extents(min);
    }
    if args.prune_no_introduced {
        lattice.prune_no_introduced(true, true);
    }

    if args.dot {
        let colors: Vec<&str> = args.colors.iter().map(String::as_str).collect();
        let dot = lattice_to_dot(
            &mut lattice,
            args.show_objects,
            args.show_attributes,
            &colors,
        );
        println!("{dot}");
    } else {
        print!("{lattice}");
    }
}

impl App {
    /// Run the application.
    pub fn exec(self) {
        let file = match fs::read_to_string(self.command.file()) {
            Ok(file) => file,
            Err(err) => {
                eprintln!("could not read {}: {err}", self.command.file());
                process::exit(1);
            }
        };
        let files = SimpleFile::new(self.command.file(), &file);

        let writer = StandardStream::stderr(match &self.color {
            ColorOutput::Never => ColorChoice::Never,
            ColorOutput::Always => ColorChoice::Always,
            ColorOutput::Auto => ColorChoice::Auto,
        });
        let config = codespan_reporting::term::Config {
            start_context_lines: 3,
            end_context_lines: 3,
            ..Default::default()
        };

        let relation = match parse_relation(&file) {
            Ok(v) => v,
            Err(err) => {
                let diagnostic = err.diagnostic(());
                terminal::emit(&mut writer.lock(), &config, &files, &diagnostic).unwrap();
                process::exit(1);
            }
        };
        let context = FormalContext::from_relation(relation);
        log::info!(
            "read {} objects and {} attributes",
            context.object_count(),
            context.attribute_count()
        );

        match &self.command {
            Command::Lattice(args) => print_lattice(args, context),
            Command::Basis(args) => match compute_basis(&context, &args.get_basis_conf()) {
                Ok(basis) => {
                    for imp in &basis {
                        println!("{}", imp.display(&context));
                    }
                }
                Err(err) => {
                    eprintln!("{err}");
                    process::exit(1);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_args() {
        let app = App::parse_from(["fca", "basis", "--algorithm", "pac", "--seed", "3", "r.tsv"]);
        let Command::Basis(args) = &app.command else {
            panic!("expected the basis command");
        };
        assert_eq!(
            args.get_basis_conf(),
            BasisConfig {
                algorithm: BasisAlgorithm::Pac,
                seed: Some(3),
                ..BasisConfig::default()
            }
        );
        assert_eq!(app.command.file(), "r.tsv");

        let app = App::parse_from([
            "fca",
            "lattice",
            "--dot",
            "--show-objects",
            "introduced",
            "--colors",
            "red,blue",
            "r.tsv",
        ]);
        let Command::Lattice(args) = &app.command else {
            panic!("expected the lattice command");
        };
        assert!(args.dot);
        assert_eq!(args.show_objects, Labels::Introduced);
        assert_eq!(args.show_attributes, Labels::All);
        assert_eq!(args.colors, vec!["red", "blue"]);
    }
}
