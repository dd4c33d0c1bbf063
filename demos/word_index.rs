//! Indexes a small book corpus by distinct words and answers keyword
//! queries, exercising each collision-resolution strategy from the command
//! line:
//!
//! ```text
//! cargo run --example word_index -- --strategy linear
//! ```

use clap::Parser;
use clap::ValueEnum;
use tri_hash::CapacitySchedule;
use tri_hash::HashMap;
use tri_hash::HashSet;
use tri_hash::Strategy;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Chain,
    Linear,
    Double,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Chain => Strategy::Chaining,
            StrategyArg::Linear => Strategy::LinearProbing,
            StrategyArg::Double => Strategy::DoubleHashing,
        }
    }
}

#[derive(Debug, Parser)]
struct Args {
    /// Collision-resolution strategy for every table in the index.
    #[arg(long, value_enum, default_value = "double")]
    strategy: StrategyArg,

    /// Load-factor threshold override; each strategy has a sensible default.
    #[arg(long)]
    load_factor: Option<f64>,

    /// Print the table layouts after indexing.
    #[arg(long)]
    dump: bool,
}

const BOOKS: &[(&str, &str)] = &[
    (
        "Moby Dick",
        "call me ishmael some years ago never mind how long precisely having \
         little or no money in my purse and nothing particular to interest me \
         on shore i thought i would sail about a little and see the watery \
         part of the world",
    ),
    (
        "A Tale of Two Cities",
        "it was the best of times it was the worst of times it was the age of \
         wisdom it was the age of foolishness it was the epoch of belief it \
         was the epoch of incredulity",
    ),
    (
        "Pride and Prejudice",
        "it is a truth universally acknowledged that a single man in \
         possession of a good fortune must be in want of a wife",
    ),
];

const KEYWORDS: &[&str] = &["the", "wisdom", "fortune", "sail", "leviathan"];

fn schedule() -> CapacitySchedule {
    CapacitySchedule::new([11, 23, 47, 97, 197])
}

fn main() -> Result<(), tri_hash::Error> {
    let args = Args::parse();
    let strategy = Strategy::from(args.strategy);
    let load_factor = args
        .load_factor
        .unwrap_or_else(|| strategy.default_load_factor());

    let mut index: HashMap<String, HashSet<String>> =
        HashMap::with_load_factor(strategy, schedule(), load_factor)?;

    for (title, text) in BOOKS {
        let mut words: HashSet<String> =
            HashSet::with_load_factor(strategy, schedule(), load_factor)?;
        for word in text.split_whitespace() {
            words.insert(word.to_string())?;
        }
        println!(
            "{title}: {} distinct words in {} (capacity {}, {:?})",
            words.len(),
            text.split_whitespace().count(),
            words.capacity(),
            words.strategy(),
        );
        index.insert(title.to_string(), words)?;
    }

    println!();
    for keyword in KEYWORDS {
        let matches: Vec<&String> = index
            .iter()
            .filter(|(_, words)| words.contains(&keyword.to_string()))
            .map(|(title, _)| title)
            .collect();
        if matches.is_empty() {
            println!("{keyword:>12}: (no book)");
        } else {
            println!(
                "{keyword:>12}: {}",
                matches
                    .iter()
                    .map(|title| title.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    if args.dump {
        for (title, words) in index.iter() {
            println!("\n{title}\n{}", words.dump());
        }
    }

    Ok(())
}
