use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::audit::{repair, validate};
use crate::cards::{parse_board, parse_hand, Street};
use crate::classifier::classify;
use crate::config::DrillConfig;
use crate::context::{build_context, MadeFlags};
use crate::display::{
    board_display, classification_table, context_table, print_error, print_section, print_spot,
    print_violations,
};
use crate::error::{DrillError, DrillResult};
use crate::generator::{generate, generate_batch, GenerateRequest};
use crate::leverage::leverage_profile;
use crate::options::{build_options, Difficulty};
use crate::spot::Spot;
use crate::theory::TheoryCache;

#[derive(Parser)]
#[command(name = "drill", version = "1.0.0", about = "Postflop betting drills with graded options and teaching notes.")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StreetArg {
    #[value(name = "f", alias = "flop")]
    Flop,
    #[value(name = "t", alias = "turn")]
    Turn,
    #[value(name = "r", alias = "river")]
    River,
}

impl From<StreetArg> for Street {
    fn from(s: StreetArg) -> Self {
        match s {
            StreetArg::Flop => Street::Flop,
            StreetArg::Turn => Street::Turn,
            StreetArg::River => Street::River,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate drill spots
    Generate {
        /// Street (f, t, r); sampled when omitted
        #[arg(short, long)]
        street: Option<StreetArg>,
        /// Difficulty 1-10
        #[arg(short, long)]
        difficulty: Option<u8>,
        /// First seed of the retry block
        #[arg(long)]
        seed: Option<u64>,
        /// Retry budget per spot
        #[arg(long)]
        attempts: Option<usize>,
        /// Number of spots (generated in parallel)
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory of theory snippets (<topic>.md)
        #[arg(long)]
        theory: Option<PathBuf>,
        /// Print spots as JSON
        #[arg(long)]
        json: bool,
        /// Show answers and teaching notes
        #[arg(long)]
        reveal: bool,
    },
    /// Classify a hand on a board
    Classify {
        /// Hole cards (e.g., AhKs)
        hand: String,
        /// Board cards (e.g., Ks9d4c7h)
        board: String,
    },
    /// Show betting permissions and options for a hand
    Context {
        /// Hole cards (e.g., AhKs)
        hand: String,
        /// Board cards (e.g., Ks9d4c7h)
        board: String,
        /// Hero is in position
        #[arg(long)]
        ip: bool,
        /// Hero was the preflop raiser
        #[arg(long)]
        opener: bool,
        /// Effective stack
        #[arg(long, default_value = "97.5")]
        stack: f64,
        /// Pot size
        #[arg(long, default_value = "5.5")]
        pot: f64,
        /// Difficulty 1-10 for the option preview
        #[arg(short, long, default_value = "5")]
        difficulty: u8,
    },
    /// Validate (and optionally repair) spots stored as JSON
    Audit {
        /// File holding one spot or an array of spots
        path: PathBuf,
        /// Print repaired copies as JSON
        #[arg(long)]
        repair: bool,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    if let Err(e) = simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        print_error(&format!("logger: {}", e));
    }
}

pub fn run() {
    let cli = Cli::parse();
    dispatch(cli);
}

pub fn run_with_args(args: Vec<String>) {
    let cli = Cli::parse_from(args);
    dispatch(cli);
}

fn dispatch(cli: Cli) {
    init_logging(cli.verbose, cli.quiet);
    let result = match cli.command {
        Commands::Generate {
            street,
            difficulty,
            seed,
            attempts,
            count,
            config,
            theory,
            json,
            reveal,
        } => cmd_generate(GenerateArgs {
            street: street.map(Street::from),
            difficulty,
            seed,
            attempts,
            count,
            config,
            theory,
            json,
            reveal,
        }),
        Commands::Classify { hand, board } => cmd_classify(&hand, &board),
        Commands::Context {
            hand,
            board,
            ip,
            opener,
            stack,
            pot,
            difficulty,
        } => cmd_context(&hand, &board, ip, opener, stack, pot, difficulty),
        Commands::Audit { path, repair } => cmd_audit(&path, repair),
    };
    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

struct GenerateArgs {
    street: Option<Street>,
    difficulty: Option<u8>,
    seed: Option<u64>,
    attempts: Option<usize>,
    count: usize,
    config: Option<PathBuf>,
    theory: Option<PathBuf>,
    json: bool,
    reveal: bool,
}

fn cmd_generate(args: GenerateArgs) -> DrillResult<()> {
    let mut config = match &args.config {
        Some(path) => DrillConfig::load(path)?,
        None => DrillConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.base_seed = seed;
    }
    if let Some(n) = args.attempts {
        config.max_attempts = n;
    }
    if let Some(root) = args.theory {
        config.theory_root = Some(root);
    }
    config.validate()?;

    let request = GenerateRequest {
        street: args.street,
        difficulty: args.difficulty.unwrap_or(config.default_difficulty),
    };
    let cache = config.theory_root.as_ref().map(TheoryCache::new);

    let spots: Vec<DrillResult<Spot>> = if args.count <= 1 {
        vec![generate(&request, &config, cache.as_ref())]
    } else {
        generate_batch(&request, &config, args.count, cache.as_ref())
    };

    let mut failures = 0;
    let mut accepted = Vec::new();
    for result in spots {
        match result {
            Ok(spot) => accepted.push(spot),
            Err(e) => {
                failures += 1;
                print_error(&e.to_string());
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&accepted)?);
    } else {
        for spot in &accepted {
            print_spot(spot, args.reveal);
        }
    }
    if accepted.is_empty() && failures > 0 {
        return Err(DrillError::GenerationFailed {
            attempts: config.max_attempts,
            last: format!("{} of {} spots failed", failures, args.count.max(1)),
        });
    }
    Ok(())
}

fn cmd_classify(hand: &str, board: &str) -> DrillResult<()> {
    let hand = parse_hand(hand)?;
    let board = parse_board(board)?;
    let cls = classify(&hand, &board)?;

    println!();
    println!("  Hand: {}   Board: {}", board_display(&hand), board_display(board.cards()));
    println!();
    println!("{}", classification_table(&cls));
    Ok(())
}

fn cmd_context(
    hand: &str,
    board: &str,
    ip: bool,
    opener: bool,
    stack: f64,
    pot: f64,
    difficulty: u8,
) -> DrillResult<()> {
    let hand = parse_hand(hand)?;
    let board = parse_board(board)?;
    let difficulty = Difficulty::from_level(difficulty)?;
    let cls = classify(&hand, &board)?;
    let profile = leverage_profile(&cls, &board, stack, pot, opener, ip)?;
    let flags = MadeFlags {
        has_straight: cls.features.made_straight,
        has_flush: cls.features.made_flush,
        combo_draw: cls.features.combo_draw,
        pair_plus_draw: cls.features.pair_plus_draw,
    };
    let ctx = build_context(board.street(), ip, profile.leverage, stack, pot, opener, cls.class, flags)?;
    let options = build_options(&ctx, difficulty);

    println!();
    println!(
        "  {} on {}  ({}, {})",
        board_display(&hand),
        board_display(board.cards()),
        if ip { "in position" } else { "out of position" },
        if opener { "opener" } else { "caller" }
    );
    println!(
        "  Leverage {}  Mode {}  SPR {:.2}",
        profile.leverage.to_string().bold(),
        profile.mode,
        profile.spr
    );
    println!();
    println!("{}", context_table(&ctx));
    print_section("Rule trace", "");
    for r in &ctx.reasons {
        println!("    {}", r.dimmed());
    }
    let labels: Vec<String> = options
        .intents()
        .iter()
        .enumerate()
        .map(|(i, o)| {
            if i == options.anchor_index() {
                o.as_str().green().bold().to_string()
            } else {
                o.as_str().to_string()
            }
        })
        .collect();
    print_section("Options", &labels.join("  "));
    Ok(())
}

fn read_spots(path: &PathBuf) -> DrillResult<Vec<Spot>> {
    let json = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        Ok(vec![serde_json::from_value(value)?])
    }
}

fn cmd_audit(path: &PathBuf, do_repair: bool) -> DrillResult<()> {
    let spots = read_spots(path)?;
    if !do_repair {
        for spot in &spots {
            print_violations(&spot.id, &validate(spot));
        }
        return Ok(());
    }

    let mut repaired = Vec::with_capacity(spots.len());
    for spot in &spots {
        match repair(spot) {
            Ok(fixed) => repaired.push(fixed),
            Err(e) => print_error(&format!("{}: {}", spot.id, e)),
        }
    }
    println!("{}", serde_json::to_string_pretty(&repaired)?);
    Ok(())
}
