use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::audit::Violation;
use crate::cards::{Card, Suit};
use crate::classifier::Classification;
use crate::context::BettingContext;
use crate::spot::{ActionKind, Spot};

pub fn board_display(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| {
            let text = format!("{}{}", card.rank.to_char(), card.suit.symbol());
            match card.suit {
                Suit::Spades => text.white().to_string(),
                Suit::Hearts => text.red().to_string(),
                Suit::Diamonds => text.blue().to_string(),
                Suit::Clubs => text.green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Same colouring for cards already rendered as "As".
pub fn card_strings_display(cards: &[String]) -> String {
    cards
        .iter()
        .map(|s| match s.chars().nth(1) {
            Some('s') => s.white().to_string(),
            Some('h') => s.red().to_string(),
            Some('d') => s.blue().to_string(),
            Some('c') => s.green().to_string(),
            _ => s.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn frequency_bar(freq: f64, width: usize) -> String {
    let filled = ((freq.clamp(0.0, 1.0)) * width as f64).round() as usize;
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);
    let pct = format!("{:.0}%", freq * 100.0);

    if freq >= 0.5 {
        format!("{} {}", bar.green(), pct)
    } else if freq >= 0.25 {
        format!("{} {}", bar.yellow(), pct)
    } else {
        format!("{} {}", bar.red(), pct)
    }
}

pub fn styled_action(kind: ActionKind, label: &str) -> String {
    match kind {
        ActionKind::Check => label.yellow().bold().to_string(),
        ActionKind::Bet => label.red().bold().to_string(),
        ActionKind::Allin => label.magenta().bold().to_string(),
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}

pub fn options_table(spot: &Spot) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Option"),
        Cell::new("Frequency"),
        Cell::new("Score").set_alignment(CellAlignment::Right),
    ]);

    for (i, opt) in spot.options.iter().enumerate() {
        let best = i == spot.solution.best_index;
        let marker = if best { "*".green().bold().to_string() } else { String::new() };
        let freq = spot.meta.frequencies.get(i).copied().unwrap_or(0.0);
        let score = spot.solution.scores.get(i).copied().unwrap_or(0.0);
        table.add_row(vec![
            Cell::new(format!("{}{}", i + 1, marker)),
            Cell::new(styled_action(opt.action, &opt.label())),
            Cell::new(frequency_bar(freq, 20)),
            Cell::new(format!("{:.2}", score)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

pub fn print_spot(spot: &Spot, reveal: bool) {
    println!();
    println!(
        "  {}  {}  difficulty {}",
        spot.id.bold(),
        spot.street.as_str().to_uppercase().cyan().bold(),
        spot.difficulty
    );
    println!(
        "  Hero {} ({})  vs  Villain {}",
        spot.hero.position.as_str().bold(),
        card_strings_display(&spot.hero.cards),
        spot.villain.position.as_str()
    );
    println!("  Board: {}", card_strings_display(&spot.board));
    println!("  Pot: {:.2}  Effective stack: {:.2}", spot.pot, spot.hero.stack);
    println!();

    if reveal {
        println!("{}", options_table(spot));
        print_section("Summary", &spot.meta.summary);
        for note in &spot.meta.notes {
            println!("  - {}", note);
        }
        let concepts: Vec<&str> = spot.meta.concepts.iter().map(|c| c.as_str()).collect();
        print_section("Concepts", &concepts.join(", "));
        if let Some(theory) = &spot.meta.theory {
            print_section("Theory", theory);
        }
    } else {
        for (i, opt) in spot.options.iter().enumerate() {
            println!("  {}) {}", i + 1, styled_action(opt.action, &opt.label()));
        }
    }
}

pub fn classification_table(cls: &Classification) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new(""), Cell::new("")]);

    let f = &cls.features;
    let rows: Vec<(&str, String)> = vec![
        ("Made Hand", cls.category.to_string()),
        ("Class", cls.class.to_string()),
        ("Pair Quality", cls.pair_quality.to_string()),
        ("Intent", cls.intent.to_string()),
        ("Turn", cls.turn_type.map_or("-".to_string(), |t| t.to_string())),
        ("River", cls.river_type.map_or("-".to_string(), |t| t.to_string())),
        ("Flush Draw", format!("{}{}", yes_no(f.flush_draw), if f.nut_flush_draw { " (nut)" } else { "" })),
        ("Straight Draw", format!("{:?}", f.straight_draw)),
        ("Combo Draw", yes_no(f.combo_draw).to_string()),
        ("Equity Proxy", format!("{:.2}", f.equity)),
    ];
    for (k, v) in rows {
        table.add_row(vec![Cell::new(k.bold().to_string()), Cell::new(v)]);
    }
    table.to_string()
}

pub fn context_table(ctx: &BettingContext) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Permission"), Cell::new("Value")]);

    let flag = |b: bool| if b { "Yes".green().to_string() } else { "No".dimmed().to_string() };
    table.add_row(vec![Cell::new("Polarity"), Cell::new(ctx.polarity.to_string())]);
    table.add_row(vec![Cell::new("Stack Pressure"), Cell::new(ctx.stack_pressure.to_string())]);
    table.add_row(vec![Cell::new("Check Dominant"), Cell::new(flag(ctx.check_dominant))]);
    table.add_row(vec![Cell::new("Small Bet"), Cell::new(flag(ctx.allows_small_bet))]);
    table.add_row(vec![Cell::new("Large Bet"), Cell::new(flag(ctx.allows_large_bet))]);
    table.add_row(vec![Cell::new("Overbet"), Cell::new(flag(ctx.allows_overbet))]);
    table.to_string()
}

pub fn print_violations(id: &str, violations: &[Violation]) {
    if violations.is_empty() {
        print_success(&format!("{}: ok", id));
        return;
    }
    println!("{}", format!("{}: {} violation(s)", id, violations.len()).red().bold());
    for v in violations {
        let tag = if v.repairable() { "repairable".yellow() } else { "fatal".red() };
        println!("  [{}] {}", tag, v);
    }
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("  {}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    println!("{}", msg.green().bold());
}
