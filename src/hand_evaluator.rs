use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Hand, Rank, Suit, ALL_SUITS};

/// Best made category the hero's hole cards actually take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MadeHand {
    pub category: HandCategory,
    /// High card of the hero's straight (5 for the wheel).
    pub straight_high: Option<u8>,
    pub flush_suit: Option<Suit>,
    pub is_set: bool,
    pub is_wheel: bool,
    pub is_nut_straight: bool,
    pub is_nut_flush: bool,
}

impl MadeHand {
    pub fn has_straight(&self) -> bool {
        self.straight_high.is_some()
    }

    pub fn has_flush(&self) -> bool {
        self.flush_suit.is_some()
    }
}

/// Distinct rank values, with the ace also counted low.
fn rank_set(cards: impl IntoIterator<Item = Card>) -> [bool; 15] {
    let mut present = [false; 15];
    for c in cards {
        present[c.value() as usize] = true;
        if c.rank == Rank::Ace {
            present[1] = true;
        }
    }
    present
}

fn straight_in(present: &[bool; 15]) -> Option<u8> {
    (5..=14u8)
        .rev()
        .find(|&high| (high - 4..=high).all(|v| present[v as usize]))
}

/// Highest straight formed by the given cards.
pub fn straight_high(cards: &[Card]) -> Option<u8> {
    straight_in(&rank_set(cards.iter().copied()))
}

/// Highest straight any two hole cards could make on this board.
pub fn nut_straight_high(board: &[Card]) -> Option<u8> {
    let present = rank_set(board.iter().copied());
    (5..=14u8)
        .rev()
        .find(|&high| (high - 4..=high).filter(|&v| present[v as usize]).count() >= 3)
}

/// Straight the hero makes that the board alone does not.
pub fn hero_straight(hand: &Hand, board: &[Card]) -> Option<u8> {
    let all: Vec<Card> = hand.iter().chain(board.iter()).copied().collect();
    let with_hero = straight_high(&all);
    if with_hero > straight_high(board) {
        with_hero
    } else {
        None
    }
}

/// Number of distinct ranks that would give the hero a new straight.
pub fn straight_outs(hand: &Hand, board: &[Card]) -> usize {
    if board.len() >= 5 || hero_straight(hand, board).is_some() {
        return 0;
    }
    let all: Vec<Card> = hand.iter().chain(board.iter()).copied().collect();
    let mut all_present = rank_set(all.iter().copied());
    let mut board_present = rank_set(board.iter().copied());
    let mut outs = 0;
    for v in 2..=14u8 {
        if all_present[v as usize] {
            continue;
        }
        let (saved_all, saved_board) = (all_present, board_present);
        all_present[v as usize] = true;
        board_present[v as usize] = true;
        if v == 14 {
            all_present[1] = true;
            board_present[1] = true;
        }
        if straight_in(&all_present) > straight_in(&board_present) {
            outs += 1;
        }
        all_present = saved_all;
        board_present = saved_board;
    }
    outs
}

pub fn suit_counts(cards: &[Card]) -> [usize; 4] {
    let mut counts = [0usize; 4];
    for c in cards {
        counts[c.suit.index()] += 1;
    }
    counts
}

/// Highest rank of `suit` not showing on the board.
pub fn highest_missing(board: &[Card], suit: Suit) -> Option<Rank> {
    crate::cards::ALL_RANKS
        .iter()
        .rev()
        .copied()
        .find(|&r| !board.contains(&Card::new(r, suit)))
}

fn hero_flush_suit(hand: &Hand, board: &[Card]) -> Option<Suit> {
    let board_counts = suit_counts(board);
    ALL_SUITS.iter().copied().find(|&s| {
        let hero_in_suit: Vec<Rank> = hand.iter().filter(|c| c.suit == s).map(|c| c.rank).collect();
        let total = board_counts[s.index()] + hero_in_suit.len();
        if total < 5 || hero_in_suit.is_empty() {
            return false;
        }
        // A five-flush on board only counts if the hero plays over it.
        if board_counts[s.index()] >= 5 {
            let lowest_board = board
                .iter()
                .filter(|c| c.suit == s)
                .map(|c| c.rank)
                .min();
            return hero_in_suit.iter().any(|&r| Some(r) > lowest_board);
        }
        true
    })
}

pub fn evaluate_hand(hand: &Hand, board: &[Card]) -> MadeHand {
    let straight = hero_straight(hand, board);
    let flush_suit = hero_flush_suit(hand, board);

    let straight_flush = flush_suit.and_then(|s| {
        let suited: Vec<Card> = hand
            .iter()
            .chain(board.iter())
            .filter(|c| c.suit == s)
            .copied()
            .collect();
        let board_suited: Vec<Card> = board.iter().filter(|c| c.suit == s).copied().collect();
        let high = straight_high(&suited);
        if high > straight_high(&board_suited) {
            high
        } else {
            None
        }
    });

    let board_counts: HashMap<Rank, usize> = board.iter().map(|c| c.rank).counts();
    let hero_counts: HashMap<Rank, usize> = hand.iter().map(|c| c.rank).counts();
    let total = |r: Rank| board_counts.get(&r).copied().unwrap_or(0) + hero_counts.get(&r).copied().unwrap_or(0);

    let pocket_pair = hand[0].rank == hand[1].rank;
    let quads = hero_counts.keys().any(|&r| total(r) == 4);
    let trips_ranks: Vec<Rank> = hero_counts.keys().copied().filter(|&r| total(r) >= 3).collect();
    let full_house = trips_ranks.iter().any(|&t| {
        board_counts
            .keys()
            .chain(hero_counts.keys())
            .any(|&p| p != t && total(p) >= 2)
    }) || {
        // Hero pairs a board card while the board carries trips.
        board_counts.iter().any(|(&t, &n)| {
            n >= 3 && hero_counts.keys().any(|&h| h != t && total(h) >= 2)
        })
    };
    let is_set = pocket_pair && board_counts.get(&hand[0].rank).copied().unwrap_or(0) == 1;
    let paired_with_board = hand
        .iter()
        .map(|c| c.rank)
        .unique()
        .filter(|&r| board_counts.contains_key(&r))
        .count();

    let category = if straight_flush.is_some() {
        HandCategory::StraightFlush
    } else if quads {
        HandCategory::FourOfAKind
    } else if full_house {
        HandCategory::FullHouse
    } else if flush_suit.is_some() {
        HandCategory::Flush
    } else if straight.is_some() {
        HandCategory::Straight
    } else if !trips_ranks.is_empty() {
        HandCategory::ThreeOfAKind
    } else if !pocket_pair && paired_with_board == 2 {
        HandCategory::TwoPair
    } else if pocket_pair || paired_with_board == 1 {
        HandCategory::OnePair
    } else {
        HandCategory::HighCard
    };

    let straight_high = straight_flush.or(straight);
    let is_nut_straight = straight_high.is_some() && straight_high >= nut_straight_high(board);
    let is_nut_flush = flush_suit.map_or(false, |s| {
        highest_missing(board, s).map_or(false, |nut| hand.contains(&Card::new(nut, s)))
    });

    MadeHand {
        category,
        straight_high,
        flush_suit,
        is_set,
        is_wheel: straight_high == Some(5),
        is_nut_straight,
        is_nut_flush,
    }
}
