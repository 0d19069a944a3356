use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DrillError, DrillResult};

pub const RANKS_STR: &str = "23456789TJQKA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub fn from_char(c: char) -> DrillResult<Rank> {
        match c.to_ascii_uppercase() {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(DrillError::InvalidRank(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub fn from_char(c: char) -> DrillResult<Suit> {
        match c.to_ascii_lowercase() {
            's' => Ok(Suit::Spades),
            'h' => Ok(Suit::Hearts),
            'd' => Ok(Suit::Diamonds),
            'c' => Ok(Suit::Clubs),
            _ => Err(DrillError::InvalidSuit(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "\u{2660}",
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Clubs => "\u{2663}",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn pretty(&self) -> String {
        format!("{}{}", self.rank.to_char(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

/// Hero hole cards.
pub type Hand = [Card; 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Street {
    #[serde(rename = "f")]
    Flop,
    #[serde(rename = "t")]
    Turn,
    #[serde(rename = "r")]
    River,
}

impl Street {
    pub fn code(self) -> char {
        match self {
            Street::Flop => 'f',
            Street::Turn => 't',
            Street::River => 'r',
        }
    }

    pub fn from_code(c: char) -> DrillResult<Street> {
        match c.to_ascii_lowercase() {
            'f' => Ok(Street::Flop),
            't' => Ok(Street::Turn),
            'r' => Ok(Street::River),
            _ => Err(DrillError::InvalidValue(format!("unknown street code '{}'", c))),
        }
    }

    pub fn board_len(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }

    /// Cards still to come after this street.
    pub fn cards_to_come(self) -> u8 {
        match self {
            Street::Flop => 2,
            Street::Turn => 1,
            Street::River => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Community cards in deal order: flop, optional turn, optional river.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn new(cards: Vec<Card>) -> DrillResult<Board> {
        if !(3..=5).contains(&cards.len()) {
            return Err(DrillError::InvalidBoardSize(cards.len()));
        }
        check_distinct(&cards)?;
        Ok(Board { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn flop(&self) -> &[Card] {
        &self.cards[..3]
    }

    pub fn turn(&self) -> Option<Card> {
        self.cards.get(3).copied()
    }

    pub fn river(&self) -> Option<Card> {
        self.cards.get(4).copied()
    }

    pub fn street(&self) -> Street {
        match self.cards.len() {
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }

    pub fn ranks(&self) -> Vec<Rank> {
        self.cards.iter().map(|c| c.rank).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    /// Hole cards must not repeat a community card.
    pub fn check_hand(&self, hand: &Hand) -> DrillResult<()> {
        match hand.iter().find(|c| self.contains(c)) {
            Some(c) => Err(DrillError::DuplicateCard(c.to_string())),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", s.join(" "))
    }
}

fn check_distinct(cards: &[Card]) -> DrillResult<()> {
    let mut seen = HashSet::new();
    for c in cards {
        if !seen.insert(*c) {
            return Err(DrillError::DuplicateCard(c.to_string()));
        }
    }
    Ok(())
}

pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(exclude: Option<&[Card]>) -> Deck {
        let excluded: HashSet<Card> = exclude
            .map(|e| e.iter().copied().collect())
            .unwrap_or_default();
        let cards = ALL_RANKS
            .iter()
            .flat_map(|&r| ALL_SUITS.iter().map(move |&s| Card::new(r, s)))
            .filter(|c| !excluded.contains(c))
            .collect();
        Deck { cards }
    }

    /// Shuffle with the caller's RNG so a seed reproduces the deal.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        self.cards.shuffle(rng);
        self
    }

    pub fn deal(&mut self, n: usize) -> DrillResult<Vec<Card>> {
        if n > self.cards.len() {
            return Err(DrillError::NotEnoughDeck {
                requested: n,
                available: self.cards.len(),
            });
        }
        let dealt: Vec<Card> = self.cards.drain(..n).collect();
        Ok(dealt)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn parse_card(notation: &str) -> DrillResult<Card> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(DrillError::InvalidCardNotation(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0])?;
    let suit = Suit::from_char(chars[1])?;
    Ok(Card::new(rank, suit))
}

pub fn parse_cards(notation: &str) -> DrillResult<Vec<Card>> {
    let notation = notation.trim().replace([' ', ','], "");
    if notation.len() % 2 != 0 {
        return Err(DrillError::InvalidBoardNotation(notation));
    }
    let chars: Vec<char> = notation.chars().collect();
    chars
        .chunks(2)
        .map(|pair| parse_card(&pair.iter().collect::<String>()))
        .collect()
}

pub fn parse_board(notation: &str) -> DrillResult<Board> {
    Board::new(parse_cards(notation)?)
}

pub fn parse_hand(notation: &str) -> DrillResult<Hand> {
    let cards = parse_cards(notation)
        .map_err(|_| DrillError::InvalidHandNotation(notation.to_string()))?;
    if cards.len() != 2 {
        return Err(DrillError::InvalidHandSize);
    }
    check_distinct(&cards)?;
    Ok([cards[0], cards[1]])
}

/// Hand-class notation ("AKs", "QQ", "T9o") of two hole cards.
pub fn simplify_hand(hand: &Hand) -> String {
    let (c1, c2) = (hand[0], hand[1]);
    let (r1, r2) = if c1.rank >= c2.rank {
        (c1.rank, c2.rank)
    } else {
        (c2.rank, c1.rank)
    };

    if r1 == r2 {
        return format!("{}{}", r1.to_char(), r2.to_char());
    }

    let suffix = if c1.suit == c2.suit { "s" } else { "o" };
    format!("{}{}{}", r1.to_char(), r2.to_char(), suffix)
}

/// Expand a hand class into concrete combos.
pub fn hand_combos(notation: &str) -> DrillResult<Vec<Hand>> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();

    // Pair notation: "AA"
    if chars.len() == 2 && chars[0] == chars[1] {
        let rank = Rank::from_char(chars[0])?;
        let mut combos = Vec::new();
        for i in 0..ALL_SUITS.len() {
            for j in (i + 1)..ALL_SUITS.len() {
                combos.push([Card::new(rank, ALL_SUITS[i]), Card::new(rank, ALL_SUITS[j])]);
            }
        }
        return Ok(combos);
    }

    // Suited/offsuit notation: "AKs" or "AKo"
    if chars.len() == 3 {
        let r1 = Rank::from_char(chars[0])?;
        let r2 = Rank::from_char(chars[1])?;
        match chars[2] {
            's' => {
                return Ok(ALL_SUITS
                    .iter()
                    .map(|&s| [Card::new(r1, s), Card::new(r2, s)])
                    .collect());
            }
            'o' => {
                let mut combos = Vec::new();
                for &s1 in &ALL_SUITS {
                    for &s2 in &ALL_SUITS {
                        if s1 != s2 {
                            combos.push([Card::new(r1, s1), Card::new(r2, s2)]);
                        }
                    }
                }
                return Ok(combos);
            }
            _ => {}
        }
    }

    // Specific cards: "AsKh"
    if chars.len() == 4 {
        return Ok(vec![parse_hand(notation)?]);
    }

    Err(DrillError::InvalidHandNotation(notation.to_string()))
}

/// Returns the index of a rank char in RANKS_STR (0-based: '2'=0, 'A'=12)
pub fn rank_index(c: char) -> Option<usize> {
    RANKS_STR.find(c)
}
