use spot_drill::cards::*;
use spot_drill::error::Stage;
use spot_drill::ranges::*;

#[test]
fn test_combo_count_pair() {
    assert_eq!(combo_count("AA"), 6);
}

#[test]
fn test_combo_count_suited() {
    assert_eq!(combo_count("AKs"), 4);
}

#[test]
fn test_combo_count_offsuit() {
    assert_eq!(combo_count("AKo"), 12);
    assert_eq!(combo_count("AKx"), 0);
}

#[test]
fn test_parse_range_plus_pairs() {
    let result = parse_range("TT+");
    assert_eq!(result.len(), 5);
    assert!(result.contains(&"TT".to_string()));
    assert!(result.contains(&"AA".to_string()));
    assert!(!result.contains(&"99".to_string()));
}

#[test]
fn test_parse_range_plus_suited() {
    let result = parse_range("ATs+");
    assert!(result.contains(&"ATs".to_string()));
    assert!(result.contains(&"AKs".to_string()));
    assert!(!result.contains(&"A9s".to_string()));
    assert!(!result.contains(&"AAs".to_string()));
}

#[test]
fn test_parse_range_dash() {
    let pairs = parse_range("77-TT");
    assert_eq!(pairs.len(), 4);
    assert!(!pairs.contains(&"66".to_string()));

    let suited = parse_range("KTs-KQs");
    assert_eq!(suited.len(), 3);
    assert!(suited.contains(&"KJs".to_string()));
}

#[test]
fn test_parse_range_dedups_and_sorts() {
    let result = parse_range("AA, KK, AA, QQ+");
    assert_eq!(result, vec!["AA".to_string(), "KK".to_string(), "QQ".to_string()]);
}

#[test]
fn test_total_combos() {
    assert_eq!(total_combos(&["AA".to_string(), "KK".to_string()]), 12);
    assert_eq!(total_combos(&["AKs".to_string(), "AKo".to_string()]), 16);
}

#[test]
fn test_chart_keys() {
    assert_eq!(opener_key("BTN"), "BTN");
    assert_eq!(caller_key("BB", "BTN"), "BB_vs_BTN");
    let keys = chart_keys();
    for k in ["CO", "BTN", "SB", "BB_vs_CO", "BTN_vs_CO", "BB_vs_BTN", "BB_vs_SB"] {
        assert!(keys.contains(&k.to_string()), "missing {}", k);
    }
}

#[test]
fn test_every_chart_key_resolves() {
    for key in chart_keys() {
        let hands = lookup(&key).unwrap();
        assert!(total_combos(&hands) > 100, "{} too narrow", key);
        for h in &hands {
            assert!(combo_count(h) > 0, "{} holds bad class {}", key, h);
        }
    }
}

#[test]
fn test_caller_range_is_capped() {
    // Callers flat below the premiums that would three-bet.
    let hands = lookup("BB_vs_BTN").unwrap();
    assert!(!hands.contains(&"AA".to_string()));
    assert!(!hands.contains(&"AKs".to_string()));
    assert!(hands.contains(&"JJ".to_string()));
}

#[test]
fn test_missing_key_is_a_range_rejection() {
    let r = lookup("UTG_vs_HJ").unwrap_err();
    assert_eq!(r.stage, Stage::Range);
    assert!(r.reason.contains("UTG_vs_HJ"));
}

#[test]
fn test_live_combos_drop_dead_cards() {
    let dead = parse_cards("AsKd7c").unwrap();
    assert_eq!(live_combos("AA", &dead).unwrap().len(), 3);
    assert_eq!(live_combos("AKs", &dead).unwrap().len(), 2);
    assert_eq!(live_combos("QQ", &dead).unwrap().len(), 6);
    assert!(live_combos("AKx", &dead).is_err());
}
