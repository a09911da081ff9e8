use crate::food::types::{FoodReferenceEntry, Macros};

/// Built-in foods with known per-unit values. Declaration order is the match
/// priority: the first `match_key` found in the text wins, so more specific
/// keys must come before the generic ones they contain.
pub const REFERENCE_TABLE: &[FoodReferenceEntry] = &[
    FoodReferenceEntry { match_key: "chicken breast", kcal: 165.0, protein_g: 31.0, carbs_g: 0.0, fat_g: 3.6, unit_label: "per 100g", unit_grams: Some(100.0) },
    FoodReferenceEntry { match_key: "banana", kcal: 105.0, protein_g: 1.3, carbs_g: 27.0, fat_g: 0.4, unit_label: "per medium", unit_grams: None },
    FoodReferenceEntry { match_key: "apple", kcal: 95.0, protein_g: 0.5, carbs_g: 25.0, fat_g: 0.3, unit_label: "per medium", unit_grams: None },
    FoodReferenceEntry { match_key: "egg", kcal: 78.0, protein_g: 6.3, carbs_g: 0.6, fat_g: 5.3, unit_label: "per large egg", unit_grams: None },
    FoodReferenceEntry { match_key: "oatmeal", kcal: 158.0, protein_g: 6.0, carbs_g: 27.0, fat_g: 3.2, unit_label: "per cup cooked", unit_grams: None },
    FoodReferenceEntry { match_key: "rice", kcal: 206.0, protein_g: 4.3, carbs_g: 45.0, fat_g: 0.4, unit_label: "per cup cooked", unit_grams: None },
    FoodReferenceEntry { match_key: "bread", kcal: 80.0, protein_g: 3.0, carbs_g: 15.0, fat_g: 1.0, unit_label: "per slice", unit_grams: None },
    FoodReferenceEntry { match_key: "milk", kcal: 103.0, protein_g: 8.0, carbs_g: 12.0, fat_g: 2.4, unit_label: "per cup", unit_grams: None },
    FoodReferenceEntry { match_key: "greek yogurt", kcal: 100.0, protein_g: 17.0, carbs_g: 6.0, fat_g: 0.7, unit_label: "per 170g pot", unit_grams: Some(170.0) },
    FoodReferenceEntry { match_key: "almonds", kcal: 164.0, protein_g: 6.0, carbs_g: 6.0, fat_g: 14.0, unit_label: "per 28g handful", unit_grams: Some(28.0) },
];

/// A fixed estimate applied when a keyword appears but no table key does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordHeuristic {
    pub keyword: &'static str,
    pub kcal: f64,
    pub macros: Macros,
}

const fn heuristic(keyword: &'static str, kcal: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> KeywordHeuristic {
    KeywordHeuristic {
        keyword,
        kcal,
        macros: Macros { protein_g, carbs_g, fat_g },
    }
}

/// Checked in order after the reference table misses.
pub const KEYWORD_HEURISTICS: &[KeywordHeuristic] = &[
    heuristic("chicken", 250.0, 30.0, 0.0, 14.0),
    heuristic("beef", 300.0, 26.0, 0.0, 21.0),
    heuristic("fish", 200.0, 22.0, 0.0, 12.0),
    heuristic("salad", 150.0, 3.0, 10.0, 10.0),
    heuristic("sandwich", 350.0, 15.0, 40.0, 14.0),
    heuristic("pizza", 285.0, 12.0, 36.0, 10.0),
    heuristic("pasta", 350.0, 12.0, 60.0, 6.0),
];

/// Returned when neither the table nor any keyword matches.
pub const GENERIC_ESTIMATE: KeywordHeuristic = heuristic("", 200.0, 8.0, 25.0, 8.0);

/// `normalized` must already be lowercase.
pub fn find_reference(normalized: &str) -> Option<&'static FoodReferenceEntry> {
    REFERENCE_TABLE.iter().find(|entry| normalized.contains(entry.match_key))
}

/// `normalized` must already be lowercase.
pub fn find_heuristic(normalized: &str) -> Option<&'static KeywordHeuristic> {
    KEYWORD_HEURISTICS.iter().find(|h| normalized.contains(h.keyword))
}
