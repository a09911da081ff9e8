use serde::{Deserialize, Serialize};

/// Which estimation source produced a `NutritionEstimate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    LocalTable,
    LocalHeuristic,
    LocalGeneric,
    ExactMatchApi,
    CommunityDb,
    #[serde(rename = "none")]
    Unavailable,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::LocalTable => "local-table",
            Provenance::LocalHeuristic => "local-heuristic",
            Provenance::LocalGeneric => "local-generic",
            Provenance::ExactMatchApi => "exact-match-api",
            Provenance::CommunityDb => "community-db",
            Provenance::Unavailable => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// The output of every estimation path. All numeric fields are always present;
/// "nothing found" is `kcal = 0` tagged `none`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEstimate {
    #[serde(rename = "query")]
    pub description: String,
    pub kcal: f64,
    #[serde(flatten)]
    pub macros: Macros,
    #[serde(rename = "source")]
    pub provenance: Provenance,
}

impl NutritionEstimate {
    pub fn new(description: &str, kcal: f64, macros: Macros, provenance: Provenance) -> Self {
        Self {
            description: description.to_string(),
            kcal: non_negative(kcal),
            macros: Macros {
                protein_g: non_negative(macros.protein_g),
                carbs_g: non_negative(macros.carbs_g),
                fat_g: non_negative(macros.fat_g),
            },
            provenance,
        }
    }

    pub fn unavailable(description: &str) -> Self {
        Self::new(description, 0.0, Macros::default(), Provenance::Unavailable)
    }

    pub fn from_provider(description: &str, result: ProviderQueryResult, provenance: Provenance) -> Self {
        Self::new(description, result.kcal(), result.macros(), provenance)
    }

    pub fn is_unavailable(&self) -> bool {
        self.provenance == Provenance::Unavailable
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// A populated provider answer. Can only be built with `kcal > 0`, so a
/// provider holding one always has a real estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderQueryResult {
    kcal: f64,
    macros: Macros,
}

impl ProviderQueryResult {
    pub fn new(kcal: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Option<Self> {
        if !kcal.is_finite() || kcal <= 0.0 {
            return None;
        }
        Some(Self {
            kcal,
            macros: Macros {
                protein_g: non_negative(protein_g),
                carbs_g: non_negative(carbs_g),
                fat_g: non_negative(fat_g),
            },
        })
    }

    pub fn kcal(&self) -> f64 {
        self.kcal
    }

    pub fn macros(&self) -> Macros {
        self.macros
    }
}

/// One row of the built-in reference table. Values are per `unit_label`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodReferenceEntry {
    pub match_key: &'static str,
    pub kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub unit_label: &'static str,
    /// Weight of one unit when the unit is a gram amount; lets "200g" scale by weight.
    pub unit_grams: Option<f64>,
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
