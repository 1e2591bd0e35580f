use crate::shared::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Closed set of area units the marketplace understands.
///
/// Conversion goes through a per-unit square-feet factor, which keeps the
/// table bidirectional: A -> B -> A reproduces the input within f64 tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    SqFt,
    SqM,
    SqYd,
    Acre,
    Hectare,
    Guntha,
    Cent,
    Bigha,
}

impl AreaUnit {
    /// Square feet contained in one of this unit.
    fn sqft_factor(&self) -> f64 {
        match self {
            AreaUnit::SqFt => 1.0,
            AreaUnit::SqM => 10.7639,
            AreaUnit::SqYd => 9.0,
            AreaUnit::Acre => 43_560.0,
            AreaUnit::Hectare => 107_639.0,
            AreaUnit::Guntha => 1_089.0,
            AreaUnit::Cent => 435.6,
            AreaUnit::Bigha => 27_000.0,
        }
    }

    /// Canonical display label, as shown next to area values.
    pub fn label(&self) -> &'static str {
        match self {
            AreaUnit::SqFt => "sq.ft",
            AreaUnit::SqM => "sq.m",
            AreaUnit::SqYd => "sq.yd",
            AreaUnit::Acre => "acres",
            AreaUnit::Hectare => "hectares",
            AreaUnit::Guntha => "guntas",
            AreaUnit::Cent => "cents",
            AreaUnit::Bigha => "bigha",
        }
    }

    pub fn all() -> &'static [AreaUnit] {
        &[
            AreaUnit::SqFt,
            AreaUnit::SqM,
            AreaUnit::SqYd,
            AreaUnit::Acre,
            AreaUnit::Hectare,
            AreaUnit::Guntha,
            AreaUnit::Cent,
            AreaUnit::Bigha,
        ]
    }
}

/// Fold loose spellings and abbreviations into one canonical unit per family.
///
/// Unknown input is an `UnknownUnit` error; callers that have a safe default
/// (a record missing its plot unit) substitute sq.ft at the call site rather
/// than here.
pub fn standardize_unit_name(raw: &str) -> AppResult<AreaUnit> {
    // "Sq. Ft." / "sq ft" / "sqft" all collapse to the same key.
    let key: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    match key.as_str() {
        "sqft" | "sqf" | "sft" | "squarefeet" | "squarefoot" | "sqfeet" | "squareft" => {
            Ok(AreaUnit::SqFt)
        }
        "sqm" | "sqmt" | "sqmtr" | "squaremeter" | "squaremeters" | "squaremetre"
        | "squaremetres" | "sqmeter" | "sqmeters" => Ok(AreaUnit::SqM),
        "sqyd" | "sqyds" | "squareyard" | "squareyards" | "yards" | "gaj" => Ok(AreaUnit::SqYd),
        "acre" | "acres" => Ok(AreaUnit::Acre),
        "hectare" | "hectares" | "ha" => Ok(AreaUnit::Hectare),
        "guntha" | "gunthas" | "gunta" | "guntas" => Ok(AreaUnit::Guntha),
        "cent" | "cents" => Ok(AreaUnit::Cent),
        "bigha" | "bighas" => Ok(AreaUnit::Bigha),
        _ => Err(AppError::UnknownUnit(raw.to_string())),
    }
}

/// Pure, side-effect-free conversion between any two supported units.
pub fn convert_area(value: f64, from: AreaUnit, to: AreaUnit) -> f64 {
    if from == to {
        return value;
    }
    value * from.sqft_factor() / to.sqft_factor()
}
