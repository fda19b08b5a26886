use crate::models::{HaircareRoutine, RoutineStep, SkincareRoutine};

const DEFAULT_TYPE: &str = "all";

/// Ordered treatment rules; the first rule with a matching keyword wins
const TREATMENT_RULES: [(&[&str], &str); 5] = [
    (
        &["acne", "breakout"],
        "Salicylic acid or benzoyl peroxide treatment",
    ),
    (&["aging", "wrinkle"], "Retinol or peptide serum"),
    (
        &["dark spot", "hyperpigmentation"],
        "Niacinamide or alpha arbutin serum",
    ),
    (&["dry", "dehydrat"], "Hyaluronic acid serum"),
    (&["oily"], "Niacinamide serum to control oil"),
];

const NO_ISSUES_TREATMENT: &str = "Hydrating serum or facial oil";
const GENERIC_TREATMENT: &str = "Targeted treatment serum for your concerns";

fn type_or_default(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => DEFAULT_TYPE,
    }
}

/// Evening treatment suggestion for the given issues text
pub fn treatment_for(issues: Option<&str>) -> &'static str {
    let issues = match issues.map(str::trim) {
        Some(issues) if !issues.is_empty() => issues.to_lowercase(),
        _ => return NO_ISSUES_TREATMENT,
    };

    TREATMENT_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| issues.contains(k)))
        .map(|(_, treatment)| *treatment)
        .unwrap_or(GENERIC_TREATMENT)
}

/// Builds a morning/evening skincare routine
///
/// Only the evening treatment step depends on `issues`; `goal` is accepted for
/// symmetry with the recommendation inputs but does not change the routine.
pub fn generate_skincare_routine(
    skin_type: Option<&str>,
    issues: Option<&str>,
    _goal: Option<&str>,
) -> SkincareRoutine {
    let skin = type_or_default(skin_type);

    SkincareRoutine {
        morning: vec![
            RoutineStep::new(
                1,
                "Cleanser",
                format!("Gentle cleanser suitable for {} skin", skin),
            ),
            RoutineStep::new(2, "Toner", "Hydrating toner to balance skin pH"),
            RoutineStep::new(3, "Serum", "Vitamin C serum for brightness and protection"),
            RoutineStep::new(
                4,
                "Moisturizer",
                format!("Lightweight moisturizer for {} skin", skin),
            ),
            RoutineStep::new(
                5,
                "Sunscreen",
                "SPF 30+ broad spectrum sunscreen (essential!)",
            ),
        ],
        evening: vec![
            RoutineStep::new(
                1,
                "Makeup Remover/Oil Cleanser",
                "Remove makeup and sunscreen",
            ),
            RoutineStep::new(2, "Cleanser", format!("Gentle cleanser for {} skin", skin)),
            RoutineStep::new(3, "Toner", "Hydrating or exfoliating toner"),
            RoutineStep::new(4, "Treatment", treatment_for(issues)),
            RoutineStep::new(5, "Moisturizer", "Nourishing night cream or sleeping mask"),
        ],
    }
}

/// Builds a wash-day/maintenance haircare routine
pub fn generate_haircare_routine(
    hair_type: Option<&str>,
    _issues: Option<&str>,
    _goal: Option<&str>,
) -> HaircareRoutine {
    let hair = type_or_default(hair_type);

    HaircareRoutine {
        wash_day: vec![
            RoutineStep::new(
                1,
                "Pre-wash Treatment",
                "Optional oil treatment 30 min before wash",
            ),
            RoutineStep::new(
                2,
                "Shampoo",
                format!("Sulfate-free shampoo for {} hair", hair),
            ),
            RoutineStep::new(3, "Conditioner", "Focus on mid-lengths to ends"),
            RoutineStep::new(4, "Deep Conditioner", "Weekly deep conditioning treatment"),
            RoutineStep::new(5, "Leave-in", "Leave-in conditioner or detangler"),
        ],
        maintenance: vec![
            RoutineStep::new(1, "Refresh", "Water or leave-in spray to refresh"),
            RoutineStep::new(2, "Protect", "Heat protectant before any heat styling"),
            RoutineStep::new(3, "Style", "Styling products suitable for your hair type"),
            RoutineStep::new(4, "Seal", "Light oil or serum on ends to prevent breakage"),
        ],
    }
}
