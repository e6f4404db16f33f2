//! Per-feature explanation templates
//!
//! Each feature has a fixed risk side: low-side features raise risk when
//! the observed value falls at or below the split threshold (short sleep,
//! few days since the last attack), high-side features when it exceeds the
//! threshold (everything else). The direction rule, the plain-language
//! description, and the recommendation template all key off that side.

use crate::tree::{Direction, FeatureObservation};

/// Which side of a split threshold carries the risk for a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskSide {
    /// Risk when the value is at or below the threshold
    Low,
    /// Risk when the value is above the threshold
    High,
}

/// The risk side of a feature. Unknown features are treated as high-side,
/// the common case in this tree.
pub fn risk_side(label: &str) -> RiskSide {
    match label {
        "sleep_hours" | "days_since_last_attack" => RiskSide::Low,
        _ => RiskSide::High,
    }
}

/// Whether an observation landed on its feature's risky side
pub fn is_problematic(obs: &FeatureObservation) -> bool {
    match risk_side(&obs.label) {
        RiskSide::Low => obs.direction == Direction::Left,
        RiskSide::High => obs.direction == Direction::Right,
    }
}

/// Plain-language description of one observation
pub fn describe(obs: &FeatureObservation) -> String {
    let v = obs.value;
    let t = obs.threshold;
    let risky = is_problematic(obs);
    match (obs.label.as_str(), risky) {
        ("sleep_hours", true) => format!("sleep of {:.1} h is under the {:.1} h threshold", v, t),
        ("sleep_hours", false) => format!("sleep of {:.1} h is above the {:.1} h threshold", v, t),
        ("screen_time_hours", true) => format!("screen time of {:.1} h exceeds {:.1} h", v, t),
        ("screen_time_hours", false) => format!("screen time of {:.1} h is within {:.1} h", v, t),
        ("stress_level", true) => format!("stress level {:.0} is above {:.0}", v, t),
        ("stress_level", false) => format!("stress level {:.0} is at or below {:.0}", v, t),
        ("prodrome_symptoms", true) => format!("{:.0} prodrome symptom(s) reported", v),
        ("prodrome_symptoms", false) => "no prodrome symptoms reported".to_string(),
        ("attacks_last_7_days", true) => format!("{:.0} attack(s) in the last 7 days", v),
        ("attacks_last_7_days", false) => format!("{:.0} attack(s) in the last 7 days", v),
        ("attacks_last_30_days", true) => format!("{:.0} attack(s) in the last 30 days", v),
        ("attacks_last_30_days", false) => format!("{:.0} attack(s) in the last 30 days", v),
        ("days_since_last_attack", true) => {
            format!("only {:.0} day(s) since the last attack", v)
        }
        ("days_since_last_attack", false) => format!("{:.0} day(s) since the last attack", v),
        ("hydration_low", true) => "hydration was low today".to_string(),
        ("hydration_low", false) => "hydration was adequate".to_string(),
        ("skipped_meal", true) => "a meal was skipped today".to_string(),
        ("skipped_meal", false) => "no meals were skipped".to_string(),
        ("bright_light_exposure", true) => {
            format!("bright light exposure of {:.1} h exceeds {:.1} h", v, t)
        }
        ("bright_light_exposure", false) => {
            format!("bright light exposure of {:.1} h is within {:.1} h", v, t)
        }
        ("pressure_drop", true) => format!("barometric pressure dropped {:.1} hPa", v),
        ("pressure_drop", false) => "barometric pressure is steady".to_string(),
        (other, true) => format!("{} of {:.2} is past the {:.2} threshold", other, v, t),
        (other, false) => format!("{} of {:.2} is within the {:.2} threshold", other, v, t),
    }
}

/// Recommendation for a problematic observation. Returns None for
/// observations on the safe side and for features with no template.
pub fn recommend(obs: &FeatureObservation) -> Option<String> {
    if !is_problematic(obs) {
        return None;
    }
    let text = match obs.label.as_str() {
        "sleep_hours" => format!("Aim for at least {:.1} hours of sleep tonight.", obs.threshold),
        "screen_time_hours" => {
            format!("Keep screen time under {:.1} hours for the rest of the day.", obs.threshold)
        }
        "stress_level" => "Stress is elevated; plan a wind-down break today.".to_string(),
        "prodrome_symptoms" => {
            "Prodrome symptoms are present; keep your acute medication within reach.".to_string()
        }
        "attacks_last_7_days" => {
            "Attack frequency this week is high; keep known triggers to a minimum.".to_string()
        }
        "attacks_last_30_days" => {
            "Attack frequency this month is high; consider reviewing preventives with your clinician."
                .to_string()
        }
        "days_since_last_attack" => {
            "You are still in the vulnerable window after your last attack; take it easy today."
                .to_string()
        }
        "hydration_low" => "Hydration was low; drink water at regular intervals.".to_string(),
        "skipped_meal" => "Skipped meals are a common trigger; keep regular mealtimes.".to_string(),
        "bright_light_exposure" => {
            "Bright light exposure is high; reduce glare or wear tinted lenses.".to_string()
        }
        "pressure_drop" => {
            "Barometric pressure is dropping; schedule demanding tasks for later.".to_string()
        }
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(label: &str, value: f64, threshold: f64, direction: Direction) -> FeatureObservation {
        FeatureObservation {
            label: label.into(),
            value,
            threshold,
            direction,
        }
    }

    #[test]
    fn test_low_side_features_risky_on_left() {
        assert!(is_problematic(&obs("sleep_hours", 5.0, 7.2, Direction::Left)));
        assert!(!is_problematic(&obs("sleep_hours", 8.0, 7.2, Direction::Right)));
        assert!(is_problematic(&obs(
            "days_since_last_attack",
            1.0,
            2.5,
            Direction::Left
        )));
    }

    #[test]
    fn test_high_side_features_risky_on_right() {
        assert!(is_problematic(&obs("stress_level", 8.0, 6.5, Direction::Right)));
        assert!(!is_problematic(&obs("stress_level", 3.0, 6.5, Direction::Left)));
    }

    #[test]
    fn test_recommend_only_for_problematic() {
        assert!(recommend(&obs("sleep_hours", 5.0, 7.2, Direction::Left)).is_some());
        assert!(recommend(&obs("sleep_hours", 8.0, 7.2, Direction::Right)).is_none());
    }

    #[test]
    fn test_sleep_recommendation_carries_threshold() {
        let text = recommend(&obs("sleep_hours", 5.0, 7.2, Direction::Left)).unwrap();
        assert!(text.contains("7.2"));
    }

    #[test]
    fn test_unknown_feature_has_generic_description_and_no_recommendation() {
        let o = obs("caffeine_mg", 300.0, 200.0, Direction::Right);
        assert!(describe(&o).contains("caffeine_mg"));
        assert!(recommend(&o).is_none());
    }
}
