//! Field validators — pure functions over single fields.

use serde::{Deserialize, Serialize};

/// Coarse password strength classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weak => write!(f, "Weak"),
            Self::Medium => write!(f, "Medium"),
            Self::Strong => write!(f, "Strong"),
        }
    }
}

/// Score a password from 0 to 5: one point each for length >= 8, an
/// uppercase letter, a lowercase letter, a digit, and a non-alphanumeric
/// character. The five criteria are independent.
pub fn password_strength(password: &str) -> u8 {
    let mut score = 0;
    if password.len() >= 8 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }
    score
}

/// Map a strength score to its classification: <2 weak, <4 medium,
/// otherwise strong.
pub fn classify_strength(score: u8) -> Strength {
    if score < 2 {
        Strength::Weak
    } else if score < 4 {
        Strength::Medium
    } else {
        Strength::Strong
    }
}

/// Exact equality of password and confirmation.
pub fn passwords_match(a: &str, b: &str) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_scores_zero() {
        assert_eq!(password_strength(""), 0);
    }

    #[test]
    fn all_criteria_score_five() {
        assert_eq!(password_strength("Ab1#defg"), 5);
        assert_eq!(password_strength("Passw0rd!"), 5);
    }

    #[test]
    fn criteria_are_independent() {
        // Length only
        assert_eq!(password_strength("aaaaaaaa"), 2); // length + lowercase
        // Uppercase only
        assert_eq!(password_strength("A"), 1);
        // Digit only
        assert_eq!(password_strength("7"), 1);
        // Symbol only
        assert_eq!(password_strength("#"), 1);
    }

    #[test]
    fn strength_is_monotonic_as_criteria_accrue() {
        // Each password satisfies one more criterion than the last.
        let ladder = ["", "a", "aB", "aB1", "aB1#", "aB1#efgh"];
        let mut prev = 0;
        for pass in ladder {
            let score = password_strength(pass);
            assert!(
                score >= prev,
                "score for {pass:?} dropped: {score} < {prev}"
            );
            prev = score;
        }
        assert_eq!(prev, 5);
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify_strength(0), Strength::Weak);
        assert_eq!(classify_strength(1), Strength::Weak);
        assert_eq!(classify_strength(2), Strength::Medium);
        assert_eq!(classify_strength(3), Strength::Medium);
        assert_eq!(classify_strength(4), Strength::Strong);
        assert_eq!(classify_strength(5), Strength::Strong);
    }

    #[test]
    fn match_is_exact_equality() {
        assert!(passwords_match("Passw0rd!", "Passw0rd!"));
        assert!(!passwords_match("Passw0rd!", "passw0rd!"));
        assert!(!passwords_match("a", "a "));
        assert!(passwords_match("", ""));
    }
}
