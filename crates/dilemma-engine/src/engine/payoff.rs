use crate::Strategy;

/// Amount removed from a cooperator's neighborhood total.
///
/// A cooperating cell always meets itself while scanning its neighborhood and
/// earns `+1` for it; the correction takes that self-payoff back out. Defectors
/// earn nothing from themselves and receive no correction.
pub const COOPERATOR_SELF_CORRECTION: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("temptation must be a finite non-negative number, got {value}")]
pub struct InvalidTemptation {
    value: f64,
}

/// Pairwise payoff table of the game.
///
/// | self      | other     | payoff |
/// |-----------|-----------|--------|
/// | Cooperate | Cooperate | 1      |
/// | Cooperate | Defect    | 0      |
/// | Defect    | Cooperate | `b`    |
/// | Defect    | Defect    | 0      |
///
/// `b` (the temptation) is what a defector gains from exploiting a cooperator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoffRule {
    temptation: f64,
}

impl PayoffRule {
    /// Creates a payoff rule with temptation `b`.
    ///
    /// ```
    /// use dilemma_engine::PayoffRule;
    ///
    /// assert!(PayoffRule::new(1.5).is_ok());
    /// assert!(PayoffRule::new(-0.1).is_err());
    /// assert!(PayoffRule::new(f64::INFINITY).is_err());
    /// ```
    pub fn new(temptation: f64) -> Result<Self, InvalidTemptation> {
        if !temptation.is_finite() || temptation < 0.0 {
            return Err(InvalidTemptation { value: temptation });
        }
        Ok(Self { temptation })
    }

    #[must_use]
    pub const fn temptation(&self) -> f64 {
        self.temptation
    }

    /// Payoff earned by a cell playing `me` against a neighbor playing `other`.
    #[must_use]
    pub const fn contribution(&self, me: Strategy, other: Strategy) -> f64 {
        match (me, other) {
            (Strategy::Cooperate, Strategy::Cooperate) => 1.0,
            (Strategy::Defect, Strategy::Cooperate) => self.temptation,
            (_, Strategy::Defect) => 0.0,
        }
    }

    /// Correction applied once to a cell's neighborhood total.
    #[must_use]
    pub const fn self_correction(me: Strategy) -> f64 {
        match me {
            Strategy::Cooperate => COOPERATOR_SELF_CORRECTION,
            Strategy::Defect => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoff_table() {
        use crate::Strategy::{Cooperate as C, Defect as D};

        let rule = PayoffRule::new(1.75).unwrap();
        assert_eq!(rule.contribution(C, C), 1.0);
        assert_eq!(rule.contribution(C, D), 0.0);
        assert_eq!(rule.contribution(D, C), 1.75);
        assert_eq!(rule.contribution(D, D), 0.0);
    }

    #[test]
    fn test_self_correction_only_for_cooperators() {
        assert_eq!(PayoffRule::self_correction(Strategy::Cooperate), 1.0);
        assert_eq!(PayoffRule::self_correction(Strategy::Defect), 0.0);
    }

    #[test]
    fn test_rejects_invalid_temptation() {
        assert!(PayoffRule::new(0.0).is_ok());
        assert!(PayoffRule::new(-1.0).is_err());
        assert!(PayoffRule::new(f64::NAN).is_err());
        let err = PayoffRule::new(-2.5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "temptation must be a finite non-negative number, got -2.5"
        );
    }
}
