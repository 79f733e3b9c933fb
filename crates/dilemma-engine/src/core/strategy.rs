use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The strategy held by a single prisoner on the grid.
///
/// Strategies are stored as a two-variant enum rather than text markers.
/// Text only appears at the boundary, where [`Strategy::marker`] and
/// [`TryFrom<char>`] convert between the two.
///
/// # Example
///
/// ```
/// use dilemma_engine::Strategy;
///
/// assert_eq!(Strategy::try_from('C').unwrap(), Strategy::Cooperate);
/// assert_eq!(Strategy::Defect.marker(), 'D');
/// assert!(Strategy::try_from('x').is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Strategy {
    #[display("C")]
    Cooperate,
    #[display("D")]
    Defect,
}

/// A character that is neither the cooperate nor the defect marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid strategy marker {_0:?} (expected 'C' or 'D')")]
pub struct InvalidStrategyMarker(#[error(not(source))] pub char);

impl Strategy {
    /// Returns the single-character marker used in grid text files.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Cooperate => 'C',
            Self::Defect => 'D',
        }
    }
}

impl TryFrom<char> for Strategy {
    type Error = InvalidStrategyMarker;

    fn try_from(marker: char) -> Result<Self, Self::Error> {
        match marker {
            'C' => Ok(Self::Cooperate),
            'D' => Ok(Self::Defect),
            _ => Err(InvalidStrategyMarker(marker)),
        }
    }
}

impl Serialize for Strategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_char(self.marker())
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut chars = s.chars();
        let (Some(marker), None) = (chars.next(), chars.next()) else {
            return Err(serde::de::Error::custom(format!(
                "strategy must be a single character, got {s:?}"
            )));
        };
        Self::try_from(marker).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_match_variants() {
        for strategy in [Strategy::Cooperate, Strategy::Defect] {
            assert_eq!(Strategy::try_from(strategy.marker()), Ok(strategy));
            assert_eq!(strategy.to_string(), strategy.marker().to_string());
        }
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert_eq!(Strategy::try_from('c'), Err(InvalidStrategyMarker('c')));
        assert_eq!(Strategy::try_from('d'), Err(InvalidStrategyMarker('d')));
        assert_eq!(Strategy::try_from(' '), Err(InvalidStrategyMarker(' ')));
    }

    #[test]
    fn test_serde_uses_markers() {
        let json = serde_json::to_string(&[Strategy::Cooperate, Strategy::Defect]).unwrap();
        assert_eq!(json, r#"["C","D"]"#);

        let parsed: Vec<Strategy> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, [Strategy::Cooperate, Strategy::Defect]);
    }

    #[test]
    fn test_serde_rejects_unknown_marker() {
        let err = serde_json::from_str::<Strategy>(r#""X""#).unwrap_err();
        assert!(err.to_string().contains("invalid strategy marker"));

        let err = serde_json::from_str::<Strategy>(r#""CD""#).unwrap_err();
        assert!(err.to_string().contains("single character"));
    }
}
