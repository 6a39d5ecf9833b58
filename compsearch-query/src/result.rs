//! Search results and post-processing of grouped rows.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// Separator used when member ids are concatenated per composition.
pub const CHAMPION_ID_SEPARATOR: char = ',';

/// One matching composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionSearchResult {
    /// Composition id.
    pub id: i64,
    /// Member champion ids. Order follows the store's concatenation order.
    pub id_champions: Vec<i64>,
}

impl CompositionSearchResult {
    /// Build a result from a grouped row.
    pub fn from_grouped(id: i64, id_champions: &str) -> QueryResult<Self> {
        let id_champions = parse_champion_ids(id_champions)
            .map_err(|e| e.with_context(format!("composition {}", id)))?;
        Ok(Self { id, id_champions })
    }

    /// Whether the champion is a member.
    pub fn contains(&self, id_champion: i64) -> bool {
        self.id_champions.contains(&id_champion)
    }
}

/// Split a concatenated id list and parse every fragment.
///
/// Any fragment that is not an integer fails the whole row. Stored ids are
/// always numeric, so a failure means the tables are corrupt.
pub fn parse_champion_ids(joined: &str) -> QueryResult<Vec<i64>> {
    joined
        .split(CHAMPION_ID_SEPARATOR)
        .map(|fragment| {
            fragment.parse::<i64>().map_err(|e| {
                QueryError::deserialization(format!(
                    "champion id fragment {:?} in {:?} is not an integer",
                    fragment, joined
                ))
                .with_field("id_champions")
                .with_source(e)
            })
        })
        .collect()
}

/// Join ids the way the store concatenates them.
pub fn join_champion_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(&CHAMPION_ID_SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_champion_ids() {
        assert_eq!(parse_champion_ids("1,3,5").unwrap(), vec![1, 3, 5]);
        assert_eq!(parse_champion_ids("42").unwrap(), vec![42]);
    }

    #[test]
    fn test_parse_rejects_malformed_fragment() {
        let err = parse_champion_ids("1,x,5").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::DeserializationError);
        assert!(err.message.contains("\"x\""));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse_champion_ids("").is_err());
        assert!(parse_champion_ids("1,,2").is_err());
    }

    #[test]
    fn test_join_then_parse_preserves_ids() {
        for len in 1..=10 {
            let ids: Vec<i64> = (0..len).map(|i| i * 7 + 1).collect();
            assert_eq!(parse_champion_ids(&join_champion_ids(&ids)).unwrap(), ids);
        }
    }

    #[test]
    fn test_from_grouped_adds_composition_context() {
        let err = CompositionSearchResult::from_grouped(9, "3,?").unwrap_err();
        assert_eq!(err.context.operation.as_deref(), Some("composition 9"));

        let ok = CompositionSearchResult::from_grouped(9, "3,4").unwrap();
        assert!(ok.contains(4));
        assert!(!ok.contains(5));
    }

    #[test]
    fn test_serialized_shape() {
        let result = CompositionSearchResult { id: 1, id_champions: vec![2, 3] };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"id": 1, "id_champions": [2, 3]})
        );
    }
}
