use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// `[level1, other]` counts of one type in one benchmark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts(pub u64, pub u64);

impl Counts {
    pub fn level1(&self) -> u64 {
        self.0
    }

    pub fn other(&self) -> u64 {
        self.1
    }

    pub fn sum(&self) -> u64 {
        self.0 + self.1
    }
}

/// Contents of a `<benchmark>.types.json` file. Types keep the file's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTypeStats {
    pub total: Counts,
    #[serde(deserialize_with = "ordered_types", serialize_with = "serialize_types")]
    pub types: Vec<(String, Counts)>,
}

impl BenchmarkTypeStats {
    /// Counts of `type_label`; `[0, 0]` when the benchmark does not have it.
    pub fn counts(&self, type_label: &str) -> Counts {
        self.types
            .iter()
            .find(|(label, _)| label == type_label)
            .map(|(_, counts)| *counts)
            .unwrap_or_default()
    }

    pub fn type_labels(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|(label, _)| label.as_str())
    }
}

fn ordered_types<'de, D>(deserializer: D) -> Result<Vec<(String, Counts)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedTypes;

    impl<'de> Visitor<'de> for OrderedTypes {
        type Value = Vec<(String, Counts)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map from type label to [level1, other]")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut types = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((label, counts)) = map.next_entry::<String, Counts>()? {
                types.push((label, counts));
            }
            Ok(types)
        }
    }

    deserializer.deserialize_map(OrderedTypes)
}

fn serialize_types<S>(types: &[(String, Counts)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_map(types.iter().map(|(label, counts)| (label, counts)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_keep_file_order() {
        let stats: BenchmarkTypeStats = serde_json::from_str(
            r#"{"total": [120, 30], "types": {"person": [50, 5], "location": [40, 10], "event": [1, 2]}}"#,
        )
        .unwrap();

        assert_eq!(stats.total.sum(), 150);
        assert_eq!(stats.type_labels().collect::<Vec<_>>(), vec!["person", "location", "event"]);
        assert_eq!(stats.counts("location"), Counts(40, 10));
        assert_eq!(stats.counts("award"), Counts(0, 0));
    }

    #[test]
    fn test_serializes_back_to_map() {
        let stats = BenchmarkTypeStats {
            total: Counts(1, 2),
            types: vec![("b".to_string(), Counts(1, 0)), ("a".to_string(), Counts(0, 2))],
        };

        let json = serde_json::to_string(&stats).unwrap();

        assert_eq!(json, r#"{"total":[1,2],"types":{"b":[1,0],"a":[0,2]}}"#);
    }
}
