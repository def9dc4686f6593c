// Canonical JSON encoding shared by hashing and the wire
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// Encode as compact JSON. Struct fields keep their declaration order, which
/// makes the output stable for hashing.
pub fn serialize<T: Serialize>(data: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(data)
        .map_err(|e| LedgerError::Serialization(format!("Serialization failed: {e}")))
}

pub fn deserialize<T>(bytes: &[u8]) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_slice(bytes)
        .map_err(|e| LedgerError::Serialization(format!("Deserialization failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        id: u64,
        name: String,
        values: Vec<i32>,
    }

    #[test]
    fn test_serialize_is_compact_and_ordered() {
        let data = TestData {
            id: 42,
            name: "test".to_string(),
            values: vec![1, 2],
        };

        let bytes = serialize(&data).expect("Serialization should work");
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"id":42,"name":"test","values":[1,2]}"#
        );
    }

    #[test]
    fn test_deserialize_invalid_data() {
        let invalid_bytes = vec![0xFF, 0xFF, 0xFF, 0xFF];
        let result: Result<TestData> = deserialize(&invalid_bytes);
        assert!(result.is_err());
    }
}
