use serde::{Deserialize, Deserializer, Serializer, de::Error};

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

pub mod u256 {
    use super::*;
    use ethereum_types::U256;

    fn parse<E: Error>(value: &str) -> Result<U256, E> {
        let digits = strip_hex_prefix(value);
        if digits.is_empty() {
            return Ok(U256::zero());
        }
        U256::from_str_radix(digits, 16)
            .map_err(|_| E::custom(format!("Failed to deserialize U256 value: {value}")))
    }

    /// Serializes to and deserializes from 0x prefixed hex quantity
    pub mod hex_str {
        use super::*;

        pub fn deserialize<'de, D>(d: D) -> Result<U256, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = String::deserialize(d)?;
            parse(&value)
        }

        pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&format!("{value:#x}"))
        }
    }

    pub mod vec {
        use super::*;
        use serde::ser::SerializeSeq;

        pub fn deserialize<'de, D>(d: D) -> Result<Vec<U256>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw_vec = Vec::<String>::deserialize(d)?;
            raw_vec.iter().map(|s| parse::<D::Error>(s)).collect()
        }

        pub fn serialize<S>(value: &[U256], serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut seq_serializer = serializer.serialize_seq(Some(value.len()))?;
            for word in value {
                seq_serializer.serialize_element(&format!("{word:#x}"))?;
            }
            seq_serializer.end()
        }
    }

    pub mod btreemap {
        use super::*;
        use serde::ser::SerializeMap;
        use std::collections::BTreeMap;

        pub fn deserialize<'de, D>(d: D) -> Result<BTreeMap<U256, U256>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw_map = BTreeMap::<String, String>::deserialize(d)?;
            raw_map
                .iter()
                .map(|(k, v)| Ok((parse::<D::Error>(k)?, parse::<D::Error>(v)?)))
                .collect()
        }

        pub fn serialize<S>(value: &BTreeMap<U256, U256>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut map_serializer = serializer.serialize_map(Some(value.len()))?;
            for (key, word) in value {
                map_serializer.serialize_entry(&format!("{key:#x}"), &format!("{word:#x}"))?;
            }
            map_serializer.end()
        }
    }
}

pub mod u64 {
    use super::*;

    pub mod hex_str {
        use super::*;

        pub fn deserialize<'de, D>(d: D) -> Result<u64, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = String::deserialize(d)?;
            let digits = strip_hex_prefix(&value);
            if digits.is_empty() {
                return Ok(0);
            }
            u64::from_str_radix(digits, 16)
                .map_err(|_| D::Error::custom(format!("Failed to deserialize u64 value: {value}")))
        }

        pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&format!("{value:#x}"))
        }
    }
}

/// Serializes to and deserializes from 0x prefixed hex string
pub mod bytes {
    use ::bytes::Bytes;

    use super::*;

    pub fn deserialize<'de, D>(d: D) -> Result<Bytes, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(d)?;
        let bytes =
            hex::decode(strip_hex_prefix(&value)).map_err(|e| D::Error::custom(e.to_string()))?;
        Ok(Bytes::from(bytes))
    }

    pub fn serialize<S>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(value)))
    }
}

#[cfg(test)]
mod tests {
    use ethereum_types::U256;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Quantities {
        #[serde(with = "super::u256::hex_str")]
        word: U256,
        #[serde(with = "super::u64::hex_str")]
        number: u64,
        #[serde(with = "super::bytes")]
        data: bytes::Bytes,
    }

    #[test]
    fn empty_hex_decodes_as_zero() {
        let decoded: Quantities =
            serde_json::from_str(r#"{"word":"0x","number":"0x","data":"0x"}"#).unwrap();
        assert_eq!(decoded.word, U256::zero());
        assert_eq!(decoded.number, 0);
        assert!(decoded.data.is_empty());
    }

    #[test]
    fn leading_zeros_are_accepted() {
        let decoded: Quantities =
            serde_json::from_str(r#"{"word":"0x0053a","number":"0x00ff","data":"0x00ab"}"#)
                .unwrap();
        assert_eq!(decoded.word, U256::from(0x53a));
        assert_eq!(decoded.number, 0xff);
        assert_eq!(decoded.data.as_ref(), &[0x00, 0xab]);
    }

    #[test]
    fn quantities_serialize_minimal() {
        let value = Quantities {
            word: U256::from(0x53a),
            number: 0,
            data: bytes::Bytes::from_static(&[0xca, 0xfe]),
        };
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"word":"0x53a","number":"0x0","data":"0xcafe"}"#);
    }

    #[test]
    fn invalid_hex_is_rejected() {
        let result = serde_json::from_str::<Quantities>(
            r#"{"word":"0xzz","number":"0x1","data":"0x"}"#,
        );
        assert!(result.is_err());
    }
}
