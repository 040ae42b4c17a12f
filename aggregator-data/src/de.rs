//! Custom deserialization helpers for exchange payloads.

use serde::de::{Deserialize, Deserializer, Error};

/// Deserialize a number quoted as a JSON string (e.g. `"16578.50"`).
///
/// Every supported exchange reports prices and sizes as strings.
pub fn de_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: &str = Deserialize::deserialize(deserializer)?;
    raw.parse().map_err(Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Quoted {
        #[serde(deserialize_with = "de_str")]
        price: f64,
    }

    #[test]
    fn test_de_str() {
        struct TestCase {
            input: &'static str,
            expected: Result<Quoted, ()>,
        }

        let tests = vec![
            // TC0: quoted float parses
            TestCase {
                input: r#"{"price": "16578.50"}"#,
                expected: Ok(Quoted { price: 16578.50 }),
            },
            // TC1: non-numeric string is rejected
            TestCase {
                input: r#"{"price": "not-a-number"}"#,
                expected: Err(()),
            },
            // TC2: bare number is rejected (exchanges quote their prices)
            TestCase {
                input: r#"{"price": 16578.50}"#,
                expected: Err(()),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = serde_json::from_str::<Quoted>(test.input);
            match (actual, test.expected) {
                (Ok(actual), Ok(expected)) => assert_eq!(actual, expected, "TC{} failed", index),
                (Err(_), Err(_)) => {}
                (actual, expected) => {
                    panic!("TC{index} failed. \nActual: {actual:?}\nExpected: {expected:?}\n")
                }
            }
        }
    }
}
