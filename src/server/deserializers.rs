use serde::{Deserialize, Deserializer};

// query strings like `?category=` send an empty value instead of leaving it out
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

// some clients keep ids as strings, accept both `17` and `"17"`
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Number(i64),
    Text(String),
}

impl TryFrom<LooseId> for i64 {
    type Error = String;

    fn try_from(value: LooseId) -> Result<Self, Self::Error> {
        match value {
            LooseId::Number(v) => Ok(v),
            LooseId::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("Wrong value {text}, can not parse to i64")),
        }
    }
}

pub fn deserialize_loose_ids<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(values) = Option::<Vec<LooseId>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    values
        .into_iter()
        .map(i64::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
        .map_err(serde::de::Error::custom)
}

pub fn deserialize_loose_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<LooseId>::deserialize(deserializer)?
        .map(i64::try_from)
        .transpose()
        .map_err(serde::de::Error::custom)
}
