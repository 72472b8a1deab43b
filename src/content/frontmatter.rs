//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ContentError;

/// Delimiter line opening and closing the YAML block
const DELIMITER: &str = "---";

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        // Bare scalars such as `tags: 2024` read as a one-tag list, like `tags: [2024]`
        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data of a blog post
///
/// `title`, `date`, `excerpt` and `category` are required. `tags` defaults
/// to an empty list and `featured` is absent unless set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    pub date: String,
    pub excerpt: String,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub featured: Option<bool>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let after_open = content
            .strip_prefix(DELIMITER)
            .ok_or_else(|| ContentError::malformed("missing front-matter block"))?;
        let (open_rest, rest) = split_first_line(after_open);
        if !open_rest.trim().is_empty() {
            return Err(ContentError::malformed("missing front-matter block"));
        }

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == DELIMITER {
                let yaml_content = &rest[..offset];
                let remaining = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);

                if yaml_content.trim().is_empty() {
                    return Err(ContentError::malformed("empty front-matter block"));
                }

                let fm: FrontMatter = serde_yaml::from_str(yaml_content)?;
                if fm.parse_date().is_none() {
                    return Err(ContentError::malformed(format!(
                        "unrecognized date `{}`",
                        fm.date
                    )));
                }
                return Ok((fm, remaining));
            }
            offset += line.len();
        }

        Err(ContentError::malformed("unterminated front-matter block"))
    }

    /// Parse the date string into a sortable timestamp
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        parse_date_string(&self.date)
    }

    /// Featured flag with its default applied
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }
}

fn split_first_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    }
}

/// Parse an ISO-8601 date or date-time
pub(crate) fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
