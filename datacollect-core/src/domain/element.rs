use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::attribute::{parse_date_text, AttributeValue, Attributes};

/// Element as returned by generic element endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl ElementDto {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Element of a dimension, including its place in the folder hierarchy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionElementDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub is_folder: bool,
    /// Folder names from the root down to the direct parent.
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl DimensionElementDto {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn folder(id: i64, name: impl Into<String>) -> Self {
        Self::new(id, name).as_folder()
    }

    pub fn as_folder(mut self) -> Self {
        self.is_folder = true;
        self
    }

    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Full path including the element itself, joined with `/`.
    pub fn full_path(&self) -> String {
        self.path
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Row of a measure group: coordinates in its dimensions plus measure values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureElementDto {
    pub id: i64,
    /// Dimension name to the id of the referenced dimension element.
    #[serde(default)]
    pub coordinates: BTreeMap<String, i64>,
    #[serde(default)]
    pub values: Attributes,
}

impl MeasureElementDto {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_coordinate(mut self, dimension: impl Into<String>, element_id: i64) -> Self {
        self.coordinates.insert(dimension.into(), element_id);
        self
    }

    pub fn with_value(mut self, measure: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.values.insert(measure.into(), value.into());
        self
    }

    pub fn value(&self, measure: &str) -> Option<&AttributeValue> {
        self.values.get(measure)
    }

    /// Stable textual key built from the coordinates, e.g. `Год=3;Регион=12`.
    pub fn coordinate_key(&self) -> String {
        self.coordinates
            .iter()
            .map(|(dimension, id)| format!("{}={}", dimension, id))
            .collect::<Vec<_>>()
            .join(";")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarLevel {
    Year,
    Quarter,
    Month,
    Day,
}

impl fmt::Display for CalendarLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => write!(f, "year"),
            Self::Quarter => write!(f, "quarter"),
            Self::Month => write!(f, "month"),
            Self::Day => write!(f, "day"),
        }
    }
}

/// Element of a calendar dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDto {
    pub id: i64,
    pub name: String,
    pub level: CalendarLevel,
    #[serde(with = "lenient_date")]
    pub start_date: NaiveDate,
    #[serde(with = "lenient_date")]
    pub end_date: NaiveDate,
}

impl CalendarDto {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        level: CalendarLevel,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            start_date,
            end_date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Dates are written as `YYYY-MM-DD`; the service may answer with a midnight
/// timestamp instead.
mod lenient_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date_text(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
    }
}

/// Payload for creating a dimension element.
///
/// Folders named in `parent_path` that do not exist yet are created by the
/// service; existing ones are reused.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateElementDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_path: Vec<String>,
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default)]
    pub attributes: Attributes,
}

impl CreateElementDto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn as_folder(mut self) -> Self {
        self.is_folder = true;
        self
    }

    pub fn in_folder<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_path = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Payload for updating a dimension element. Absent fields are left as is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateElementDto {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<Vec<String>>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl UpdateElementDto {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn move_to<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_path = Some(path.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// An update that puts the element back into the given state.
impl From<&DimensionElementDto> for UpdateElementDto {
    fn from(element: &DimensionElementDto) -> Self {
        Self {
            id: element.id,
            name: Some(element.name.clone()),
            parent_path: Some(element.path.clone()),
            attributes: element.attributes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeasureElementDto {
    pub coordinates: BTreeMap<String, i64>,
    #[serde(default)]
    pub values: Attributes,
}

impl CreateMeasureElementDto {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coordinate(mut self, dimension: impl Into<String>, element_id: i64) -> Self {
        self.coordinates.insert(dimension.into(), element_id);
        self
    }

    pub fn with_value(mut self, measure: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.values.insert(measure.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeasureElementDto {
    pub id: i64,
    #[serde(default)]
    pub values: Attributes,
}

impl UpdateMeasureElementDto {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, measure: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.values.insert(measure.into(), value.into());
        self
    }
}
