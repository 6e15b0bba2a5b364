use serde::{Deserialize, Serialize};

use super::attribute::AttributeDto;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDto>,
}

impl DimensionDto {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeDto) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDto> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureGroupDto {
    pub id: i64,
    pub name: String,
    /// Names of the dimensions a row is addressed by.
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub measures: Vec<AttributeDto>,
}

impl MeasureGroupDto {
    pub fn measure(&self, name: &str) -> Option<&AttributeDto> {
        self.measures.iter().find(|m| m.name == name)
    }
}
