use std::collections::BTreeMap;
use std::fmt;

use crate::error::{HarnessError, HarnessResult};

/// Routes of the service, written the way the test cases spell them.
pub mod routes {
    pub const DIMENSIONS: &str = "/api/dimensions";
    pub const DIMENSION: &str = "/api/dimensions/{dimensionId}";
    pub const DIMENSION_ELEMENTS: &str = "/api/dimensions/{dimensionId}/elements";
    pub const DIMENSION_ELEMENTS_SEARCH: &str = "/api/dimensions/{dimensionId}/elements/search";
    pub const MEASURE_GROUP: &str = "/api/measuregroups/{measureGroupId}";
    pub const MEASURE_GROUP_ELEMENTS: &str = "/api/measuregroups/{measureGroupId}/elements";
    pub const MEASURE_GROUP_ELEMENTS_SEARCH: &str =
        "/api/measuregroups/{measureGroupId}/elements/search";
    pub const CALENDAR_SEARCH: &str = "/api/calendars/{calendarId}/elements/search";
}

/// Values bound to the `{placeholders}` of a [`UrlTemplate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: BTreeMap<String, String>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.values.insert(name.into(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// A relative URL with `{name}` placeholders, e.g.
/// `/api/dimensions/{dimensionId}/elements`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> HarnessResult<Vec<&str>> {
        let mut names = Vec::new();
        self.walk(|segment| {
            if let Segment::Placeholder(name) = segment {
                names.push(name);
            }
            Ok(())
        })?;
        Ok(names)
    }

    /// Substitute every placeholder. Unbound placeholders are an error;
    /// extra parameters are ignored.
    pub fn render(&self, params: &PathParams) -> HarnessResult<String> {
        let mut out = String::with_capacity(self.template.len());
        self.walk(|segment| {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = params.get(name).ok_or_else(|| HarnessError::UnboundPlaceholder {
                        template: self.template.clone(),
                        placeholder: name.to_string(),
                    })?;
                    out.push_str(value);
                }
            }
            Ok(())
        })?;
        Ok(out)
    }

    fn walk<'a>(
        &'a self,
        mut visit: impl FnMut(Segment<'a>) -> HarnessResult<()>,
    ) -> HarnessResult<()> {
        let malformed = || HarnessError::MalformedTemplate(self.template.clone());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            let literal = &rest[..open];
            if literal.contains('}') {
                return Err(malformed());
            }
            visit(Segment::Literal(literal))?;

            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(malformed)?;
            let name = &after[..close];
            if name.is_empty() || name.contains('{') {
                return Err(malformed());
            }
            visit(Segment::Placeholder(name))?;
            rest = &after[close + 1..];
        }

        if rest.contains('}') {
            return Err(malformed());
        }
        visit(Segment::Literal(rest))
    }
}

impl From<&str> for UrlTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}
