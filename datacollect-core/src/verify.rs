//! Comparison of actual element lists against expected fixtures.
//!
//! A verifier never fails fast: it walks both lists completely and collects
//! every problem into one diagnostic message, so a failing test shows the
//! whole picture at once.

use std::collections::BTreeSet;
use std::fmt::{Debug, Display};
use std::marker::PhantomData;

use crate::domain::{
    Attributes, CalendarDto, DimensionElementDto, ElementDto, MeasureElementDto,
};

/// Outcome of a verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub passed: bool,
    pub message: String,
}

impl Verification {
    pub fn from_problems(problems: Vec<String>) -> Self {
        if problems.is_empty() {
            Self {
                passed: true,
                message: "ok".to_string(),
            }
        } else {
            Self {
                passed: false,
                message: problems.join("\n"),
            }
        }
    }

    /// Panic with the diagnostic message unless the verification passed.
    #[track_caller]
    pub fn assert(&self) {
        if !self.passed {
            panic!("verification failed:\n{}", self.message);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchBy {
    #[default]
    Id,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerifyOptions {
    pub match_by: MatchBy,
    /// Require actual entries to appear in the expected order.
    pub ordered: bool,
    /// Skip id comparisons (server-generated ids of freshly created data).
    pub ignore_ids: bool,
    /// Tolerate actual entries that are not in the expected list.
    pub allow_extra: bool,
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for data created during the test: matched by name, ids ignored.
    pub fn created() -> Self {
        Self {
            match_by: MatchBy::Name,
            ignore_ids: true,
            ..Self::default()
        }
    }

    pub fn match_by(mut self, match_by: MatchBy) -> Self {
        self.match_by = match_by;
        self
    }

    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    pub fn ignore_ids(mut self) -> Self {
        self.ignore_ids = true;
        self
    }

    pub fn allow_extra(mut self) -> Self {
        self.allow_extra = true;
        self
    }
}

/// An entity the verifier knows how to key and compare.
pub trait Verifiable: Debug {
    fn id(&self) -> i64;

    /// Natural key used with [`MatchBy::Name`].
    fn name_key(&self) -> String;

    /// Field differences between `self` (actual) and `expected`, formatted as
    /// `<field> expected <e> but was <a>`.
    fn differences(&self, expected: &Self, options: &VerifyOptions) -> Vec<String>;
}

fn push_diff<T: Debug + PartialEq>(out: &mut Vec<String>, field: &str, expected: &T, actual: &T) {
    if expected != actual {
        out.push(format!("{} expected {:?} but was {:?}", field, expected, actual));
    }
}

fn push_display_diff<T: Display + PartialEq>(
    out: &mut Vec<String>,
    field: &str,
    expected: &T,
    actual: &T,
) {
    if expected != actual {
        out.push(format!("{} expected {} but was {}", field, expected, actual));
    }
}

fn diff_attributes(out: &mut Vec<String>, label: &str, expected: &Attributes, actual: &Attributes) {
    let names: BTreeSet<&String> = expected.keys().chain(actual.keys()).collect();
    for name in names {
        match (expected.get(name), actual.get(name)) {
            (Some(e), Some(a)) if e != a => {
                out.push(format!("{} '{}' expected {} but was {}", label, name, e, a))
            }
            (Some(e), None) => out.push(format!("{} '{}' expected {} but was absent", label, name, e)),
            (None, Some(a)) => out.push(format!("{} '{}' unexpected with value {}", label, name, a)),
            _ => {}
        }
    }
}

impl Verifiable for ElementDto {
    fn id(&self) -> i64 {
        self.id
    }

    fn name_key(&self) -> String {
        self.name.clone()
    }

    fn differences(&self, expected: &Self, options: &VerifyOptions) -> Vec<String> {
        let mut out = Vec::new();
        if !options.ignore_ids {
            push_diff(&mut out, "id", &expected.id, &self.id);
        }
        push_diff(&mut out, "name", &expected.name, &self.name);
        diff_attributes(&mut out, "attribute", &expected.attributes, &self.attributes);
        out
    }
}

impl Verifiable for DimensionElementDto {
    fn id(&self) -> i64 {
        self.id
    }

    fn name_key(&self) -> String {
        self.full_path()
    }

    fn differences(&self, expected: &Self, options: &VerifyOptions) -> Vec<String> {
        let mut out = Vec::new();
        if !options.ignore_ids {
            push_diff(&mut out, "id", &expected.id, &self.id);
            push_diff(&mut out, "parentId", &expected.parent_id, &self.parent_id);
        }
        push_diff(&mut out, "name", &expected.name, &self.name);
        push_diff(&mut out, "isFolder", &expected.is_folder, &self.is_folder);
        push_diff(&mut out, "path", &expected.path, &self.path);
        diff_attributes(&mut out, "attribute", &expected.attributes, &self.attributes);
        out
    }
}

impl Verifiable for MeasureElementDto {
    fn id(&self) -> i64 {
        self.id
    }

    fn name_key(&self) -> String {
        self.coordinate_key()
    }

    fn differences(&self, expected: &Self, options: &VerifyOptions) -> Vec<String> {
        let mut out = Vec::new();
        if !options.ignore_ids {
            push_diff(&mut out, "id", &expected.id, &self.id);
        }
        push_diff(&mut out, "coordinates", &expected.coordinates, &self.coordinates);
        diff_attributes(&mut out, "value", &expected.values, &self.values);
        out
    }
}

impl Verifiable for CalendarDto {
    fn id(&self) -> i64 {
        self.id
    }

    fn name_key(&self) -> String {
        self.name.clone()
    }

    fn differences(&self, expected: &Self, options: &VerifyOptions) -> Vec<String> {
        let mut out = Vec::new();
        if !options.ignore_ids {
            push_diff(&mut out, "id", &expected.id, &self.id);
        }
        push_diff(&mut out, "name", &expected.name, &self.name);
        push_display_diff(&mut out, "level", &expected.level, &self.level);
        push_display_diff(&mut out, "startDate", &expected.start_date, &self.start_date);
        push_display_diff(&mut out, "endDate", &expected.end_date, &self.end_date);
        out
    }
}

/// Compares actual entity lists with expected ones.
#[derive(Debug, Clone)]
pub struct ElementsVerifier<T> {
    options: VerifyOptions,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Verifiable> Default for ElementsVerifier<T> {
    fn default() -> Self {
        Self::new(VerifyOptions::default())
    }
}

pub type ElementListVerifier = ElementsVerifier<ElementDto>;
pub type DimensionElementsVerifier = ElementsVerifier<DimensionElementDto>;
pub type MeasureElementsVerifier = ElementsVerifier<MeasureElementDto>;
pub type CalendarVerifier = ElementsVerifier<CalendarDto>;

impl<T: Verifiable> ElementsVerifier<T> {
    pub fn new(options: VerifyOptions) -> Self {
        Self {
            options,
            _marker: PhantomData,
        }
    }

    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    fn key(&self, item: &T) -> String {
        match self.options.match_by {
            MatchBy::Id => item.id().to_string(),
            MatchBy::Name => item.name_key(),
        }
    }

    pub fn verify(&self, actual: &[T], expected: &[T]) -> Verification {
        let mut problems = Vec::new();

        if !self.options.allow_extra && actual.len() != expected.len() {
            problems.push(format!(
                "count expected {} but was {}",
                expected.len(),
                actual.len()
            ));
        }

        let actual_keys: Vec<String> = actual.iter().map(|a| self.key(a)).collect();
        let mut used = vec![false; actual.len()];
        let mut last_index: Option<usize> = None;

        for (position, wanted) in expected.iter().enumerate() {
            let key = self.key(wanted);
            let found = actual_keys
                .iter()
                .enumerate()
                .position(|(i, k)| !used[i] && *k == key);

            let Some(index) = found else {
                problems.push(format!("missing: {}", key));
                continue;
            };
            used[index] = true;

            for difference in actual[index].differences(wanted, &self.options) {
                problems.push(format!("{}: {}", key, difference));
            }

            if self.options.ordered {
                if self.options.allow_extra {
                    if matches!(last_index, Some(previous) if index < previous) {
                        problems.push(format!("{}: out of order at position {}", key, index));
                    }
                } else if index != position {
                    problems.push(format!(
                        "{}: position expected {} but was {}",
                        key, position, index
                    ));
                }
                last_index = Some(index);
            }
        }

        if !self.options.allow_extra {
            for (index, key) in actual_keys.iter().enumerate() {
                if !used[index] {
                    problems.push(format!("unexpected: {}", key));
                }
            }
        }

        Verification::from_problems(problems)
    }
}
