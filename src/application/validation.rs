//! Declarative field validation.
//!
//! Each handler states its rules with [`ValidationErrors::rule_for`]; all
//! failing fields are collected and reported together.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{AppError, Result};

// == Validation Errors ==
/// Failure messages keyed by the camelCase field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Starts a rule chain for `field`. The chain records at most one failure.
    pub fn rule_for<T>(&mut self, field: &'static str, value: T) -> Rule<'_, T> {
        Rule {
            errors: self,
            field,
            value,
            failed: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing failed, otherwise `AppError::Validation`.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

// == Rule ==
/// A chain of checks over one field value; stops at the first failure.
pub struct Rule<'a, T> {
    errors: &'a mut ValidationErrors,
    field: &'static str,
    value: T,
    failed: bool,
}

impl<T> Rule<'_, T> {
    /// Fails with `message` unless `ok`.
    pub fn must(mut self, ok: bool, message: &str) -> Self {
        if !self.failed && !ok {
            self.errors.add(self.field, message);
            self.failed = true;
        }
        self
    }
}

impl<'v, T> Rule<'_, &'v T>
where
    T: AsRef<str> + ?Sized,
{
    pub fn not_empty(self, message: &str) -> Self {
        let ok = !self.value.as_ref().trim().is_empty();
        self.must(ok, message)
    }

    /// Length in characters within `min..=max`.
    pub fn length(self, min: usize, max: usize, message: &str) -> Self {
        let len = self.value.as_ref().chars().count();
        self.must((min..=max).contains(&len), message)
    }

    pub fn max_length(self, max: usize, message: &str) -> Self {
        let len = self.value.as_ref().chars().count();
        self.must(len <= max, message)
    }
}

impl<T: PartialOrd + Copy> Rule<'_, T> {
    pub fn at_least(self, min: T, message: &str) -> Self {
        let ok = self.value >= min;
        self.must(ok, message)
    }

    pub fn less_than(self, bound: T, message: &str) -> Self {
        let ok = self.value < bound;
        self.must(ok, message)
    }
}
