//! Caller-supplied argument values for one operation invocation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ApiError;

/// A query argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    List(Vec<String>),
}

/// Path, query, header and body arguments for a single call.
///
/// Absent values are simply not recorded: `path_opt`, `query_opt` and
/// `header_opt` accept an `Option` and skip `None`, so the builder never
/// sees a null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub(crate) path: BTreeMap<String, String>,
    pub(crate) query: BTreeMap<String, QueryValue>,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) body: Option<serde_json::Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, name: &str, value: impl ToString) -> Self {
        self.path.insert(name.to_string(), value.to_string());
        self
    }

    pub fn path_opt<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.path(name, value),
            None => self,
        }
    }

    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query
            .insert(name.to_string(), QueryValue::Single(value.to_string()));
        self
    }

    pub fn query_opt<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    pub fn query_list<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        self.query.insert(name.to_string(), QueryValue::List(values));
        self
    }

    /// Set a header; names are matched case-insensitively.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.header(name, value),
            None => self,
        }
    }

    /// Serialize `body` as the request payload.
    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(ApiError::Serialization)?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn set_query(&mut self, name: &str, value: Option<String>) {
        match value {
            Some(value) => {
                self.query.insert(name.to_string(), QueryValue::Single(value));
            }
            None => {
                self.query.remove(name);
            }
        }
    }

    pub fn path_value(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }

    pub fn query_value(&self, name: &str) -> Option<&QueryValue> {
        self.query.get(name)
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}
