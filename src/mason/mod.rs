//! Mason hypermedia documents.
//!
//! A [`MasonBuilder`] is a JSON object with a few reserved keys:
//! `@namespaces`, `@controls` and `@error`. Ordinary fields and an optional
//! `items` list sit beside them. See
//! <https://github.com/JornWildt/Mason/blob/master/Documentation/Mason-draft-2.md>.

pub mod nearby;

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub use nearby::NearbyControls;

/// HTTP methods a control may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Methods that carry a request body and therefore a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMethod {
    Post,
    Put,
    Patch,
}

impl From<BodyMethod> for Method {
    fn from(method: BodyMethod) -> Self {
        match method {
            BodyMethod::Post => Method::Post,
            BodyMethod::Put => Method::Put,
            BodyMethod::Patch => Method::Patch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Json,
}

/// A single entry under `@controls`.
///
/// Only the constructors can build one, so `encoding` and `schema` are
/// present exactly when the method takes a body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<Method>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<Encoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<Value>,
}

impl Control {
    /// A bare navigation link.
    pub fn link(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method: None,
            encoding: None,
            title: None,
            schema: None,
        }
    }

    pub fn get(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            method: Some(Method::Get),
            title: Some(title.into()),
            ..Self::link(href)
        }
    }

    pub fn delete(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            method: Some(Method::Delete),
            title: Some(title.into()),
            ..Self::link(href)
        }
    }

    /// A control whose request body is JSON described by `schema`.
    pub fn submit(
        method: BodyMethod,
        href: impl Into<String>,
        title: impl Into<String>,
        schema: Value,
    ) -> Self {
        Self {
            href: href.into(),
            method: Some(method.into()),
            encoding: Some(Encoding::Json),
            title: Some(title.into()),
            schema: Some(schema),
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Namespace {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBlock {
    #[serde(rename = "@message")]
    pub message: String,
    #[serde(rename = "@messages")]
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MasonBuilder {
    #[serde(rename = "@namespaces", skip_serializing_if = "BTreeMap::is_empty")]
    namespaces: BTreeMap<String, Namespace>,
    #[serde(rename = "@controls", skip_serializing_if = "BTreeMap::is_empty")]
    controls: BTreeMap<String, Control>,
    #[serde(rename = "@error", skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Vec<MasonBuilder>>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl MasonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an ordinary body field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets the error block. Meant for root documents in error responses.
    pub fn add_error(
        &mut self,
        title: impl Into<String>,
        details: impl IntoIterator<Item = String>,
    ) -> &mut Self {
        self.error = Some(ErrorBlock {
            message: title.into(),
            messages: details.into_iter().collect(),
        });
        self
    }

    pub fn add_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) -> &mut Self {
        self.namespaces
            .insert(prefix.into(), Namespace { name: uri.into() });
        self
    }

    pub fn add_control(&mut self, name: impl Into<String>, control: Control) -> &mut Self {
        self.controls.insert(name.into(), control);
        self
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    /// Marks the document as a list. The `items` key is emitted even when
    /// nothing is pushed afterwards.
    pub fn with_items(&mut self) -> &mut Self {
        self.items.get_or_insert_with(Vec::new);
        self
    }

    pub fn push_item(&mut self, item: MasonBuilder) -> &mut Self {
        self.items.get_or_insert_with(Vec::new).push(item);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_namespace_last_write_wins() {
        let mut doc = MasonBuilder::new();
        doc.add_namespace("nearby", "/old/")
            .add_namespace("nearby", "/nearby/link-relations/");

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({"@namespaces": {"nearby": {"name": "/nearby/link-relations/"}}})
        );
    }

    #[test]
    fn test_control_overwrites_by_name() {
        let mut doc = MasonBuilder::new();
        doc.add_control("self", Control::link("/a/"))
            .add_control("self", Control::link("/b/"));
        assert_eq!(doc.control("self").map(Control::href), Some("/b/"));
    }

    #[test]
    fn test_submit_control_shape() {
        let control = Control::submit(
            BodyMethod::Put,
            "/api/areas/x/",
            "Edit this area",
            json!({"type": "object"}),
        );
        assert_eq!(
            serde_json::to_value(&control).unwrap(),
            json!({
                "href": "/api/areas/x/",
                "method": "PUT",
                "encoding": "json",
                "title": "Edit this area",
                "schema": {"type": "object"}
            })
        );
    }

    #[test]
    fn test_link_has_only_href() {
        assert_eq!(
            serde_json::to_value(Control::link("/api/")).unwrap(),
            json!({"href": "/api/"})
        );
        let delete = serde_json::to_value(Control::delete("/x/", "Delete")).unwrap();
        assert_eq!(delete["method"], "DELETE");
        assert!(delete.get("schema").is_none());
        assert!(delete.get("encoding").is_none());
    }

    #[test]
    fn test_error_block() {
        let mut doc = MasonBuilder::new().with("resource_url", "/api/areas/");
        doc.add_error("Not found", ["No area was found".to_string()]);

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "resource_url": "/api/areas/",
                "@error": {"@message": "Not found", "@messages": ["No area was found"]}
            })
        );
    }

    #[test]
    fn test_items_list() {
        let mut doc = MasonBuilder::new();
        doc.with_items();
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({"items": []}));

        let mut item = MasonBuilder::new().with("name", "Oulu - Keskusta");
        item.add_control("self", Control::link("/api/areas/Oulu%20-%20Keskusta/"));
        doc.push_item(item);

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["items"][0]["name"], "Oulu - Keskusta");
        assert_eq!(
            value["items"][0]["@controls"]["self"]["href"],
            "/api/areas/Oulu%20-%20Keskusta/"
        );
    }
}
