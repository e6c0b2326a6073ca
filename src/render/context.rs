use tera::{Context, Value};

use crate::render::index::DocumentNode;

/// Template bindings for one document.
///
/// Front matter fields are exposed at the top level; `front_matter`, `body`,
/// `path` and `output_path` take precedence over fields with the same name.
pub fn build_context(doc: &DocumentNode) -> Context {
    let mut context = Context::new();
    if let Some(front_matter) = &doc.front_matter {
        for (key, value) in front_matter {
            context.insert(key, value);
        }
    }

    let front_matter = doc
        .front_matter
        .clone()
        .map_or(Value::Null, Value::Object);
    context.insert("front_matter", &front_matter);
    context.insert("body", &doc.body);
    context.insert("path", &doc.input_path);
    context.insert("output_path", &doc.output_path);
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front_matter::FrontMatter;

    #[test]
    fn front_matter_fields_are_top_level_and_reserved_names_win() {
        let mut fm = FrontMatter::new();
        fm.insert("title".into(), Value::String("Hello".into()));
        fm.insert("body".into(), Value::String("shadowed".into()));
        let doc = DocumentNode {
            input_path: "posts/a.md".into(),
            front_matter: Some(fm),
            body: "real body".into(),
            output_path: Some("posts/a.html".into()),
            template: None,
        };

        let json = build_context(&doc).into_json();
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["front_matter"]["title"], "Hello");
        assert_eq!(json["body"], "real body");
        assert_eq!(json["path"], "posts/a.md");
        assert_eq!(json["output_path"], "posts/a.html");
    }

    #[test]
    fn missing_front_matter_binds_null() {
        let doc = DocumentNode {
            input_path: "a.txt".into(),
            front_matter: None,
            body: "x".into(),
            output_path: None,
            template: None,
        };
        let json = build_context(&doc).into_json();
        assert!(json["front_matter"].is_null());
        assert!(json["output_path"].is_null());
    }
}
