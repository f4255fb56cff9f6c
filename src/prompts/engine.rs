//! Turns raw command arguments into a prompt.
//!
//! Arguments are positional and separated by [`DELIMITER`]:
//! `/post Eco product | Twitter | casual` binds `topic`, `platform` and `tone`
//! in that order. Missing trailing fields take their defaults; extra segments
//! are ignored.

use tracing::trace;

use super::{catalog::FieldSpec, catalog::TemplateDefinition, errors::ValidationError};

/// Separator of positional fields in the user input
pub const DELIMITER: char = '|';

/// Field values resolved for one invocation, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(Vec<(String, String)>);

impl Bindings {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The trimmed segments of one user input
#[derive(Debug, PartialEq, Eq)]
pub struct ParsedInvocation<'a> {
    segments: Vec<&'a str>,
}

impl<'a> ParsedInvocation<'a> {
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Bind segment `i` to field `i`; empty or missing segments fall back to the default
    pub fn bind(&self, fields: &[FieldSpec]) -> Result<Bindings, ValidationError> {
        let mut bindings = Vec::with_capacity(fields.len());

        for (i, field) in fields.iter().enumerate() {
            let value = match self.segments.get(i).filter(|s| !s.is_empty()) {
                Some(segment) => segment.to_string(),
                None => match field.default_value() {
                    Some(default) => default.to_string(),
                    None => {
                        return Err(ValidationError::MissingRequiredField {
                            field: field.name.clone(),
                        });
                    }
                },
            };
            bindings.push((field.name.clone(), value));
        }

        Ok(Bindings(bindings))
    }
}

/// A prompt ready to be sent to the generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub template_id: String,
    pub text: String,
    pub bindings: Bindings,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Split the raw input into trimmed segments, rejecting blank input
    pub fn parse<'a>(&self, raw_args: &'a str) -> Result<ParsedInvocation<'a>, ValidationError> {
        if raw_args.trim().is_empty() {
            return Err(ValidationError::EmptyInput);
        }

        Ok(ParsedInvocation {
            segments: raw_args.split(DELIMITER).map(str::trim).collect(),
        })
    }

    pub fn render(
        &self,
        raw_args: &str,
        template: &TemplateDefinition,
    ) -> Result<RenderedPrompt, ValidationError> {
        let parsed = self.parse(raw_args)?;
        let bindings = parsed.bind(&template.fields)?;
        let text = self.substitute(&template.body, &bindings);

        trace!(template = %template.id, segments = parsed.segments().len(), "Prompt rendered");

        Ok(RenderedPrompt {
            template_id: template.id.clone(),
            text,
            bindings,
        })
    }

    /// Replace every `{name}` bound in `bindings`. Unbound placeholders are kept as they are,
    /// and substituted values are never scanned again.
    pub fn substitute(&self, body: &str, bindings: &Bindings) -> String {
        let mut out = String::with_capacity(body.len());
        let mut rest = body;

        while let Some((start, end, name)) = next_placeholder(rest) {
            out.push_str(&rest[..start]);
            match bindings.get(name) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..end]),
            }
            rest = &rest[end..];
        }

        out.push_str(rest);
        out
    }
}

/// Names of all `{name}` placeholders in `text`, in order of appearance
pub(crate) fn placeholders(text: &str) -> Vec<&str> {
    let mut names = vec![];
    let mut rest = text;

    while let Some((_, end, name)) = next_placeholder(rest) {
        names.push(name);
        rest = &rest[end..];
    }

    names
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte range and name of the first placeholder in `text`
fn next_placeholder(text: &str) -> Option<(usize, usize, &str)> {
    let mut from = 0;

    while let Some(open) = text[from..].find('{').map(|i| i + from) {
        let after = &text[open + 1..];
        let len = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());

        if len > 0 && after[len..].starts_with('}') {
            // `{` and `}` are one byte each
            return Some((open, open + len + 2, &after[..len]));
        }

        from = open + 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::Catalog;
    use crate::prompts::catalog::tests::{field, template};

    fn post() -> TemplateDefinition {
        Catalog::builtin().expect("valid builtin catalog").templates()[0].clone()
    }

    #[test]
    fn empty_input_is_rejected() {
        let engine = TemplateEngine::new();
        let post = post();

        assert_eq!(engine.render("", &post), Err(ValidationError::EmptyInput));
        assert_eq!(engine.render("   \n\t", &post), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn topic_only_uses_defaults() {
        let prompt = TemplateEngine::new().render("TopicOnly", &post()).expect("render");

        assert_eq!(prompt.bindings.get("topic"), Some("TopicOnly"));
        assert_eq!(prompt.bindings.get("platform"), Some("Instagram"));
        assert_eq!(prompt.bindings.get("tone"), Some("profesjonalny"));

        assert!(prompt.text.contains("Temat: TopicOnly"));
        assert!(prompt.text.contains("Platforma: Instagram"));
        assert!(prompt.text.contains("Ton: profesjonalny"));
    }

    #[test]
    fn all_fields_supplied() {
        let prompt = TemplateEngine::new()
            .render("Eco product | Twitter | casual", &post())
            .expect("render");

        assert_eq!(prompt.bindings.get("topic"), Some("Eco product"));
        assert_eq!(prompt.bindings.get("platform"), Some("Twitter"));
        assert_eq!(prompt.bindings.get("tone"), Some("casual"));
        assert_eq!(prompt.template_id, "post");
    }

    #[test]
    fn extra_segments_are_ignored() {
        let engine = TemplateEngine::new();
        let post = post();

        let three = engine.render("Eco | Twitter | casual", &post).expect("render");
        let five = engine
            .render("Eco | Twitter | casual | extra | more", &post)
            .expect("render");

        assert_eq!(three, five);
    }

    #[test]
    fn empty_primary_field_is_rejected() {
        let engine = TemplateEngine::new();
        let post = post();

        assert_eq!(
            engine.render(" | Twitter", &post),
            Err(ValidationError::MissingRequiredField {
                field: "topic".to_string()
            })
        );
        assert_eq!(
            engine.render("|x|y", &post),
            Err(ValidationError::MissingRequiredField {
                field: "topic".to_string()
            })
        );
    }

    #[test]
    fn empty_default_is_never_rendered() {
        let t = template("post", "T:{topic} P:{platform}", vec![field("topic", Some(""))]);

        assert_eq!(
            TemplateEngine::new().render(" | x", &t),
            Err(ValidationError::MissingRequiredField {
                field: "topic".to_string()
            })
        );

        let t = template(
            "post",
            "T:{topic} P:{platform}",
            vec![field("topic", None), field("platform", Some(""))],
        );
        assert_eq!(
            TemplateEngine::new().render("Kawa", &t),
            Err(ValidationError::MissingRequiredField {
                field: "platform".to_string()
            })
        );
    }

    #[test]
    fn empty_middle_segment_uses_default() {
        let prompt = TemplateEngine::new()
            .render("Eco ||  casual ", &post())
            .expect("render");

        assert_eq!(prompt.bindings.get("platform"), Some("Instagram"));
        assert_eq!(prompt.bindings.get("tone"), Some("casual"));
    }

    #[test]
    fn render_is_idempotent() {
        let engine = TemplateEngine::new();
        let post = post();

        let first = engine.render("Kawa | LinkedIn", &post).expect("render");
        let second = engine.render("Kawa | LinkedIn", &post).expect("render");

        assert_eq!(first.text.as_bytes(), second.text.as_bytes());
    }

    #[test]
    fn no_placeholder_left_in_builtin_templates() {
        let engine = TemplateEngine::new();
        let catalog = Catalog::builtin().expect("valid builtin catalog");

        for template in catalog.templates() {
            let prompt = engine.render("Topic", template).expect("render");
            for field in template.fields.iter() {
                let token = format!("{{{}}}", field.name);
                assert!(
                    !prompt.text.contains(&token),
                    "{} left in {}",
                    token,
                    template.id
                );
            }
            assert!(placeholders(&prompt.text).is_empty(), "{}", template.id);
        }
    }

    #[test]
    fn substituted_values_are_not_expanded() {
        let t = template(
            "post",
            "Topic: {topic} / Tone: {tone}",
            vec![field("topic", None), field("tone", Some("calm"))],
        );

        let prompt = TemplateEngine::new().render("{tone}", &t).expect("render");

        assert_eq!(prompt.text, "Topic: {tone} / Tone: calm");
    }

    #[test]
    fn substitute_keeps_unbound_and_non_placeholder_braces() {
        let engine = TemplateEngine::new();
        let bindings: Bindings = [("name", "Ada")].into_iter().collect();

        assert_eq!(
            engine.substitute(r#"Hi {name}, {other} {"json": 1} { name } {}"#, &bindings),
            r#"Hi Ada, {other} {"json": 1} { name } {}"#
        );
    }

    #[test]
    fn placeholder_scan() {
        assert_eq!(placeholders("{a} and {b_2}{c}"), vec!["a", "b_2", "c"]);
        assert_eq!(placeholders("{{a}}"), vec!["a"]);
        assert!(placeholders("no { placeholders } here {").is_empty());
        assert_eq!(placeholders("żółć {pole} ąę"), vec!["pole"]);
    }
}
