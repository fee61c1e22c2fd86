//! Labeled input control: a label bound to a fully controlled input.

use crate::render::html::escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Line,
    TextArea { rows: u8 },
}

/// Renders `value` as given and forwards every change to `on_change`
/// unchanged. No validation, no internal state.
pub struct LabeledInput<'a, H> {
    pub id: &'a str,
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub kind: InputKind,
    pub on_change: H,
}

impl<'a, H> LabeledInput<'a, H>
where
    H: FnMut(ChangeEvent),
{
    /// Delivers one change event to the handler.
    pub fn dispatch(&mut self, new_value: impl Into<String>) {
        (self.on_change)(ChangeEvent {
            id: self.id.to_string(),
            value: new_value.into(),
        });
    }

    pub fn render_html(&self) -> String {
        let id = escape(self.id);
        let label = format!("<label for=\"{id}\">{}</label>", escape(self.label));
        let control = match self.kind {
            InputKind::Line => format!(
                "<input type=\"text\" id=\"{id}\" name=\"{id}\" placeholder=\"{}\" value=\"{}\">",
                escape(self.placeholder),
                escape(self.value),
            ),
            InputKind::TextArea { rows } => format!(
                "<textarea id=\"{id}\" name=\"{id}\" rows=\"{rows}\" placeholder=\"{}\">{}</textarea>",
                escape(self.placeholder),
                escape(self.value),
            ),
        };
        format!("<div class=\"field\">{label}{control}</div>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: [(&str, &str); 5] = [
        ("Name", "Your name"),
        ("", ""),
        ("Skills & tools", "e.g. \"Rust\" <fast>"),
        ("Ünïcödé", "日本語のプレースホルダー"),
        ("a'b", "c'd"),
    ];

    fn control<'a>(
        label: &'a str,
        placeholder: &'a str,
        kind: InputKind,
    ) -> LabeledInput<'a, impl FnMut(ChangeEvent)> {
        LabeledInput {
            id: "field-1",
            label,
            value: "",
            placeholder,
            kind,
            on_change: |_: ChangeEvent| {},
        }
    }

    /// Returns the `for` target of the label and the element carrying that id.
    fn label_target(html: &str) -> (&str, &str) {
        let for_start = html.find("for=\"").unwrap() + 5;
        let for_end = for_start + html[for_start..].find('"').unwrap();
        let target = &html[for_start..for_end];
        let needle = format!(" id=\"{target}\"");
        let id_pos = html.find(&needle).unwrap();
        let element_start = html[..id_pos].rfind('<').unwrap();
        let element_end = id_pos + html[id_pos..].find('>').unwrap();
        (target, &html[element_start..=element_end])
    }

    #[test]
    fn test_label_is_bound_to_element_with_placeholder() {
        for kind in [InputKind::Line, InputKind::TextArea { rows: 3 }] {
            for (label, placeholder) in PAIRS {
                let html = control(label, placeholder, kind).render_html();
                assert!(html.contains(&format!(">{}</label>", escape(label))));
                let (target, element) = label_target(&html);
                assert_eq!(target, "field-1");
                assert!(
                    element.contains(&format!("placeholder=\"{}\"", escape(placeholder))),
                    "element {element} lacks placeholder for label {label:?}"
                );
            }
        }
    }

    #[test]
    fn test_each_dispatch_calls_handler_once_with_new_value() {
        let mut seen = Vec::new();
        {
            let mut input = LabeledInput {
                id: "message",
                label: "Message",
                value: "",
                placeholder: "Type a message",
                kind: InputKind::Line,
                on_change: |e: ChangeEvent| seen.push(e),
            };
            for value in ["H", "He", "Hello World", ""] {
                input.dispatch(value);
            }
        }
        let values: Vec<_> = seen.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["H", "He", "Hello World", ""]);
        assert!(seen.iter().all(|e| e.id == "message"));
    }

    #[test]
    fn test_dispatch_does_not_change_rendered_value() {
        let mut input = LabeledInput {
            id: "headline",
            label: "Headline",
            value: "before",
            placeholder: "",
            kind: InputKind::Line,
            on_change: |_: ChangeEvent| {},
        };
        input.dispatch("after");
        assert!(input.render_html().contains("value=\"before\""));
    }

    #[test]
    fn test_value_is_escaped() {
        let input = LabeledInput {
            id: "summary",
            label: "Summary",
            value: "</textarea><script>",
            placeholder: "",
            kind: InputKind::TextArea { rows: 2 },
            on_change: |_: ChangeEvent| {},
        };
        let html = input.render_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;"));
    }
}
