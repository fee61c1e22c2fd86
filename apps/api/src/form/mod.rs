// Editor form: labeled controlled inputs and the handlers that feed their
// change events into the document store.

pub mod handlers;
pub mod labeled_input;

pub use labeled_input::{ChangeEvent, InputKind, LabeledInput};

use crate::models::{CvDocument, FieldId};

/// Builds the control for one field of `doc`, reporting changes to `on_change`.
pub fn field_input<'a, H>(doc: &'a CvDocument, field: FieldId, on_change: H) -> LabeledInput<'a, H>
where
    H: FnMut(ChangeEvent),
{
    let kind = if field.is_multiline() {
        InputKind::TextArea { rows: 5 }
    } else {
        InputKind::Line
    };
    LabeledInput {
        id: field.as_str(),
        label: field.label(),
        value: doc.field(field),
        placeholder: field.placeholder(),
        kind,
        on_change,
    }
}

/// Routes one change event through the field's control and applies what the
/// handler received. The control itself never writes the value.
pub fn apply_change(doc: &mut CvDocument, field: FieldId, new_value: String) {
    let mut received: Option<String> = None;
    field_input(doc, field, |event: ChangeEvent| received = Some(event.value)).dispatch(new_value);
    if let Some(value) = received {
        doc.set_field(field, value);
    }
}

/// Editor markup for every field, in display order.
pub fn render_fields(doc: &CvDocument) -> String {
    FieldId::ALL
        .into_iter()
        .map(|field| field_input(doc, field, |_| {}).render_html())
        .collect()
}
