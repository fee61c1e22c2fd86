pub mod cv;

pub use cv::{CvDocument, FieldId};
