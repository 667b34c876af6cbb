pub mod annotator;
pub mod article;
pub mod html;
pub mod span;

pub use annotator::{Annotation, annotate, link_labels};
pub use article::Article;
pub use span::{CharMap, Span};
