//! Model capability traits

mod image;
mod language_model;

pub use image::ImageModel;
pub use language_model::LanguageModel;
