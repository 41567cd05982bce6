//! Model loading and inference components

pub mod classifier;
#[cfg(feature = "onnx")]
pub mod inference;
pub mod linear;
pub mod loader;

pub use classifier::Classifier;
#[cfg(feature = "onnx")]
pub use inference::OnnxClassifier;
pub use linear::LinearClassifier;
pub use loader::ModelLoader;
