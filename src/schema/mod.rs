//! Compiled schema input: descriptor set model and loader.

pub mod descriptor;
pub mod loader;

pub use descriptor::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet,
    OneofDescriptorProto, OptionsJson,
};
pub use loader::{load, load_descriptor_set, load_descriptor_sets, parse_descriptor_set};
