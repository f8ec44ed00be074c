pub mod child_mapper;

pub use child_mapper::ChildMapper;
