pub mod error;
pub mod execution_context;
pub mod function_object;
pub mod object;
pub mod object_property;
pub mod operations;
pub mod symbol;
pub mod value;
