pub mod deserializer;
pub mod heap;
pub mod object_pool;
pub mod options;
pub mod serialized_value;
pub mod serializer;
pub mod status;
pub mod transfer;
