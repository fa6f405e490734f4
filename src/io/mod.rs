pub mod dataset_io;
pub mod sample_data;
