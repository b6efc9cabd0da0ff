pub mod discovery;
pub mod output_writer;

pub use discovery::{discover_files, scan_input_folder};
pub use output_writer::{
    ensure_output_folder, find_collisions, output_path, OutputArtifact, OutputWriter,
};
