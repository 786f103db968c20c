pub mod binary;
pub mod lz4;
pub mod codec;
pub mod header;
pub mod frame;
pub mod index;
pub mod name;
pub mod progress;
pub mod perf;
pub mod timelapse;
pub mod scan;
pub mod export;

pub use codec::{CodecError, CodecId, get_codec};
pub use lz4::decompress_block;
pub use name::process_name;
pub use timelapse::{
    is_complete_save, load_timelapse, load_timelapse_with, LoadError, LoadOptions, RawFileEntry,
    SaveKind, TimeLapse,
};
