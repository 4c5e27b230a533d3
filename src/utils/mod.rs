pub mod fs_utils;
pub mod net;
pub mod process_utils;
