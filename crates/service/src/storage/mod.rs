//! File-backed state that survives restarts.

pub mod json_file_map;
