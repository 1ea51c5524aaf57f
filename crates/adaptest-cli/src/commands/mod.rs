pub mod analyze;
pub mod efficiency;
pub mod estimate;
pub mod init;
pub mod simulate;
pub mod validate;
