pub mod launch_status;
pub mod settings;
