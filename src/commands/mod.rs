pub mod game_watcher;
pub mod launch_pipeline;
pub mod server_supervisor;
