pub mod config;
pub mod logging;

pub mod control;
pub mod desktop;
pub mod queue_db;
pub mod resolver;
pub mod scheduler;
pub mod video_id;
pub mod ytdlp;
