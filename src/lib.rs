pub mod clock;
pub mod draw;
pub mod gallery;
pub mod gui;
pub mod logging;
pub mod settings;
pub mod storage;
pub mod toast_log;
