pub mod config;
pub mod downloader;
pub mod locate;
pub mod logging;
pub mod page;
pub mod url_model;
