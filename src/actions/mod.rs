pub mod display;
pub mod handler;
pub mod history;
pub mod report;
