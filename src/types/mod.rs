// ABOUTME: Validated domain types shared across modules.
// ABOUTME: App names are checked once at the boundary and trusted after.

mod app_name;

pub use app_name::{AppName, AppNameError};
