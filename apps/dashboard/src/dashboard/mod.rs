// Dashboard view layer: per-session state, view models and the routes that drive them.

pub mod backlog;
pub mod competitors;
pub mod handlers;
pub mod view_state;
pub mod views;
