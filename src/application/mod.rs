// Application layer - Session state, views and the event loop
pub mod animation;
pub mod connection;
pub mod counter_panel;
pub mod dispatcher;
pub mod layout;
pub mod registry;
pub mod session;
pub mod surface;
pub mod timeline_view;
pub mod topology_view;
pub mod view_model;
