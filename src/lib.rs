pub mod actions;
pub mod apps;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod desktop;
pub mod dock;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod gesture;
pub mod keybindings;
pub mod layout;
pub mod menu_bar;
pub mod runner;
pub mod settings;
pub mod spotlight;
pub mod storage;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod viewport;
pub mod window;
