pub mod file_selector;
pub mod force_graph;
pub mod forms;
pub mod tabs;
