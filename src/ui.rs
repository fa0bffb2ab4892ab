mod app;
mod contents_panel;
mod dialogs;
mod font_dialog;
mod html_pane;
mod index_panel;
mod main_window;
mod menu_ids;
mod results_list;
mod search_panel;

pub use app::ChmViewApp;
pub use main_window::MainWindow;
