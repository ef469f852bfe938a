pub mod progress_bar;
pub mod question_card;
pub mod results_panel;
pub mod session_sidebar;
pub mod setup_panel;
