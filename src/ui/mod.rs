pub mod episodes;
pub mod picker;
pub mod search;
pub mod shows;
pub mod widgets;

pub use episodes::render_episodes_view;
pub use picker::render_picker;
pub use search::render_search_bar;
pub use shows::render_shows_view;
pub use widgets::render_status_line;
