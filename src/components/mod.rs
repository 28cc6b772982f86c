//! UI Components
//!
//! Pages and their building blocks.

mod beer_card;
mod game;
mod landing;
mod leaderboard;
mod name_dialog;
mod progress_bar;
mod results;

pub use beer_card::BeerCard;
pub use game::Game;
pub use landing::Landing;
pub use leaderboard::Leaderboard;
pub use name_dialog::NameDialog;
pub use progress_bar::ProgressBar;
pub use results::Results;
