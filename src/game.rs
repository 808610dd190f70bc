pub mod chart;
pub mod gameplay;
pub mod judgment;
pub mod life;
pub mod note;
pub mod playback;
pub mod scores;
pub mod stats;
pub mod timeline;
pub mod view;
