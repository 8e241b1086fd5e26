pub mod card;
pub mod context;
pub mod nav;
pub mod reveal;
pub mod themetoggle;
