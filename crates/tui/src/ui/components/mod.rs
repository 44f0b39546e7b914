pub mod card;
pub mod charts;
pub mod hints;
pub mod modal;
pub mod tabs;
pub mod toast;
