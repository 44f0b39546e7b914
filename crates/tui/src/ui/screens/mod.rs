pub mod budget;
pub mod chatbot;
pub mod dashboard;
pub mod login;
pub mod profile;
pub mod rewards;
