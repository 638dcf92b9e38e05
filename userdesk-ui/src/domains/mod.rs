pub mod user_change;
