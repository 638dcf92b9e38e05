pub mod api_client;
pub mod services;
pub mod testing;
