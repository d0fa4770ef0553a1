pub mod credentials;
pub mod google_auth;
pub mod google_sheets;
pub mod memory;
pub mod rows;
pub mod traits;
