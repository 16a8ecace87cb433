pub mod contract;
pub mod panic;
pub mod request_id;
pub mod timeout;
pub mod timestamp;
