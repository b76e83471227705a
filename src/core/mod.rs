pub mod backup;
pub mod bulk;
pub mod calendar;
pub mod feed;
pub mod log;
pub mod order;
pub mod pets;
pub mod scheduler;
pub mod session;
pub mod thumbnail;
pub mod transfer;
pub mod view;
