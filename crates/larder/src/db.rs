mod connect;
pub use connect::Connect;

mod pool;
pub use pool::{Pool, PoolConnection};
