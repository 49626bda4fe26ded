mod dispatch;
mod params;
mod server;

pub use dispatch::{Dispatcher, Operation};
pub use params::{DownloadFilesParams, FileSpec, FindFilesParams, SearchCodeParams};
pub use server::McpServer;
