pub mod server;

use std::path::PathBuf;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        db: String,
        icon_cache: PathBuf,
    },
}
