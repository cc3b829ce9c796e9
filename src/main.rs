mod args;
mod config;
mod controller;
mod entry;
mod error;
mod schedule;
mod shutdown;
mod system;
mod task;
mod worker;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
