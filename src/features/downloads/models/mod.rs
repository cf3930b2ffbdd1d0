mod download_history;

pub use download_history::DownloadHistory;
