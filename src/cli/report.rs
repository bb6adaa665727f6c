use crate::{
    archiver::{self, ReportFormat},
    config::Config,
    error,
};

use super::store;

pub async fn report(config: &Config, playlist_id: &str, html: bool) {
    let format = if html {
        ReportFormat::Html
    } else {
        ReportFormat::Markdown
    };

    match archiver::report_for_archive(&store(config), playlist_id, format).await {
        Ok(text) => print!("{text}"),
        Err(e) => error!("{}", e),
    }
}
