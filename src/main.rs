use loto::app::{App, cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli::cli().get_matches();
    loto_client::setup(Some(cli::log_level(&matches)));

    let mut app = App::from_matches(&matches)?;
    app.run(&matches).await
}
