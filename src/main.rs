mod console;

use eyre::WrapErr;
use tokio::io::{AsyncBufReadExt, BufReader};

use console::ConsoleCommand;
use st4_driver::telescope_control::device::create_device;
use st4_driver::{Config, Telescope};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config: Config = confy::load_path(&config_path)
        .wrap_err_with(|| format!("Couldn't parse configuration {}", config_path))?;
    tracing::info!(?config, "Loaded configuration");

    let telescope = Telescope::new(&config, create_device(&config));
    if let Err(e) = telescope.connect().await {
        tracing::error!("Failed to connect: {}", e);
    }

    println!("{}", console::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        match console::execute(&telescope, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("Error: {}", e),
        }
    }

    telescope.shutdown().await?;
    Ok(())
}
