use std::str::FromStr;

use eyre::{bail, eyre, WrapErr};

use st4_driver::util::{Axis, GuideDirection};
use st4_driver::{Degrees, Hours, Telescope};

/// One line typed into the console
#[derive(Debug, PartialEq)]
pub enum ConsoleCommand {
    Help,
    Status,
    Connect,
    Disconnect,
    MoveAxis(Axis, f64),
    PulseGuide(GuideDirection, u32),
    Slew(Hours, Degrees),
    SlewAsync(Hours, Degrees),
    Sync(Hours, Degrees),
    SetTarget(Hours, Degrees),
    SlewToTarget,
    SyncToTarget,
    Abort,
    SiderealTime,
    Raw(String),
    Quit,
}

pub const HELP: &str = "\
commands:
  status                  position, rates and target
  connect | disconnect
  move <ra|dec> <rate>    move an axis indefinitely, 0 stops it
  guide <n|s|e|w> <ms>    pulse guide
  slew <ra> <dec>         slew and wait
  slewasync <ra> <dec>    slew in the background
  sync <ra> <dec>         set the current position
  target <ra> <dec>       set the target
  slewtarget | synctarget
  abort                   stop both axes
  lst                     Greenwich sidereal time
  raw <command>           send a raw command to the device
  quit";

fn parse_axis(s: &str) -> eyre::Result<Axis> {
    match s.to_ascii_lowercase().as_str() {
        "ra" => Ok(Axis::RightAscension),
        "dec" => Ok(Axis::Declination),
        _ => bail!("Unknown axis {}", s),
    }
}

fn parse_number<T: FromStr>(s: Option<&str>, name: &str) -> eyre::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let s = s.ok_or_else(|| eyre!("Missing {}", name))?;
    s.parse().wrap_err_with(|| format!("Invalid {} {}", name, s))
}

fn parse_coordinates<'a>(mut args: impl Iterator<Item = &'a str>) -> eyre::Result<(Hours, Degrees)> {
    Ok((
        parse_number(args.next(), "right ascension")?,
        parse_number(args.next(), "declination")?,
    ))
}

impl FromStr for ConsoleCommand {
    type Err = eyre::Report;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let mut args = rest.split_whitespace();

        Ok(match word.to_ascii_lowercase().as_str() {
            "help" | "?" => ConsoleCommand::Help,
            "status" | "" => ConsoleCommand::Status,
            "connect" => ConsoleCommand::Connect,
            "disconnect" => ConsoleCommand::Disconnect,
            "move" => {
                let axis = parse_axis(args.next().ok_or_else(|| eyre!("Missing axis"))?)?;
                ConsoleCommand::MoveAxis(axis, parse_number(args.next(), "rate")?)
            }
            "guide" => {
                let direction = args
                    .next()
                    .ok_or_else(|| eyre!("Missing direction"))?
                    .parse::<GuideDirection>()
                    .map_err(|e| eyre!(e))?;
                ConsoleCommand::PulseGuide(direction, parse_number(args.next(), "duration")?)
            }
            "slew" => {
                let (ra, dec) = parse_coordinates(args)?;
                ConsoleCommand::Slew(ra, dec)
            }
            "slewasync" => {
                let (ra, dec) = parse_coordinates(args)?;
                ConsoleCommand::SlewAsync(ra, dec)
            }
            "sync" => {
                let (ra, dec) = parse_coordinates(args)?;
                ConsoleCommand::Sync(ra, dec)
            }
            "target" => {
                let (ra, dec) = parse_coordinates(args)?;
                ConsoleCommand::SetTarget(ra, dec)
            }
            "slewtarget" => ConsoleCommand::SlewToTarget,
            "synctarget" => ConsoleCommand::SyncToTarget,
            "abort" | "stop" => ConsoleCommand::Abort,
            "lst" => ConsoleCommand::SiderealTime,
            "raw" => {
                let command = rest.trim();
                if command.is_empty() {
                    bail!("Missing raw command");
                }
                ConsoleCommand::Raw(command.to_string())
            }
            "quit" | "exit" => ConsoleCommand::Quit,
            _ => bail!("Unknown command {}, try help", word),
        })
    }
}

async fn print_status(telescope: &Telescope) -> eyre::Result<()> {
    println!(
        "connected: {}  ra: {:.5}h  dec: {:.4}°  ra rate: {:.6}  dec rate: {:.6}  slewing: {}",
        telescope.is_connected().await,
        telescope.get_ra().await?,
        telescope.get_dec().await?,
        telescope.get_ra_rate().await?,
        telescope.get_dec_rate().await?,
        telescope.is_slewing().await?,
    );
    match (
        telescope.get_target_ra().await,
        telescope.get_target_declination().await,
    ) {
        (Ok(ra), Ok(dec)) => println!("target: {:.5}h {:.4}°", ra, dec),
        _ => println!("target: not set"),
    }
    Ok(())
}

/// Runs one command. Returns false once the console should close.
pub async fn execute(telescope: &Telescope, command: ConsoleCommand) -> eyre::Result<bool> {
    match command {
        ConsoleCommand::Help => println!("{}", HELP),
        ConsoleCommand::Status => print_status(telescope).await?,
        ConsoleCommand::Connect => telescope.connect().await?,
        ConsoleCommand::Disconnect => telescope.disconnect().await?,
        ConsoleCommand::MoveAxis(axis, rate) => telescope.move_axis(axis, rate).await?,
        ConsoleCommand::PulseGuide(direction, duration) => {
            telescope.pulse_guide(direction, duration).await?
        }
        ConsoleCommand::Slew(ra, dec) => {
            telescope.slew_to_coordinates(ra, dec).await?;
            print_status(telescope).await?
        }
        ConsoleCommand::SlewAsync(ra, dec) => telescope.slew_to_coordinates_async(ra, dec).await?,
        ConsoleCommand::Sync(ra, dec) => telescope.sync_to_coordinates(ra, dec).await?,
        ConsoleCommand::SetTarget(ra, dec) => telescope.set_target(ra, dec).await?,
        ConsoleCommand::SlewToTarget => {
            telescope.slew_to_target().await?;
            print_status(telescope).await?
        }
        ConsoleCommand::SyncToTarget => telescope.sync_to_target().await?,
        ConsoleCommand::Abort => telescope.abort_slew().await?,
        ConsoleCommand::SiderealTime => {
            println!("{:.6}h", telescope.get_sidereal_time().await?)
        }
        ConsoleCommand::Raw(command) => {
            println!("{}", telescope.command_string(&command).await?)
        }
        ConsoleCommand::Quit => return Ok(false),
    }
    Ok(true)
}
