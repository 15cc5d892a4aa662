//! `xsizehints`: inspect and override the size hints of X11 windows.
//!
//! ```text
//! xsizehints show 0x1e00007
//! xsizehints override 0x1e00007 0 0 0 0
//! xsizehints hold 0x1e00007 640 480 640 480 --seconds 10
//! ```
//!
//! The backend and display default to `XSIZEHINTS_BACKEND` and
//! `XSIZEHINTS_DISPLAY` (then `DISPLAY`), and can be set on the
//! command line.

use std::error::Error;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::fmt as logger;

use xsizehints::x::HintsConn;
use xsizehints::{Backend, Config, ConnVisitor, ConstraintsService, DirectResolver, Xid};

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "xsizehints", version, about)]
struct Args {
    /// The X display to connect to.
    #[arg(short, long, global = true)]
    display: Option<String>,

    /// The library to talk to the X server with: xlib, x11rb or xcb.
    #[arg(short, long, global = true)]
    backend: Option<Backend>,

    /// Log more. Can be given up to three times.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// A window and the size to lock it to.
#[derive(clap::Args, Debug, Clone, Copy)]
struct Lock {
    /// The window ID, in decimal or 0x-prefixed hex.
    window: Xid,
    min_width: i32,
    min_height: i32,
    max_width: i32,
    max_height: i32,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Print the size hints of a window.
    Show {
        /// The window ID, in decimal or 0x-prefixed hex.
        window: Xid,
    },
    /// Replace the size hints of a window with a minimum and maximum size.
    Override(Lock),
    /// Override the size hints of a window, then put them back.
    Hold {
        #[command(flatten)]
        lock: Lock,

        /// How long to hold the override for.
        #[arg(short, long, default_value_t = 5)]
        seconds: u64,
    },
}

impl ConnVisitor for Command {
    type Output = Result<(), BoxError>;

    fn visit<C: HintsConn>(self, conn: C) -> Self::Output {
        let service = ConstraintsService::new(DirectResolver::new(conn));

        match self {
            Command::Show { window } => {
                let saved = service
                    .capture(&window)
                    .ok_or_else(|| format!("could not resolve window {}", window))?;

                let words = saved
                    .wire()
                    .to_words()
                    .iter()
                    .map(|w| format!("{:#x}", w))
                    .collect::<Vec<_>>();

                println!("{}", window);
                println!("  {}", saved.wire());
                println!("  supplied: {:?}", saved.supplied());
                println!("  raw: [{}]", words.join(", "));
            }
            Command::Override(lock) => {
                service.override_constraints(
                    &lock.window,
                    lock.min_width,
                    lock.min_height,
                    lock.max_width,
                    lock.max_height,
                );
            }
            Command::Hold { lock, seconds } => {
                let saved = service.capture(&lock.window);

                service.override_constraints(
                    &lock.window,
                    lock.min_width,
                    lock.min_height,
                    lock.max_width,
                    lock.max_height,
                );
                info!("holding {} for {}s", lock.window, seconds);
                thread::sleep(Duration::from_secs(seconds));

                service.apply(&lock.window, saved.as_ref());
                info!("restored {}", lock.window);
            }
        }

        Ok(())
    }
}

fn main() -> Result<(), BoxError> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    logger::fmt()
        .with_max_level(level)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init()?;

    let mut config = Config::from_env()?;
    if let Some(display) = args.display {
        config = config.with_display(display);
    }
    if let Some(backend) = args.backend {
        config = config.with_backend(backend);
    }

    config.connect(args.command)?
}
