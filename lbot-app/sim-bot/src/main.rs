use std::{error::Error, fs, net::IpAddr, path::PathBuf, thread, time::Duration};

use clap::{Parser, Subcommand};
use embedded_hal::delay::DelayNs;
use lbot_core::utils::{
    config::RobotConfig,
    connection::{connect_with, create_server, get_message, send_message, Connection},
    controllers::{RemoteCommand, RobotController},
    hal::SimulatedHal,
};
use tracing::{debug, error, info, warn};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    /// JSON file overriding the default calibration
    #[clap(long)]
    config: Option<PathBuf>,
    /// Simulated encoder counts per full-speed motor command
    #[clap(long, default_value_t = 100)]
    encoder_rate: i32,
    #[clap(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Baseline smoke test: drive forward at full speed
    Drive {
        /// stop after this many ticks instead of running forever
        #[clap(long)]
        ticks: Option<u64>,
    },
    /// Accept a command connection and run received commands on the simulator
    Serve {
        /// override the configured port
        #[clap(long)]
        port: Option<u16>,
        /// delay between accept polls
        #[clap(long, default_value_t = 50)]
        poll_ms: u64,
    },
    /// Send one message to a robot and print its reply
    Send {
        ip: IpAddr,
        message: String,
        #[clap(long)]
        port: Option<u16>,
    },
}

/// Real-time delay for the simulated HAL.
struct ThreadDelay;

impl DelayNs for ThreadDelay {
    fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        thread::sleep(Duration::from_nanos(ns.into()));
    }
}

type SimRobot = RobotController<SimulatedHal<ThreadDelay>>;

fn load_config(path: Option<&PathBuf>) -> Result<RobotConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let config = serde_json::from_str(&text)?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(RobotConfig::default()),
    }
}

fn drive(
    robot: &mut SimRobot,
    ticks: Option<u64>,
) {
    let speed = robot.config().drive.base_speed;
    info!(speed, ?ticks, "driving forward");
    let mut tick = 0u64;
    while ticks.is_none_or(|limit| tick < limit) {
        robot.forward(speed);
        robot.hal_mut().take_events();
        tick += 1;
    }
    robot.stop();
    info!(tick, "drive finished");
}

/// Handle one message on a live connection; `false` once the peer is gone.
fn serve_message(
    robot: &mut SimRobot,
    conn: &mut Connection,
) -> bool {
    let text = match get_message(Some(&mut *conn)) {
        Ok(Some(text)) if !text.is_empty() => text,
        Ok(_) => {
            info!(peer = %conn.peer_addr(), "peer closed the connection");
            return false;
        }
        Err(e) => {
            error!("receive failed: {}", e);
            return false;
        }
    };

    let reply = match RemoteCommand::parse(&text) {
        Ok(command) => {
            let outcome = robot.execute(command);
            for event in robot.hal_mut().take_events() {
                debug!(?event, "hal");
            }
            if outcome.reached() {
                "ok"
            } else {
                "gave up"
            }
        }
        Err(e) => {
            warn!(%e, %text, "rejected message");
            "invalid command"
        }
    };

    match send_message(Some(&mut *conn), reply) {
        Ok(()) => true,
        Err(e) => {
            error!("reply failed: {}", e);
            false
        }
    }
}

fn serve(
    robot: &mut SimRobot,
    port: Option<u16>,
    poll_ms: u64,
) -> Result<(), Box<dyn Error>> {
    let mut channel = robot.config().channel;
    if let Some(port) = port {
        channel.port = port;
    }
    let server = create_server(&channel)?;
    robot.start_servos();
    robot.hal_mut().take_events();

    let mut conn: Option<Connection> = None;
    loop {
        match conn.as_mut() {
            Some(live) => {
                if !serve_message(robot, live) {
                    conn = None;
                }
            }
            None => {
                conn = server.accept_connection()?;
                if conn.is_none() {
                    thread::sleep(Duration::from_millis(poll_ms));
                }
            }
        }
    }
}

fn send(
    config: &RobotConfig,
    ip: IpAddr,
    message: &str,
    port: Option<u16>,
) -> Result<(), Box<dyn Error>> {
    let mut channel = config.channel;
    if let Some(port) = port {
        channel.port = port;
    }
    let mut conn = connect_with(ip, &channel)?;
    send_message(Some(&mut conn), message)?;
    if let Some(reply) = get_message(Some(&mut conn))? {
        println!("{reply}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts: Opts = Opts::parse();
    let config = load_config(opts.config.as_ref())?;

    match opts.mode {
        Mode::Send { ip, message, port } => send(&config, ip, &message, port),
        Mode::Drive { ticks } => {
            let hal = SimulatedHal::new(ThreadDelay).with_encoder_rate(opts.encoder_rate);
            let mut robot = RobotController::new(hal, config);
            drive(&mut robot, ticks);
            Ok(())
        }
        Mode::Serve { port, poll_ms } => {
            let hal = SimulatedHal::new(ThreadDelay).with_encoder_rate(opts.encoder_rate);
            let mut robot = RobotController::new(hal, config);
            serve(&mut robot, port, poll_ms)
        }
    }
}
