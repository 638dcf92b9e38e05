use std::sync::Arc;

use env_logger::{Builder, Target};
use log::LevelFilter;
use tokio::io::{AsyncBufReadExt, BufReader};
use userdesk_ui::app::commands::{self, Command};
use userdesk_ui::app::{self, AppConfig};
use userdesk_ui::infra::services::ToastQueue;
use userdesk_ui::runtime::RuntimeHandle;

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("userdesk_ui", LevelFilter::Debug)
        .init();
}

async fn read_commands(handle: RuntimeHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", commands::HELP);

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        };
        match commands::parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{}", commands::HELP),
            Ok(command) => {
                for message in command.into_messages() {
                    handle.dispatch(message);
                }
            }
            Err(usage) => println!("{}", usage),
        }
    }
    handle.shutdown();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
        log::info!("Initializing logger from env");
    }

    let config = AppConfig::from_environment();
    log::info!("Connecting to {}", config.server_url());

    let toasts = ToastQueue::new();
    let app::App {
        mut runtime,
        session,
    } = app::build(&config, Arc::new(toasts.clone())).await?;

    runtime.subscribe(|view| println!("{}", view));
    runtime.mount();
    tokio::spawn(read_commands(runtime.handle()));

    let mut greeted = false;
    while runtime.step().await {
        if !greeted && session.is_done() {
            greeted = true;
            match session.current_user() {
                Some(me) => println!("Signed in as {}", me.display_name()),
                None => println!("Not signed in"),
            }
        }
        for toast in toasts.drain() {
            println!("[{}] {}", toast.severity, toast.text);
        }
    }

    Ok(())
}
