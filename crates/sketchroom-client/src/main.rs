//! Headless native client entry point.

#[cfg(feature = "native")]
fn main() {
    use std::io::BufRead;
    use std::path::PathBuf;
    use std::sync::mpsc;
    use std::time::Duration;

    use clap::Parser;
    use sketchroom_client::console::{apply_command, describe_change, parse_command};
    use sketchroom_core::{ClientConfig, ConnectionState, RoomClient, save_png};

    #[derive(Parser)]
    #[command(author, version, about = "Join a sketchroom game from the terminal")]
    struct Args {
        /// Server base URL
        #[arg(long, default_value = "ws://localhost:8000")]
        server: String,
        #[arg(long, default_value = "lobby")]
        room: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Write a PNG of the canvas here on exit
        #[arg(long)]
        snapshot: Option<PathBuf>,
    }

    env_logger::init();
    let args = Args::parse();
    log::info!("Starting sketchroom");

    let mut client = RoomClient::new(ClientConfig::new(args.server, args.room, args.name));
    if let Err(e) = client.connect() {
        eprintln!("Failed to connect: {}", e);
        std::process::exit(1);
    }

    let (line_tx, line_rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    'run: loop {
        loop {
            match line_rx.try_recv() {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => match parse_command(&line) {
                    Ok(command) => {
                        if !apply_command(client.session_mut(), command) {
                            break 'run;
                        }
                    }
                    Err(usage) => eprintln!("{}", usage),
                },
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break 'run,
            }
        }

        client.tick();
        let changes = client.session_mut().take_changes();
        for change in &changes {
            if let Some(line) = describe_change(change, client.session()) {
                println!("{}", line);
            }
        }
        if matches!(client.connection_state(), ConnectionState::Disconnected | ConnectionState::Error) {
            if let Some(error) = client.last_error() {
                eprintln!("{}", error);
            }
            break;
        }
        std::thread::sleep(Duration::from_millis(16));
    }

    client.disconnect();
    if let Some(path) = args.snapshot {
        if let Err(e) = save_png(client.session().canvas().buffer(), &path) {
            eprintln!("{}", e);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
