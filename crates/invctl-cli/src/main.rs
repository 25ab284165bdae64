mod cli;
mod render;

use invctl_core::ClientError;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{e:#}"); // pretty anyhow chain
        if e
            .downcast_ref::<ClientError>()
            .is_some_and(|err| err.is_auth() && err.status != Some(403))
        {
            eprintln!("Run `invctl login` to start a new session.");
        }
        std::process::exit(1);
    }
}
