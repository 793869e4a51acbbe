// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stderr: errors are reported to the user on stderr.
// - exit: the exit code tells the shell whether the documents were valid.
#![allow(clippy::print_stderr, clippy::exit)]

mod cli;
mod logging;

#[tokio::main]
async fn main() {
    match cli::run().await {
        Ok(cli::Outcome::Valid) => {}
        Ok(cli::Outcome::Invalid) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
