#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod db;
mod error;
mod notify;
mod prelude;
mod quantity;
mod tables;

use std::process::ExitCode;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, peek, watch},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let outcome = match args.command {
        Command::Watch(args) => watch(&args).await,
        Command::Peek(args) => peek(&args).await,
    };
    match outcome {
        Ok(()) => {
            info!("done!");
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!("{error}");
            error.exit_code()
        }
    }
}
