use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "orechain")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "createwallet", about = "Create a new wallet")]
    Createwallet,
    #[command(
        name = "demo",
        about = "Run a signed-transfer and mining demo on a single node"
    )]
    Demo,
    #[command(
        name = "simulate",
        about = "Run two in-process nodes that reconcile their chains"
    )]
    Simulate,
    #[command(name = "mine", about = "Run the periodic mining loop for a while")]
    Mine {
        #[arg(help = "How many seconds to keep the mining loop running")]
        seconds: u64,
    },
}
